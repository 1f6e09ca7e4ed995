//! Fixed ANSI foreground codes and the state/age color rules.

use std::env;

use chrono::{DateTime, Utc};

use crate::model::JobState;

pub const ANSI_RED: &str = "\u{1b}[31m";
pub const ANSI_GREEN: &str = "\u{1b}[32m";
pub const ANSI_YELLOW: &str = "\u{1b}[33m";
pub const ANSI_BRIGHT_YELLOW: &str = "\u{1b}[33;1m";
pub const ANSI_BLUE: &str = "\u{1b}[34m";
pub const ANSI_MAGENTA: &str = "\u{1b}[35m";
pub const ANSI_CYAN: &str = "\u{1b}[36m";
pub const ANSI_WHITE: &str = "\u{1b}[37m";
pub const ANSI_RESET: &str = "\u{1b}[0m";

const ONE_DAY_SECS: i64 = 24 * 60 * 60;

/// Foreground colors used by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnsiColor {
    Red,
    Green,
    Yellow,
    BrightYellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl AnsiColor {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Red => ANSI_RED,
            Self::Green => ANSI_GREEN,
            Self::Yellow => ANSI_YELLOW,
            Self::BrightYellow => ANSI_BRIGHT_YELLOW,
            Self::Blue => ANSI_BLUE,
            Self::Magenta => ANSI_MAGENTA,
            Self::Cyan => ANSI_CYAN,
            Self::White => ANSI_WHITE,
        }
    }
}

/// Color of a job state label.
#[must_use]
pub const fn state_color(state: &JobState) -> AnsiColor {
    match state {
        JobState::Scheduled | JobState::Assigned => AnsiColor::Blue,
        JobState::Done | JobState::Passed => AnsiColor::Green,
        JobState::Softfail | JobState::Softfailed => AnsiColor::Yellow,
        JobState::Fail | JobState::Failed => AnsiColor::Red,
        JobState::Cancelled | JobState::UserCancelled => AnsiColor::Magenta,
        JobState::Running => AnsiColor::Cyan,
        JobState::Unknown(_) => AnsiColor::White,
    }
}

/// Color of a timestamp by staleness: older than two days is red, older
/// than one day is bright yellow.
#[must_use]
pub fn age_color(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> AnsiColor {
    let age = now.timestamp() - timestamp.timestamp();
    if age > 2 * ONE_DAY_SECS {
        AnsiColor::Red
    } else if age > ONE_DAY_SECS {
        AnsiColor::BrightYellow
    } else {
        AnsiColor::White
    }
}

/// Whether escape codes are emitted at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Enabled,
    Disabled,
}

/// Resolves colors to escape codes, or to nothing in plain mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Palette {
    pub mode: ColorMode,
}

impl Palette {
    #[must_use]
    pub const fn ansi() -> Self {
        Self {
            mode: ColorMode::Enabled,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            mode: ColorMode::Disabled,
        }
    }

    #[must_use]
    pub const fn from_no_color_flag(no_color: bool) -> Self {
        if no_color { Self::plain() } else { Self::ansi() }
    }

    /// Plain when `NO_COLOR` is set, regardless of its value.
    #[must_use]
    pub fn from_environment() -> Self {
        Self::from_no_color_flag(env::var_os("NO_COLOR").is_some())
    }

    #[must_use]
    pub const fn paint(self, color: AnsiColor) -> &'static str {
        match self.mode {
            ColorMode::Enabled => color.code(),
            ColorMode::Disabled => "",
        }
    }

    #[must_use]
    pub const fn reset(self) -> &'static str {
        match self.mode {
            ColorMode::Enabled => ANSI_RESET,
            ColorMode::Disabled => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn state_color_table_is_exhaustive() {
        let table: &[(&str, AnsiColor)] = &[
            ("scheduled", AnsiColor::Blue),
            ("assigned", AnsiColor::Blue),
            ("done", AnsiColor::Green),
            ("passed", AnsiColor::Green),
            ("softfail", AnsiColor::Yellow),
            ("softfailed", AnsiColor::Yellow),
            ("fail", AnsiColor::Red),
            ("failed", AnsiColor::Red),
            ("cancelled", AnsiColor::Magenta),
            ("user_cancelled", AnsiColor::Magenta),
            ("running", AnsiColor::Cyan),
            ("incomplete", AnsiColor::White),
            ("Passed", AnsiColor::White),
            ("", AnsiColor::White),
        ];
        for (raw, expected) in table {
            assert_eq!(
                state_color(&JobState::parse(raw)),
                *expected,
                "state {raw:?}"
            );
        }
    }

    #[test]
    fn color_codes_match_fixed_escapes() {
        assert_eq!(AnsiColor::Green.code(), "\u{1b}[32m");
        assert_eq!(AnsiColor::BrightYellow.code(), "\u{1b}[33;1m");
        assert_eq!(AnsiColor::White.code(), "\u{1b}[37m");
    }

    #[test]
    fn age_color_thresholds() {
        let now = Utc::now();
        assert_eq!(age_color(now, now), AnsiColor::White);
        assert_eq!(age_color(now - Duration::hours(23), now), AnsiColor::White);
        assert_eq!(
            age_color(now - Duration::hours(25), now),
            AnsiColor::BrightYellow
        );
        assert_eq!(
            age_color(now - Duration::seconds(2 * ONE_DAY_SECS), now),
            AnsiColor::BrightYellow
        );
        assert_eq!(age_color(now - Duration::hours(49), now), AnsiColor::Red);
    }

    #[test]
    fn plain_palette_emits_nothing() {
        let palette = Palette::plain();
        assert_eq!(palette.paint(AnsiColor::Red), "");
        assert_eq!(palette.reset(), "");
        assert_eq!(Palette::ansi().paint(AnsiColor::Red), ANSI_RED);
    }
}
