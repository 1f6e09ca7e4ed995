//! Width-tiered rendering of a single job line.
//!
//! Three layouts, picked by terminal width:
//!
//! | width      | columns                                          |
//! |------------|--------------------------------------------------|
//! | `> 90`     | timestamp, id, state, link, name                 |
//! | `61..=90`  | link (or id), state, name                        |
//! | `<= 60`    | state, name                                      |
//!
//! Names are clipped to whatever room the fixed columns leave.

use chrono::{DateTime, Utc};

use super::color::{AnsiColor, Palette, age_color, state_color};
use crate::model::Job;

/// Fixed columns of the full layout: 20+4+8+1+12+1+40+3.
pub const FULL_FIXED_COLS: usize = 89;
/// Fixed columns reserved by the medium layout.
pub const MEDIUM_FIXED_COLS: usize = 58;
/// State column plus separator in the narrow layout.
pub const NARROW_FIXED_COLS: usize = 13;

const FULL_MIN_WIDTH: usize = 91;
const MEDIUM_MIN_WIDTH: usize = 61;
const STATE_COLS: usize = 12;

/// Display format of timestamps (`2024-03-01-12:34:56`).
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutTier {
    Full,
    Medium,
    Narrow,
}

impl LayoutTier {
    #[must_use]
    pub const fn for_width(width: usize) -> Self {
        if width >= FULL_MIN_WIDTH {
            Self::Full
        } else if width >= MEDIUM_MIN_WIDTH {
            Self::Medium
        } else {
            Self::Narrow
        }
    }
}

/// Render one job as a single line (no trailing newline).
#[must_use]
pub fn render_job_line(job: &Job, width: usize, now: DateTime<Utc>, palette: Palette) -> String {
    match LayoutTier::for_width(width) {
        LayoutTier::Full => render_full(job, width, now, palette),
        LayoutTier::Medium => render_medium(job, width, palette),
        LayoutTier::Narrow => render_narrow(job, width, palette),
    }
}

fn render_full(job: &Job, width: usize, now: DateTime<Utc>, palette: Palette) -> String {
    let (stamp, date_color) = display_timestamp(job, now);
    let name = clip_name(&job.name, width, FULL_FIXED_COLS);
    format!(
        "{c1}{stamp:>20}{reset}    {id:>8} {c2}{state:<12}{reset}{white} {link:>40} | {name}",
        c1 = palette.paint(date_color),
        reset = palette.reset(),
        id = job.id,
        c2 = palette.paint(state_color(&job.state)),
        state = job.state,
        white = palette.paint(AnsiColor::White),
        link = job.link,
    )
}

fn render_medium(job: &Job, width: usize, palette: Palette) -> String {
    let link = if job.link.is_empty() {
        format!("{:<40}", job.id)
    } else {
        job.link.clone()
    };
    let name = clip_name(&job.name, width, MEDIUM_FIXED_COLS);
    format!(
        "{link:>40} {c2}{state:<12}{reset}{white} | {name}",
        c2 = palette.paint(state_color(&job.state)),
        state = job.state,
        reset = palette.reset(),
        white = palette.paint(AnsiColor::White),
    )
}

fn render_narrow(job: &Job, width: usize, palette: Palette) -> String {
    let label = format!("{:<width$}", job.state, width = STATE_COLS);
    let label_cols = label.chars().count();
    let c2 = palette.paint(state_color(&job.state));
    let reset = palette.reset();

    if width > label_cols {
        let name = truncate_chars(&job.name, width - label_cols - 1);
        format!("{c2}{label}{reset} {name}")
    } else {
        // Not even room for the state column: clip the label itself.
        format!("{c2}{}{reset}", truncate_chars(&label, width))
    }
}

/// Timestamp text and its color.
///
/// Finished time is preferred; running jobs show their start time uncolored.
/// Unset (epoch zero or earlier) and scheduled jobs show nothing.
fn display_timestamp(job: &Job, now: DateTime<Utc>) -> (String, AnsiColor) {
    let (timestamp, color) = if job.state.is_running() {
        (job.started_at(), AnsiColor::White)
    } else {
        let finished = job.finished_at().unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        (Some(finished), age_color(finished, now))
    };

    let text = timestamp
        .filter(|ts| !job.state.is_scheduled() && ts.timestamp() > 0)
        .map(|ts| ts.format(DISPLAY_TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default();
    (text, color)
}

fn clip_name(name: &str, width: usize, fixed: usize) -> &str {
    if width < fixed + name.chars().count() {
        truncate_chars(name, width.saturating_sub(fixed))
    } else {
        name
    }
}

/// First `max` characters of `text`.
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Printable width of a line, ignoring `ESC [ ... m` sequences.
#[must_use]
pub fn visible_width(line: &str) -> usize {
    let mut width = 0;
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            for esc in chars.by_ref() {
                if esc == 'm' {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}
