//! Whole-frame composition: header, job listing, status and tracker lines.

use chrono::{DateTime, Utc};

use super::color::Palette;
use super::grouping::{GroupSummary, HideFilter, SortMode, group_header, group_jobs};
use super::line::{render_job_line, truncate_chars};
use crate::model::{JobModel, JobState};

/// Key help printed under the header.
pub const HELP_LINE: &str =
    "q:Quit   r:Refresh   h:Hide/Show jobs   m:Toggle tracker   s:Switch sorting";

/// Everything about a frame that is not job data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySettings {
    pub hide: bool,
    pub hide_status: Vec<JobState>,
    pub sorting: SortMode,
    pub header: String,
    pub status: String,
    pub tracker: String,
    pub show_tracker: bool,
    pub show_status: bool,
    pub palette: Palette,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            hide: true,
            hide_status: Vec::new(),
            sorting: SortMode::Unsorted,
            header: String::new(),
            status: String::new(),
            tracker: String::new(),
            show_tracker: true,
            show_status: true,
            palette: Palette::ansi(),
        }
    }
}

impl DisplaySettings {
    #[must_use]
    pub fn hide_filter(&self) -> HideFilter<'_> {
        HideFilter {
            enabled: self.hide,
            states: &self.hide_status,
        }
    }
}

/// Render a complete frame for a terminal `width` columns wide.
///
/// The result is newline-terminated text without any screen-clearing
/// sequence; the caller decides how to put it on screen.
#[must_use]
pub fn render_frame(
    model: &JobModel,
    settings: &DisplaySettings,
    width: usize,
    now: DateTime<Utc>,
) -> String {
    let mut frame = String::new();

    if !settings.header.is_empty() {
        push_line(&mut frame, &settings.header);
        push_line(&mut frame, HELP_LINE);
        push_line(&mut frame, "");
    }

    match settings.sorting {
        SortMode::Unsorted => render_unsorted(&mut frame, model, settings, width, now),
        SortMode::Grouped => render_grouped(&mut frame, model, settings, width, now),
    }

    let mut shown_status = false;
    if settings.show_status && !settings.status.is_empty() {
        push_line(&mut frame, "");
        push_line(&mut frame, &settings.status);
        shown_status = true;
    }
    if settings.show_tracker && !settings.tracker.is_empty() {
        if !shown_status {
            push_line(&mut frame, "");
        }
        push_line(&mut frame, &tracker_line(&settings.tracker, width));
    }

    frame
}

fn render_unsorted(
    frame: &mut String,
    model: &JobModel,
    settings: &DisplaySettings,
    width: usize,
    now: DateTime<Utc>,
) {
    let filter = settings.hide_filter();
    for job in model.jobs().iter().filter(|job| !filter.hides(job)) {
        push_line(frame, &render_job_line(job, width, now, settings.palette));
    }
}

fn render_grouped(
    frame: &mut String,
    model: &JobModel,
    settings: &DisplaySettings,
    width: usize,
    now: DateTime<Utc>,
) {
    let filter = settings.hide_filter();
    for (group_id, jobs) in group_jobs(model.jobs()) {
        push_line(frame, &group_header(model.group_name(group_id)));
        for job in jobs.iter().filter(|job| !filter.hides(job)) {
            push_line(frame, &render_job_line(job, width, now, settings.palette));
        }
        push_line(frame, &GroupSummary::from_jobs(&jobs, filter).footer());
    }
}

/// Right-justify the tracker to `width`, or hard-clip it when it does not fit.
#[must_use]
pub fn tracker_line(tracker: &str, width: usize) -> String {
    if tracker.chars().count() <= width {
        format!("{tracker:>width$}")
    } else {
        truncate_chars(tracker, width).to_string()
    }
}

fn push_line(frame: &mut String, line: &str) {
    frame.push_str(line);
    frame.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Job, JobGroup};
    use crate::render::color::ANSI_CYAN;

    fn now() -> DateTime<Utc> {
        crate::model::parse_timestamp("2024-03-10T12:00:00").unwrap()
    }

    fn plain_settings() -> DisplaySettings {
        DisplaySettings {
            palette: Palette::plain(),
            ..DisplaySettings::default()
        }
    }

    #[test]
    fn hidden_jobs_are_not_rendered() {
        let mut model = JobModel::new();
        model.apply(vec![
            Job::new(1, "boot", "running", 1),
            Job::new(2, "install", "passed", 1),
        ]);
        let settings = DisplaySettings {
            hide: true,
            hide_status: vec![JobState::Passed],
            ..DisplaySettings::default()
        };

        let frame = render_frame(&model, &settings, 100, now());
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines.len(), 1, "{frame:?}");
        assert!(lines[0].contains(&format!("{ANSI_CYAN}running")));
        assert!(lines[0].ends_with("| boot"));
        assert!(!frame.contains("install"));
    }

    #[test]
    fn disabling_hide_shows_everything() {
        let mut model = JobModel::new();
        model.apply(vec![
            Job::new(1, "boot", "running", 1),
            Job::new(2, "install", "passed", 1),
        ]);
        let settings = DisplaySettings {
            hide: false,
            hide_status: vec![JobState::Passed],
            ..plain_settings()
        };
        assert_eq!(render_frame(&model, &settings, 100, now()).lines().count(), 2);
    }

    #[test]
    fn grouped_frame_orders_groups_and_prints_footers() {
        let mut model = JobModel::new();
        model.apply(vec![
            Job::new(1, "a", "failed", 5),
            Job::new(2, "b", "running", 3),
            Job::new(3, "c", "passed", 5),
        ]);
        model.set_job_group_list(vec![JobGroup::new(3, "Three"), JobGroup::new(5, "Five")]);
        let settings = DisplaySettings {
            hide: false,
            sorting: SortMode::Grouped,
            ..plain_settings()
        };

        let frame = render_frame(&model, &settings, 40, now());
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines[0], "===== Three ====================");
        assert_eq!(lines[2], "Total: 1, running: 1");
        assert_eq!(lines[3], "===== Five ====================");
        assert_eq!(lines[6], "Total: 2, failed: 1, passed: 1");
    }

    #[test]
    fn unknown_group_renders_with_empty_name() {
        let mut model = JobModel::new();
        model.apply(vec![Job::new(1, "a", "failed", 9)]);
        let settings = DisplaySettings {
            sorting: SortMode::Grouped,
            ..plain_settings()
        };
        let frame = render_frame(&model, &settings, 40, now());
        assert!(frame.starts_with("=====  ====================\n"));
    }

    #[test]
    fn header_adds_help_and_blank_line() {
        let settings = DisplaySettings {
            header: "openQA review".to_string(),
            ..plain_settings()
        };
        let frame = render_frame(&JobModel::new(), &settings, 80, now());
        assert_eq!(frame, format!("openQA review\n{HELP_LINE}\n\n"));
    }

    #[test]
    fn status_and_tracker_share_one_separator() {
        let settings = DisplaySettings {
            status: "refreshed".to_string(),
            tracker: "bus: 3 messages".to_string(),
            ..plain_settings()
        };
        let frame = render_frame(&JobModel::new(), &settings, 20, now());
        assert_eq!(frame, "\nrefreshed\n     bus: 3 messages\n");
    }

    #[test]
    fn tracker_alone_gets_its_own_separator() {
        let settings = DisplaySettings {
            status: "refreshed".to_string(),
            show_status: false,
            tracker: "abc".to_string(),
            ..plain_settings()
        };
        let frame = render_frame(&JobModel::new(), &settings, 5, now());
        assert_eq!(frame, "\n  abc\n");
    }

    #[test]
    fn hidden_tracker_is_not_printed() {
        let settings = DisplaySettings {
            tracker: "abc".to_string(),
            show_tracker: false,
            ..plain_settings()
        };
        assert_eq!(render_frame(&JobModel::new(), &settings, 5, now()), "");
    }

    #[test]
    fn tracker_is_clipped_when_too_wide() {
        assert_eq!(tracker_line("0123456789", 4), "0123");
        assert_eq!(tracker_line("ab", 4), "  ab");
    }
}
