//! Controller end-to-end: model updates, settings and redraws observed
//! through an in-memory screen at a fixed terminal size.

mod common;

use std::sync::Arc;
use std::thread;

use jobwatch::controller::{Controller, KeyAction};
use jobwatch::core::errors::{JobwatchError, Result};
use jobwatch::model::{Job, JobGroup};
use jobwatch::render::{HELP_LINE, SortMode, visible_width};
use jobwatch::terminal::TerminalSize;

use common::{CLEAR_PREFIX, Screen, dashboard};

struct Detached;

impl TerminalSize for Detached {
    fn size(&self) -> Result<(u16, u16)> {
        Err(JobwatchError::TerminalQuery {
            details: "not a tty".to_string(),
        })
    }
}

fn review_jobs() -> Vec<Job> {
    vec![
        Job::new(101, "boot_to_desktop", "running", 2).with_started("2024-03-10T11:30:00"),
        Job::new(102, "install_kde", "passed", 1).with_finished("2024-03-10T11:00:00"),
        Job::new(103, "zypper_up", "failed", 2).with_finished("2024-03-07T09:00:00"),
        Job::new(104, "kernel_live", "softfailed", 1).with_finished("2024-03-09T08:00:00"),
        Job::new(105, "firefox", "scheduled", 1),
    ]
}

#[test]
fn each_update_clears_and_draws_a_full_frame() {
    let screen = Screen::default();
    let ctl = dashboard(&screen, 120);
    ctl.set_header("Tumbleweed review");
    ctl.apply(review_jobs());

    assert!(ctl.update());
    assert!(ctl.update());

    let frames = screen.frames();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0], frames[1], "redraw without changes is identical");
    assert!(screen.text().starts_with(CLEAR_PREFIX));

    let lines: Vec<&str> = frames[0].lines().collect();
    assert_eq!(lines[0], "Tumbleweed review");
    assert_eq!(lines[1], HELP_LINE);
    assert_eq!(lines[2], "");
}

#[test]
fn hidden_states_disappear_until_hiding_is_toggled() {
    let screen = Screen::default();
    let ctl = dashboard(&screen, 120);
    ctl.set_hide_status(["passed", "softfailed"]);
    ctl.apply(review_jobs());

    ctl.update();
    let frame = screen.frames().pop().unwrap();
    assert!(frame.contains("boot_to_desktop"));
    assert!(frame.contains("zypper_up"));
    assert!(!frame.contains("install_kde"));
    assert!(!frame.contains("kernel_live"));

    ctl.perform(KeyAction::ToggleHide);
    let frame = screen.frames().pop().unwrap();
    assert!(frame.contains("install_kde"));
    assert!(frame.contains("kernel_live"));
}

#[test]
fn full_width_lines_show_timestamp_id_state_and_name() {
    let screen = Screen::default();
    let ctl = dashboard(&screen, 120);
    ctl.set_hide(false);
    ctl.apply(review_jobs());
    ctl.update();

    let frame = screen.frames().pop().unwrap();
    let lines: Vec<&str> = frame.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with(" 2024-03-10-11:30:00"), "{:?}", lines[0]);
    assert!(lines[0].contains("     101 running "));
    assert!(lines[0].ends_with(" | boot_to_desktop"));
    // Scheduled jobs have no timestamp.
    assert!(lines[4].starts_with(&" ".repeat(24)));
    for line in lines {
        assert!(visible_width(line) <= 120);
    }
}

#[test]
fn grouped_mode_orders_groups_by_id_with_footers() {
    let screen = Screen::default();
    let ctl = dashboard(&screen, 50);
    ctl.set_job_group_list(vec![JobGroup::new(1, "Leap"), JobGroup::new(2, "Tumbleweed")]);
    ctl.set_hide_status(["passed"]);
    ctl.apply(review_jobs());
    ctl.set_sorting(SortMode::Grouped);
    ctl.update();

    assert_eq!(ctl.group(2), Some(JobGroup::new(2, "Tumbleweed")));
    assert_eq!(ctl.group(9), None);

    let frame = screen.frames().pop().unwrap();
    let lines: Vec<&str> = frame.lines().collect();
    assert_eq!(
        lines,
        vec![
            "===== Leap ====================",
            "softfailed   kernel_live",
            "scheduled    firefox",
            "Total: 3, passed: 1, scheduled: 1, softfailed: 1 (hidden: 1)",
            "===== Tumbleweed ====================",
            "running      boot_to_desktop",
            "failed       zypper_up",
            "Total: 2, failed: 1, running: 1",
        ]
    );
}

#[test]
fn status_and_tracker_follow_the_job_listing() {
    let screen = Screen::default();
    let ctl = dashboard(&screen, 40);
    ctl.apply(vec![Job::new(1, "boot", "running", 1)]);
    ctl.set_status("Last refresh: 12:00:00 (1 jobs)");
    ctl.set_tracker("reviewed 3/5");
    ctl.update();

    let frame = screen.frames().pop().unwrap();
    let lines: Vec<&str> = frame.lines().collect();
    assert_eq!(lines[1], "");
    assert_eq!(lines[2], "Last refresh: 12:00:00 (1 jobs)");
    assert_eq!(lines[3], format!("{:>40}", "reviewed 3/5"));

    ctl.perform(KeyAction::ToggleTracker);
    let frame = screen.frames().pop().unwrap();
    assert!(!frame.contains("reviewed 3/5"));
}

#[test]
fn unavailable_terminal_size_skips_the_frame() {
    let screen = Screen::default();
    let ctl = Controller::new()
        .with_output(screen.clone())
        .with_terminal(Detached);
    ctl.apply(review_jobs());
    assert!(!ctl.update());
    assert!(screen.text().is_empty());
}

#[test]
fn reviewed_jobs_are_tracked_as_a_set() {
    let screen = Screen::default();
    let ctl = dashboard(&screen, 80);
    assert!(ctl.add_reviewed_job(7));
    assert!(!ctl.add_reviewed_job(7));
    assert!(ctl.add_reviewed_job(9));
    assert_eq!(ctl.reviewed_jobs(), vec![7, 9]);
    assert!(ctl.remove_reviewed_job(7));
    assert!(!ctl.remove_reviewed_job(7));
    assert!(!ctl.is_reviewed(7));
    assert!(ctl.is_reviewed(9));
}

#[test]
fn concurrent_updates_never_interleave_frames() {
    let screen = Screen::default();
    let ctl = Arc::new(dashboard(&screen, 50));
    ctl.set_hide(false);

    let writers: Vec<_> = (0..4)
        .map(|worker| {
            let ctl = Arc::clone(&ctl);
            thread::spawn(move || {
                for round in 0..25 {
                    let state = if round % 2 == 0 { "running" } else { "failed" };
                    ctl.apply(
                        (0..10)
                            .map(|i| Job::new(worker * 100 + i, format!("job{i}"), state, 1))
                            .collect(),
                    );
                    ctl.update();
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let frames = screen.frames();
    assert_eq!(frames.len(), 100);
    for frame in frames {
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines.len(), 10, "{frame:?}");
        let states: Vec<&str> = lines.iter().map(|l| l.split_whitespace().next().unwrap()).collect();
        assert!(
            states.iter().all(|s| *s == states[0]),
            "frame mixes snapshots: {frame:?}"
        );
    }
}

#[test]
fn keypress_handler_drives_the_dashboard() {
    let screen = Screen::default();
    let ctl = Arc::new(dashboard(&screen, 80));
    let weak = Arc::downgrade(&ctl);
    ctl.set_keypress_handler(move |byte| {
        if let (Some(action), Some(ctl)) = (KeyAction::from_key(byte), weak.upgrade()) {
            ctl.perform(action);
        }
    });

    ctl.apply(review_jobs());

    for byte in b"hsx" {
        ctl.dispatch_key(*byte);
    }
    assert!(!ctl.hide());
    assert_eq!(ctl.sorting(), SortMode::Grouped);
    // One redraw per recognized key; unknown keys draw nothing.
    assert_eq!(screen.text().matches(CLEAR_PREFIX).count(), 2);
    let frames = screen.frames();
    assert_eq!(frames.len(), 2);
    assert!(frames[0].contains("install_kde"), "hidden jobs shown after 'h'");
    assert!(frames[1].contains("Total: "), "grouped footers after 's'");

    ctl.dispatch_key(b'q');
    ctl.await_termination();
}
