//! Layout engine: pure functions from jobs and terminal width to colored text.

#![allow(missing_docs)]

pub mod color;
pub mod frame;
pub mod grouping;
pub mod line;

pub use color::{AnsiColor, ColorMode, Palette, age_color, state_color};
pub use frame::{DisplaySettings, HELP_LINE, render_frame, tracker_line};
pub use grouping::{GroupSummary, HideFilter, SortMode, group_jobs};
pub use line::{LayoutTier, render_job_line, truncate_chars, visible_width};
