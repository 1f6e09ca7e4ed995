#![forbid(unsafe_code)]

//! jobwatch: a live terminal dashboard for remote build/test jobs.
//!
//! The screen is redrawn in place from a thread-safe job model:
//! 1. **Model**: the latest job snapshot, group names and reviewed job ids
//! 2. **Render**: width-tiered, color-coded job lines, optionally grouped
//! 3. **Controller**: one lock around model and settings, keypress input,
//!    SIGWINCH redraw and SIGINT/SIGTERM shutdown
//!
//! # Library usage
//!
//! ```rust,no_run
//! use jobwatch::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use jobwatch::core::config::Config;
//! use jobwatch::render::{DisplaySettings, render_frame};
//! ```

pub mod prelude;

pub mod controller;
pub mod core;
pub mod logging;
pub mod model;
pub mod notify;
pub mod poller;
pub mod render;
pub mod source;
pub mod terminal;
