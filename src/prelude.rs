//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use jobwatch::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{JobwatchError, Result};

// Model
pub use crate::model::{Job, JobGroup, JobModel, JobState, StateTransition, state_transitions};

// Rendering
pub use crate::render::{DisplaySettings, LayoutTier, Palette, SortMode, render_frame};

// Runtime
pub use crate::controller::{Controller, Runtime};
pub use crate::notify::{DesktopNotifier, Notifier, NullNotifier};
pub use crate::poller::{Poller, PollerHandle};
pub use crate::source::{JobSource, SnapshotFileSource};
pub use crate::terminal::{CrosstermTerminal, FixedTerminal, TerminalGuard, TerminalSize};
