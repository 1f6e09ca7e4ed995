//! Diagnostics setup. Stdout belongs to the dashboard, so logs go to a file
//! (or stderr when no file can be opened).

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::core::config::LoggingConfig;
use crate::core::errors::{JobwatchError, Result};

/// Where diagnostics ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
///
/// Calling this twice is harmless; the second subscriber is rejected and
/// the first keeps running.
pub fn init(config: &LoggingConfig) -> LogTarget {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let path = config.effective_file();

    match open_log_file(&path) {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
            LogTarget::File(path)
        }
        Err(error) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(io::stderr)
                .try_init();
            tracing::warn!(%error, "log file unavailable, logging to stderr");
            LogTarget::Stderr
        }
    }
}

/// Open `path` for appending, creating its directory first.
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| JobwatchError::io(parent, source))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| JobwatchError::io(path, source))
}
