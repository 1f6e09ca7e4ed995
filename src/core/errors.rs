//! JW-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, JobwatchError>;

/// Top-level error type for jobwatch.
#[derive(Debug, Error)]
pub enum JobwatchError {
    #[error("[JW-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[JW-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[JW-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[JW-2001] terminal size unavailable: {details}")]
    TerminalQuery { details: String },

    #[error("[JW-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[JW-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[JW-3003] channel closed in component {component}")]
    ChannelClosed { component: &'static str },

    #[error("[JW-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl JobwatchError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "JW-1001",
            Self::MissingConfig { .. } => "JW-1002",
            Self::ConfigParse { .. } => "JW-1003",
            Self::TerminalQuery { .. } => "JW-2001",
            Self::Serialization { .. } => "JW-2101",
            Self::Io { .. } => "JW-3002",
            Self::ChannelClosed { .. } => "JW-3003",
            Self::Runtime { .. } => "JW-3900",
        }
    }

    /// Whether retrying (on the next frame or fetch cycle) might resolve the failure.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::TerminalQuery { .. }
                | Self::Io { .. }
                | Self::Serialization { .. }
                | Self::ChannelClosed { .. }
                | Self::Runtime { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for JobwatchError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for JobwatchError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
