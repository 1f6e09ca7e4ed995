//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{JobwatchError, Result};
use crate::model::JobState;
use crate::render::SortMode;

/// Levels accepted by `logging.level` and `JOBWATCH_LOG_LEVEL`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Full jobwatch configuration model.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub source: SourceConfig,
    pub notifications: NotificationConfig,
    pub logging: LoggingConfig,
}

/// Initial dashboard settings. All of them can be changed at runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    pub hide: bool,
    pub hide_status: Vec<JobState>,
    pub sorting: SortMode,
    pub show_tracker: bool,
    pub show_status: bool,
    /// First frame line. The key help is printed only under a non-empty header.
    pub header: String,
    /// ANSI colors. `NO_COLOR` in the environment wins over `true`.
    pub color: bool,
}

/// Where job snapshots come from and how often they are re-read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourceConfig {
    pub jobs_file: Option<PathBuf>,
    pub groups_file: Option<PathBuf>,
    pub refresh_interval_secs: u64,
}

/// Desktop notifications for jobs changing into one of `states`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub command: String,
    pub states: Vec<JobState>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file; `None` means the default state-directory location.
    pub file: Option<PathBuf>,
    pub level: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            hide: true,
            hide_status: vec![JobState::Passed, JobState::Softfailed],
            sorting: SortMode::Unsorted,
            show_tracker: true,
            show_status: true,
            header: "jobwatch".to_string(),
            color: true,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            jobs_file: None,
            groups_file: None,
            refresh_interval_secs: 30,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: "notify-send".to_string(),
            states: vec![JobState::Failed, JobState::Softfailed],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// The configured log file, or `jobwatch.log` under the XDG state dir.
    #[must_use]
    pub fn effective_file(&self) -> PathBuf {
        self.file.clone().unwrap_or_else(|| {
            xdg_dir("XDG_STATE_HOME", &[".local", "state"])
                .join("jobwatch")
                .join("jobwatch.log")
        })
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        xdg_dir("XDG_CONFIG_HOME", &[".config"])
            .join("jobwatch")
            .join("config.toml")
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    /// The result is not validated: callers layer their own overrides on top
    /// and call [`Config::validate`] once at the end.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| JobwatchError::io(&path_buf, source))?;
            toml::from_str(&raw)?
        } else if path.is_some() {
            return Err(JobwatchError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.apply_env_overrides_from(env_var)?;
        Ok(cfg)
    }

    /// Apply `JOBWATCH_*` overrides read through `lookup`.
    pub fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        // display
        if let Some(raw) = lookup("JOBWATCH_HIDE") {
            self.display.hide = parse_env_bool("JOBWATCH_HIDE", &raw)?;
        }
        if let Some(raw) = lookup("JOBWATCH_HIDE_STATUS") {
            self.display.hide_status = parse_state_list(&raw);
        }
        if let Some(raw) = lookup("JOBWATCH_SORTING") {
            self.display.sorting =
                SortMode::parse(&raw).ok_or_else(|| JobwatchError::ConfigParse {
                    context: "env",
                    details: format!("JOBWATCH_SORTING={raw:?}: expected unsorted or grouped"),
                })?;
        }

        // source
        if let Some(raw) = lookup("JOBWATCH_JOBS_FILE") {
            self.source.jobs_file = Some(PathBuf::from(raw));
        }
        if let Some(raw) = lookup("JOBWATCH_GROUPS_FILE") {
            self.source.groups_file = Some(PathBuf::from(raw));
        }
        if let Some(raw) = lookup("JOBWATCH_REFRESH_INTERVAL_SECS") {
            self.source.refresh_interval_secs =
                parse_env_u64("JOBWATCH_REFRESH_INTERVAL_SECS", &raw)?;
        }

        // notifications
        if let Some(raw) = lookup("JOBWATCH_NOTIFY") {
            self.notifications.enabled = parse_env_bool("JOBWATCH_NOTIFY", &raw)?;
        }

        // logging
        if let Some(raw) = lookup("JOBWATCH_LOG_LEVEL") {
            self.logging.level = raw.trim().to_ascii_lowercase();
        }
        if let Some(raw) = lookup("JOBWATCH_LOG_FILE") {
            self.logging.file = Some(PathBuf::from(raw));
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.refresh_interval_secs == 0 {
            return Err(JobwatchError::InvalidConfig {
                details: "source.refresh_interval_secs must be at least 1".to_string(),
            });
        }
        if self.notifications.enabled && self.notifications.command.trim().is_empty() {
            return Err(JobwatchError::InvalidConfig {
                details: "notifications.command must not be empty when notifications are enabled"
                    .to_string(),
            });
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(JobwatchError::InvalidConfig {
                details: format!(
                    "logging.level {:?} is not one of {}",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }
        Ok(())
    }
}

/// Split a comma-separated list of job states, dropping empty entries.
#[must_use]
pub fn parse_state_list(raw: &str) -> Vec<JobState> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(JobState::from)
        .collect()
}

fn xdg_dir(var: &str, home_relative: &[&str]) -> PathBuf {
    if let Some(dir) = env_var(var) {
        return PathBuf::from(dir);
    }
    let home = env::var_os("HOME").map_or_else(
        || {
            tracing::warn!("HOME not set, falling back to /tmp for {var}");
            PathBuf::from("/tmp")
        },
        PathBuf::from,
    );
    home_relative.iter().fold(home, |path, part| path.join(part))
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env_u64(name: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|error| JobwatchError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}

fn parse_env_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(JobwatchError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: expected a boolean"),
        }),
    }
}
