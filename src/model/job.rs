//! Job and job-group records as received from the fetch collaborator.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wire format of job timestamps (`2024-03-01T12:34:56`, UTC, no offset).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Lifecycle state of a job.
///
/// The vocabulary is closed; anything the service reports outside of it is
/// kept verbatim in [`JobState::Unknown`] so it can still be displayed,
/// counted, and matched by the hide filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobState {
    Scheduled,
    Assigned,
    Running,
    Done,
    Passed,
    Softfail,
    Softfailed,
    Fail,
    Failed,
    Cancelled,
    UserCancelled,
    Unknown(String),
}

impl JobState {
    /// The service's spelling of this state.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Assigned => "assigned",
            Self::Running => "running",
            Self::Done => "done",
            Self::Passed => "passed",
            Self::Softfail => "softfail",
            Self::Softfailed => "softfailed",
            Self::Fail => "fail",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::UserCancelled => "user_cancelled",
            Self::Unknown(raw) => raw,
        }
    }

    /// Parse a state string. Matching is case-sensitive.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "scheduled" => Self::Scheduled,
            "assigned" => Self::Assigned,
            "running" => Self::Running,
            "done" => Self::Done,
            "passed" => Self::Passed,
            "softfail" => Self::Softfail,
            "softfailed" => Self::Softfailed,
            "fail" => Self::Fail,
            "failed" => Self::Failed,
            "cancelled" => Self::Cancelled,
            "user_cancelled" => Self::UserCancelled,
            other => Self::Unknown(other.to_string()),
        }
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    #[must_use]
    pub const fn is_scheduled(&self) -> bool {
        matches!(self, Self::Scheduled)
    }
}

impl From<&str> for JobState {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for JobState {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<JobState> for String {
    fn from(value: JobState) -> Self {
        match value {
            JobState::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Pad through the formatter so `{:<12}` works on the state itself.
        f.pad(self.as_str())
    }
}

/// A unit of remote work, immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub name: String,
    pub state: JobState,
    pub group_id: i64,
    #[serde(default)]
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished: Option<String>,
}

impl Job {
    /// Minimal job with no link and no timestamps.
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>, state: impl Into<JobState>, group_id: i64) -> Self {
        Self {
            id,
            name: name.into(),
            state: state.into(),
            group_id,
            link: String::new(),
            started: None,
            finished: None,
        }
    }

    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    #[must_use]
    pub fn with_started(mut self, started: impl Into<String>) -> Self {
        self.started = Some(started.into());
        self
    }

    #[must_use]
    pub fn with_finished(mut self, finished: impl Into<String>) -> Self {
        self.finished = Some(finished.into());
        self
    }

    /// Start time, if present and parseable.
    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started.as_deref().and_then(parse_timestamp)
    }

    /// Finish time, if present and parseable.
    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished.as_deref().and_then(parse_timestamp)
    }
}

/// Named collection of jobs, identified numerically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobGroup {
    pub id: i64,
    pub name: String,
}

impl JobGroup {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Parse a service timestamp as UTC. A trailing `Z` is tolerated.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim().trim_end_matches('Z');
    NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}
