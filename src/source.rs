//! Job sources: where snapshots come from.
//!
//! The dashboard only needs "give me the current jobs" and, optionally, the
//! group names. [`SnapshotFileSource`] reads both from JSON files shaped
//! like the openQA REST responses, so a cron job or a `curl` loop can feed
//! the dashboard.

#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::errors::{JobwatchError, Result};
use crate::model::{Job, JobGroup, JobState};

/// Fetch collaborator. Called from the poll thread, never under the frame lock.
pub trait JobSource: Send {
    fn fetch_jobs(&mut self) -> Result<Vec<Job>>;

    /// Group id to name mapping. Sources without group information return
    /// an empty list.
    fn fetch_groups(&mut self) -> Result<Vec<JobGroup>> {
        Ok(Vec::new())
    }
}

/// Re-reads a jobs file (and optionally a groups file) on every fetch.
#[derive(Debug, Clone)]
pub struct SnapshotFileSource {
    jobs_file: PathBuf,
    groups_file: Option<PathBuf>,
}

impl SnapshotFileSource {
    #[must_use]
    pub fn new(jobs_file: impl Into<PathBuf>) -> Self {
        Self {
            jobs_file: jobs_file.into(),
            groups_file: None,
        }
    }

    #[must_use]
    pub fn with_groups_file(mut self, groups_file: impl Into<PathBuf>) -> Self {
        self.groups_file = Some(groups_file.into());
        self
    }

    #[must_use]
    pub fn jobs_file(&self) -> &Path {
        &self.jobs_file
    }
}

impl JobSource for SnapshotFileSource {
    fn fetch_jobs(&mut self) -> Result<Vec<Job>> {
        let raw = read(&self.jobs_file)?;
        parse_jobs(&raw)
    }

    fn fetch_groups(&mut self) -> Result<Vec<JobGroup>> {
        match &self.groups_file {
            Some(path) => parse_groups(&read(path)?),
            None => Ok(Vec::new()),
        }
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| JobwatchError::io(path, source))
}

// ──────────────────── wire format ────────────────────

/// One job as the service reports it.
#[derive(Debug, Deserialize)]
struct JobRecord {
    id: i64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    test: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    group_id: Option<i64>,
    #[serde(default)]
    t_started: Option<String>,
    #[serde(default)]
    t_finished: Option<String>,
    #[serde(default)]
    link: Option<String>,
}

impl JobRecord {
    /// Finished jobs report their outcome in `result`.
    fn effective_state(&self) -> JobState {
        match self.result.as_deref() {
            Some(result) if self.state == "done" && !result.is_empty() => JobState::from(result),
            _ => JobState::from(self.state.as_str()),
        }
    }

    fn into_job(self) -> Job {
        let state = self.effective_state();
        let name = if self.name.is_empty() { self.test } else { self.name };
        Job {
            id: self.id,
            name,
            state,
            group_id: self.group_id.unwrap_or(0),
            link: self.link.unwrap_or_default(),
            started: self.t_started.filter(|t| !t.is_empty()),
            finished: self.t_finished.filter(|t| !t.is_empty()),
        }
    }
}

/// Either a bare list or the `{"jobs": [...]}` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JobsDocument {
    List(Vec<JobRecord>),
    Envelope { jobs: Vec<JobRecord> },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GroupsDocument {
    List(Vec<JobGroup>),
    Envelope { job_groups: Vec<JobGroup> },
}

/// Parse a jobs document into model jobs, in document order.
pub fn parse_jobs(raw: &str) -> Result<Vec<Job>> {
    let records = match serde_json::from_str::<JobsDocument>(raw)? {
        JobsDocument::List(records) | JobsDocument::Envelope { jobs: records } => records,
    };
    Ok(records.into_iter().map(JobRecord::into_job).collect())
}

pub fn parse_groups(raw: &str) -> Result<Vec<JobGroup>> {
    match serde_json::from_str::<GroupsDocument>(raw)? {
        GroupsDocument::List(groups) | GroupsDocument::Envelope { job_groups: groups } => {
            Ok(groups)
        }
    }
}
