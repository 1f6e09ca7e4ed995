//! Sort modes, the hide filter, and per-group aggregation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{Job, JobState};

/// How the job list is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Feed order.
    #[default]
    Unsorted,
    /// Partitioned by job group, groups ascending by id.
    Grouped,
}

impl SortMode {
    /// Numeric mode index (`0` unsorted, `1` grouped).
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Unsorted => 0,
            Self::Grouped => 1,
        }
    }

    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Unsorted),
            1 => Some(Self::Grouped),
            _ => None,
        }
    }

    /// Cycle to the next mode.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Unsorted => Self::Grouped,
            Self::Grouped => Self::Unsorted,
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "unsorted" | "none" | "0" => Some(Self::Unsorted),
            "grouped" | "group" | "1" => Some(Self::Grouped),
            _ => None,
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsorted => write!(f, "unsorted"),
            Self::Grouped => write!(f, "grouped"),
        }
    }
}

/// Suppresses jobs whose state is on a block-list, when enabled.
#[derive(Debug, Clone, Copy)]
pub struct HideFilter<'a> {
    pub enabled: bool,
    pub states: &'a [JobState],
}

impl HideFilter<'_> {
    #[must_use]
    pub fn hides(&self, job: &Job) -> bool {
        self.enabled && self.states.contains(&job.state)
    }
}

/// Partition jobs by group id. Keys iterate in ascending order; jobs keep
/// their feed order within a group.
#[must_use]
pub fn group_jobs(jobs: &[Job]) -> BTreeMap<i64, Vec<&Job>> {
    let mut groups: BTreeMap<i64, Vec<&Job>> = BTreeMap::new();
    for job in jobs {
        groups.entry(job.group_id).or_default().push(job);
    }
    groups
}

/// Aggregate counts of one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    pub total: usize,
    /// Keyed by state text, so iteration is lexicographic.
    pub status_counts: BTreeMap<String, usize>,
    pub hidden: usize,
}

impl GroupSummary {
    #[must_use]
    pub fn from_jobs(jobs: &[&Job], filter: HideFilter<'_>) -> Self {
        let mut status_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut hidden = 0;
        for job in jobs {
            if filter.hides(job) {
                hidden += 1;
            }
            *status_counts
                .entry(job.state.as_str().to_string())
                .or_default() += 1;
        }
        Self {
            total: jobs.len(),
            status_counts,
            hidden,
        }
    }

    /// `Total: 3, failed: 1, passed: 2 (hidden: 2)`
    #[must_use]
    pub fn footer(&self) -> String {
        let mut line = format!("Total: {}", self.total);
        for (status, count) in &self.status_counts {
            line.push_str(&format!(", {status}: {count}"));
        }
        if self.hidden > 0 {
            line.push_str(&format!(" (hidden: {})", self.hidden));
        }
        line
    }
}

/// Header line printed above a group.
#[must_use]
pub fn group_header(name: &str) -> String {
    format!("===== {name} ====================")
}
