//! In-memory job model: the current snapshot, group metadata, reviewed ids.
//!
//! The model itself is plain data. Thread safety comes from the
//! [`Controller`](crate::controller::Controller), which keeps the model behind
//! the same lock that serializes frames, so a render always sees one complete
//! snapshot.

use std::collections::HashMap;

use super::job::{Job, JobGroup};

#[derive(Debug, Clone, Default)]
pub struct JobModel {
    jobs: Vec<Job>,
    groups: HashMap<i64, JobGroup>,
    /// Insertion-ordered, duplicate-free.
    reviewed: Vec<i64>,
}

impl JobModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole job sequence. No merge, no validation.
    pub fn apply(&mut self, jobs: Vec<Job>) {
        self.jobs = jobs;
    }

    /// Replace the group mapping.
    pub fn set_job_groups(&mut self, groups: HashMap<i64, JobGroup>) {
        self.groups = groups;
    }

    /// Replace the group mapping from a list; later entries win on duplicate ids.
    pub fn set_job_group_list(&mut self, groups: impl IntoIterator<Item = JobGroup>) {
        self.groups = groups.into_iter().map(|group| (group.id, group)).collect();
    }

    /// Mark a job as reviewed. Returns `false` if it already was.
    pub fn add_reviewed_job(&mut self, id: i64) -> bool {
        if self.reviewed.contains(&id) {
            return false;
        }
        self.reviewed.push(id);
        true
    }

    /// Unmark a job. Remaining ids keep their relative order.
    /// Returns `false` if the id was not reviewed.
    pub fn remove_reviewed_job(&mut self, id: i64) -> bool {
        let before = self.reviewed.len();
        self.reviewed.retain(|&reviewed| reviewed != id);
        self.reviewed.len() != before
    }

    #[must_use]
    pub fn is_reviewed(&self, id: i64) -> bool {
        self.reviewed.contains(&id)
    }

    #[must_use]
    pub fn reviewed(&self) -> &[i64] {
        &self.reviewed
    }

    #[must_use]
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    #[must_use]
    pub fn group(&self, id: i64) -> Option<&JobGroup> {
        self.groups.get(&id)
    }

    /// Display name of a group; unknown groups render with an empty name.
    #[must_use]
    pub fn group_name(&self, id: i64) -> &str {
        self.groups.get(&id).map_or("", |group| group.name.as_str())
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}
