//! State transitions between two consecutive snapshots.

use std::collections::HashMap;

use super::job::{Job, JobState};

/// One job that changed state between fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub id: i64,
    pub name: String,
    pub from: JobState,
    pub to: JobState,
}

impl StateTransition {
    /// Notification text, e.g. `boot (42): running -> failed`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{} ({}): {} -> {}", self.name, self.id, self.from, self.to)
    }
}

/// Jobs present in both snapshots whose state differs, in `current` order.
///
/// Jobs that appear or disappear are not transitions. With duplicate ids the
/// last occurrence in `previous` is the reference.
#[must_use]
pub fn state_transitions(previous: &[Job], current: &[Job]) -> Vec<StateTransition> {
    let before: HashMap<i64, &JobState> = previous.iter().map(|job| (job.id, &job.state)).collect();

    current
        .iter()
        .filter_map(|job| {
            let old = before.get(&job.id)?;
            (**old != job.state).then(|| StateTransition {
                id: job.id,
                name: job.name.clone(),
                from: (*old).clone(),
                to: job.state.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_only_changed_jobs() {
        let previous = vec![
            Job::new(1, "boot", "running", 1),
            Job::new(2, "kernel", "passed", 1),
        ];
        let current = vec![
            Job::new(2, "kernel", "passed", 1),
            Job::new(1, "boot", "failed", 1),
            Job::new(3, "new", "scheduled", 1),
        ];

        let transitions = state_transitions(&previous, &current);
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].id, 1);
        assert_eq!(transitions[0].from, JobState::Running);
        assert_eq!(transitions[0].to, JobState::Failed);
        assert_eq!(transitions[0].summary(), "boot (1): running -> failed");
    }

    #[test]
    fn empty_previous_snapshot_yields_nothing() {
        let current = vec![Job::new(1, "boot", "failed", 1)];
        assert!(state_transitions(&[], &current).is_empty());
    }
}
