//! Job records and the in-memory model the dashboard renders from.

#![allow(missing_docs)]

pub mod changes;
pub mod job;
pub mod store;

pub use changes::{StateTransition, state_transitions};
pub use job::{Job, JobGroup, JobState, parse_timestamp};
pub use store::JobModel;
