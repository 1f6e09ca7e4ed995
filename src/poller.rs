//! Poll thread: fetches snapshots on a ticker or on demand, feeds them to the
//! controller, notifies about state changes and redraws.
//!
//! Fetching happens outside the frame lock; only the snapshot swap and the
//! redraw take it.

#![allow(missing_docs)]

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Local;
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded, select, tick};

use crate::controller::Controller;
use crate::core::errors::{JobwatchError, Result};
use crate::model::{JobState, state_transitions};
use crate::notify::{Notifier, notify_transitions};
use crate::source::JobSource;

/// Pending requests beyond this are redundant: one refresh covers them all.
const REQUEST_CHANNEL_CAP: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollRequest {
    Refresh,
    Stop,
}

pub struct Poller {
    controller: Arc<Controller>,
    source: Box<dyn JobSource>,
    notifier: Box<dyn Notifier>,
    notify_states: Vec<JobState>,
}

impl Poller {
    #[must_use]
    pub fn new(
        controller: Arc<Controller>,
        source: Box<dyn JobSource>,
        notifier: Box<dyn Notifier>,
        notify_states: Vec<JobState>,
    ) -> Self {
        Self {
            controller,
            source,
            notifier,
            notify_states,
        }
    }

    /// One fetch cycle. The status line reports the outcome either way and
    /// the screen is redrawn. Returns the number of jobs fetched.
    pub fn refresh_once(&mut self) -> Result<usize> {
        match self.fetch() {
            Ok(count) => {
                self.controller.set_status(format!(
                    "Last refresh: {} ({count} jobs)",
                    Local::now().format("%H:%M:%S")
                ));
                self.controller.update();
                Ok(count)
            }
            Err(error) => {
                if error.is_retryable() {
                    tracing::warn!(%error, code = error.code(), "job refresh failed, retrying next cycle");
                } else {
                    tracing::error!(%error, code = error.code(), "job refresh failed");
                }
                self.controller.set_status(format!("Refresh failed: {error}"));
                self.controller.update();
                Err(error)
            }
        }
    }

    fn fetch(&mut self) -> Result<usize> {
        match self.source.fetch_groups() {
            Ok(groups) if !groups.is_empty() => self.controller.set_job_group_list(groups),
            Ok(_) => {}
            Err(error) => tracing::warn!(%error, "group refresh failed, keeping previous names"),
        }

        let jobs = self.source.fetch_jobs()?;
        let count = jobs.len();
        let previous = self.controller.replace_jobs(jobs.clone());
        let transitions = state_transitions(&previous, &jobs);
        let notified = notify_transitions(self.notifier.as_ref(), &transitions, &self.notify_states);
        tracing::debug!(
            jobs = count,
            changed = transitions.len(),
            notified,
            "snapshot applied"
        );
        Ok(count)
    }

    /// Refresh now, then every `interval` and whenever a refresh is requested.
    pub fn spawn(mut self, interval: Duration) -> Result<PollerHandle> {
        let (requests_tx, requests_rx) = bounded(REQUEST_CHANNEL_CAP);
        let join = thread::Builder::new()
            .name("jobwatch-poll".to_string())
            .spawn(move || {
                let _ = self.refresh_once();
                self.run(&requests_rx, interval);
            })
            .map_err(|source| JobwatchError::Runtime {
                details: format!("failed to spawn poll thread: {source}"),
            })?;

        Ok(PollerHandle {
            requests: requests_tx,
            join: Some(join),
        })
    }

    fn run(&mut self, requests: &Receiver<PollRequest>, interval: Duration) {
        let ticker = tick(interval);
        loop {
            select! {
                recv(ticker) -> _ => {
                    let _ = self.refresh_once();
                }
                recv(requests) -> request => match request {
                    Ok(PollRequest::Refresh) => {
                        let _ = self.refresh_once();
                    }
                    Ok(PollRequest::Stop) | Err(_) => break,
                },
            }
        }
        tracing::debug!("poll thread stopped");
    }
}

/// Queue a refresh on `requests`. A full queue already holds one, so that
/// counts as success; a poll thread that has exited is `ChannelClosed`.
pub fn request_refresh(requests: &Sender<PollRequest>) -> Result<()> {
    match requests.try_send(PollRequest::Refresh) {
        Ok(()) | Err(TrySendError::Full(_)) => Ok(()),
        Err(TrySendError::Disconnected(_)) => Err(JobwatchError::ChannelClosed { component: "poll" }),
    }
}

/// Control side of a running [`Poller`].
pub struct PollerHandle {
    requests: Sender<PollRequest>,
    join: Option<thread::JoinHandle<()>>,
}

impl PollerHandle {
    /// Ask for an immediate refresh. Coalesced when refreshes are already
    /// queued.
    pub fn refresh(&self) -> Result<()> {
        request_refresh(&self.requests)
    }

    /// A cloneable sender for requests, for use from key handlers.
    #[must_use]
    pub fn requester(&self) -> Sender<PollRequest> {
        self.requests.clone()
    }

    /// Stop polling and wait for an in-flight fetch to finish.
    pub fn stop(mut self) {
        let _ = self.requests.send(PollRequest::Stop);
        if let Some(join) = self.join.take()
            && join.join().is_err()
        {
            tracing::warn!("poll thread panicked");
        }
    }
}
