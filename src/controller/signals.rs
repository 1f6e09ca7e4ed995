//! Signal listener: SIGWINCH becomes a redraw request, SIGINT/SIGTERM a
//! shutdown request.
//!
//! Uses `signal-hook`'s iterator so the actual work happens on an ordinary
//! thread; events are posted on a channel and consumed by the controller's
//! dispatcher one at a time.

use std::thread;

use crossbeam_channel::Sender;
use signal_hook::consts::{SIGINT, SIGTERM, SIGWINCH};
use signal_hook::iterator::{Handle, Signals};

use crate::core::errors::{JobwatchError, Result};

/// What a delivered signal means to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalEvent {
    Resize,
    Terminate,
}

impl SignalEvent {
    #[must_use]
    pub const fn from_signal(signal: i32) -> Option<Self> {
        match signal {
            SIGWINCH => Some(Self::Resize),
            SIGINT | SIGTERM => Some(Self::Terminate),
            _ => None,
        }
    }
}

/// Owns the signal registration and the thread forwarding signals as events.
pub struct SignalListener {
    handle: Handle,
    join: Option<thread::JoinHandle<()>>,
}

impl SignalListener {
    /// Register for SIGWINCH, SIGINT and SIGTERM and start forwarding.
    ///
    /// Forwarding stops when the listener is closed or every receiver is gone.
    pub fn spawn(events: Sender<SignalEvent>) -> Result<Self> {
        let mut signals =
            Signals::new([SIGWINCH, SIGINT, SIGTERM]).map_err(|source| JobwatchError::Runtime {
                details: format!("failed to register signal handlers: {source}"),
            })?;
        let handle = signals.handle();

        let join = thread::Builder::new()
            .name("jobwatch-signals".to_string())
            .spawn(move || {
                for signal in signals.forever() {
                    let Some(event) = SignalEvent::from_signal(signal) else {
                        continue;
                    };
                    tracing::debug!(signal, ?event, "signal received");
                    if events.send(event).is_err() {
                        break;
                    }
                }
            })
            .map_err(|source| JobwatchError::Runtime {
                details: format!("failed to spawn signal thread: {source}"),
            })?;

        Ok(Self {
            handle,
            join: Some(join),
        })
    }

    /// Stop listening and wait for the forwarding thread to finish.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.handle.close();
        if let Some(join) = self.join.take()
            && join.join().is_err()
        {
            tracing::warn!("signal thread panicked");
        }
    }
}

impl Drop for SignalListener {
    fn drop(&mut self) {
        self.shutdown();
    }
}
