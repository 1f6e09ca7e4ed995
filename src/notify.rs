//! Desktop notifications for job state changes.
//!
//! Notifications are fire-and-forget: a failing notifier is logged and never
//! interrupts polling or drawing.

#![allow(missing_docs)]

use std::process::{Command, Stdio};

use crate::core::config::NotificationConfig;
use crate::core::errors::{JobwatchError, Result};
use crate::model::{JobState, StateTransition};

/// Delivers one line of notification text somewhere the user will see it.
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;
    fn notify(&self, text: &str);
}

/// Runs an external command (`notify-send` by default) with the text as its
/// only argument.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    command: String,
}

impl DesktopNotifier {
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Run the command and wait for it. Output is discarded so it cannot
    /// land on the dashboard.
    pub fn send(&self, text: &str) -> Result<()> {
        let status = Command::new(&self.command)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| JobwatchError::io(&self.command, source))?;
        if status.success() {
            Ok(())
        } else {
            Err(JobwatchError::Runtime {
                details: format!("{} exited with {status}", self.command),
            })
        }
    }
}

impl Notifier for DesktopNotifier {
    fn name(&self) -> &'static str {
        "desktop"
    }

    fn notify(&self, text: &str) {
        if let Err(error) = self.send(text) {
            tracing::warn!(%error, code = error.code(), "desktop notification failed");
        }
    }
}

/// Drops everything. Used when notifications are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn name(&self) -> &'static str {
        "null"
    }

    fn notify(&self, _text: &str) {}
}

/// Build the notifier described by `config`.
#[must_use]
pub fn notifier_from_config(config: &NotificationConfig) -> Box<dyn Notifier> {
    if config.enabled {
        Box::new(DesktopNotifier::new(config.command.clone()))
    } else {
        Box::new(NullNotifier)
    }
}

/// Send one notification per transition into one of `states`. Returns how
/// many were sent.
pub fn notify_transitions(
    notifier: &dyn Notifier,
    transitions: &[StateTransition],
    states: &[JobState],
) -> usize {
    let mut sent = 0;
    for transition in transitions.iter().filter(|t| states.contains(&t.to)) {
        let text = transition.summary();
        tracing::debug!(notifier = notifier.name(), %text, "notifying state change");
        notifier.notify(&text);
        sent += 1;
    }
    sent
}
