//! The dashboard controller: owns the job model and display settings behind
//! one lock and turns refresh calls, keypresses and signals into frames.
//!
//! Every frame is produced under the lock, so frames never interleave and
//! each one reflects the model as it was when the lock was taken. Setters
//! and getters take the same lock; none of them are hot.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use jobwatch::controller::Controller;
//! use jobwatch::model::Job;
//!
//! let dashboard = Arc::new(Controller::new());
//! dashboard.apply(vec![Job::new(1, "boot", "running", 7)]);
//! dashboard.update();
//! ```

#![allow(missing_docs)]

pub mod input;
#[cfg(unix)]
pub mod signals;

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;
use std::thread;

use chrono::{DateTime, Utc};
use crossbeam_channel::{Receiver, Sender, bounded};
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use parking_lot::{Mutex, RwLock};

use crate::core::errors::{JobwatchError, Result};
use crate::model::{Job, JobGroup, JobModel, JobState};
use crate::render::{DisplaySettings, Palette, SortMode, render_frame};
use crate::terminal::{CrosstermTerminal, TerminalSize};

pub use input::{KeyAction, KeyHandler, read_keys, spawn_input_reader};
#[cfg(unix)]
pub use signals::{SignalEvent, SignalListener};

/// Signal events buffered between the listener and the dispatcher.
#[cfg(unix)]
const SIGNAL_CHANNEL_CAP: usize = 16;

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// State guarded by the frame lock.
struct Dashboard {
    model: JobModel,
    settings: DisplaySettings,
    out: Box<dyn Write + Send>,
}

pub struct Controller {
    dashboard: Mutex<Dashboard>,
    terminal: Box<dyn TerminalSize>,
    clock: Clock,
    keypress: RwLock<Option<KeyHandler>>,
    done_tx: Sender<()>,
    done_rx: Receiver<()>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    /// Empty model, default settings, drawing to stdout at the real
    /// terminal size.
    #[must_use]
    pub fn new() -> Self {
        let (done_tx, done_rx) = bounded(1);
        Self {
            dashboard: Mutex::new(Dashboard {
                model: JobModel::new(),
                settings: DisplaySettings::default(),
                out: Box::new(io::stdout()),
            }),
            terminal: Box::new(CrosstermTerminal),
            clock: Box::new(Utc::now),
            keypress: RwLock::new(None),
            done_tx,
            done_rx,
        }
    }

    /// Draw frames to `out` instead of stdout.
    #[must_use]
    pub fn with_output(self, out: impl Write + Send + 'static) -> Self {
        self.dashboard.lock().out = Box::new(out);
        self
    }

    /// Use `terminal` for size queries.
    #[must_use]
    pub fn with_terminal(mut self, terminal: impl TerminalSize + 'static) -> Self {
        self.terminal = Box::new(terminal);
        self
    }

    /// Use `clock` as "now" when coloring timestamps by age.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    // ──────────────────── model ────────────────────

    /// Replace the job snapshot.
    pub fn apply(&self, jobs: Vec<Job>) {
        self.dashboard.lock().model.apply(jobs);
    }

    /// Replace the job snapshot, returning the one it replaced.
    pub fn replace_jobs(&self, jobs: Vec<Job>) -> Vec<Job> {
        let mut dashboard = self.dashboard.lock();
        let previous = dashboard.model.jobs().to_vec();
        dashboard.model.apply(jobs);
        previous
    }

    pub fn set_job_groups(&self, groups: HashMap<i64, JobGroup>) {
        self.dashboard.lock().model.set_job_groups(groups);
    }

    pub fn set_job_group_list(&self, groups: Vec<JobGroup>) {
        self.dashboard.lock().model.set_job_group_list(groups);
    }

    pub fn group(&self, id: i64) -> Option<JobGroup> {
        self.dashboard.lock().model.group(id).cloned()
    }

    pub fn add_reviewed_job(&self, id: i64) -> bool {
        self.dashboard.lock().model.add_reviewed_job(id)
    }

    pub fn remove_reviewed_job(&self, id: i64) -> bool {
        self.dashboard.lock().model.remove_reviewed_job(id)
    }

    pub fn is_reviewed(&self, id: i64) -> bool {
        self.dashboard.lock().model.is_reviewed(id)
    }

    pub fn reviewed_jobs(&self) -> Vec<i64> {
        self.dashboard.lock().model.reviewed().to_vec()
    }

    /// Copy of the current snapshot, in feed order.
    pub fn jobs(&self) -> Vec<Job> {
        self.dashboard.lock().model.jobs().to_vec()
    }

    /// Read the model under the frame lock.
    pub fn with_model<T>(&self, read: impl FnOnce(&JobModel) -> T) -> T {
        read(&self.dashboard.lock().model)
    }

    // ──────────────────── settings ────────────────────

    pub fn set_hide(&self, hide: bool) {
        self.dashboard.lock().settings.hide = hide;
    }

    pub fn hide(&self) -> bool {
        self.dashboard.lock().settings.hide
    }

    /// Flip the hide filter, returning the new value.
    pub fn toggle_hide(&self) -> bool {
        let mut dashboard = self.dashboard.lock();
        dashboard.settings.hide = !dashboard.settings.hide;
        dashboard.settings.hide
    }

    pub fn set_hide_status<I, S>(&self, states: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<JobState>,
    {
        let states: Vec<JobState> = states.into_iter().map(Into::into).collect();
        self.dashboard.lock().settings.hide_status = states;
    }

    pub fn hide_status(&self) -> Vec<JobState> {
        self.dashboard.lock().settings.hide_status.clone()
    }

    pub fn set_sorting(&self, sorting: SortMode) {
        self.dashboard.lock().settings.sorting = sorting;
    }

    pub fn sorting(&self) -> SortMode {
        self.dashboard.lock().settings.sorting
    }

    /// Switch to the next sort mode, returning it.
    pub fn cycle_sorting(&self) -> SortMode {
        let mut dashboard = self.dashboard.lock();
        dashboard.settings.sorting = dashboard.settings.sorting.next();
        dashboard.settings.sorting
    }

    pub fn set_status(&self, status: impl Into<String>) {
        self.dashboard.lock().settings.status = status.into();
    }

    pub fn status(&self) -> String {
        self.dashboard.lock().settings.status.clone()
    }

    pub fn set_tracker(&self, tracker: impl Into<String>) {
        self.dashboard.lock().settings.tracker = tracker.into();
    }

    pub fn tracker(&self) -> String {
        self.dashboard.lock().settings.tracker.clone()
    }

    pub fn set_header(&self, header: impl Into<String>) {
        self.dashboard.lock().settings.header = header.into();
    }

    pub fn header(&self) -> String {
        self.dashboard.lock().settings.header.clone()
    }

    pub fn set_show_tracker(&self, show: bool) {
        self.dashboard.lock().settings.show_tracker = show;
    }

    pub fn show_tracker(&self) -> bool {
        self.dashboard.lock().settings.show_tracker
    }

    /// Flip tracker visibility, returning the new value.
    pub fn toggle_tracker(&self) -> bool {
        let mut dashboard = self.dashboard.lock();
        dashboard.settings.show_tracker = !dashboard.settings.show_tracker;
        dashboard.settings.show_tracker
    }

    pub fn set_show_status(&self, show: bool) {
        self.dashboard.lock().settings.show_status = show;
    }

    pub fn show_status(&self) -> bool {
        self.dashboard.lock().settings.show_status
    }

    pub fn set_palette(&self, palette: Palette) {
        self.dashboard.lock().settings.palette = palette;
    }

    /// Install the callback the input reader feeds every byte to.
    pub fn set_keypress_handler(&self, handler: impl Fn(u8) + Send + Sync + 'static) {
        *self.keypress.write() = Some(Arc::new(handler));
    }

    // ──────────────────── redraw ────────────────────

    /// Redraw the screen. Returns `false` when the frame was skipped because
    /// the terminal size is unavailable or the output failed.
    pub fn update(&self) -> bool {
        let mut guard = self.dashboard.lock();
        let dashboard = &mut *guard;

        let (columns, _rows) = match self.terminal.size() {
            Ok(size) => size,
            Err(error) => {
                tracing::debug!(%error, "terminal size unavailable, frame skipped");
                return false;
            }
        };

        let frame = render_frame(
            &dashboard.model,
            &dashboard.settings,
            usize::from(columns),
            (self.clock)(),
        );
        if let Err(error) = write_frame(&mut dashboard.out, &frame) {
            tracing::warn!(%error, "failed to write frame");
            return false;
        }
        true
    }

    // ──────────────────── lifecycle ────────────────────

    /// Start the keypress reader on stdin and the signal-driven redraw and
    /// shutdown handling.
    pub fn start(self: &Arc<Self>) -> Result<Runtime> {
        let controller = Arc::clone(self);
        let input = spawn_input_reader(io::stdin(), move |byte| controller.dispatch_key(byte))?;
        let mut runtime = Runtime {
            input,
            #[cfg(unix)]
            signals: None,
            dispatcher: None,
        };

        #[cfg(unix)]
        {
            let (signal_tx, signal_rx) = bounded(SIGNAL_CHANNEL_CAP);
            runtime.signals = Some(SignalListener::spawn(signal_tx)?);
            let controller = Arc::clone(self);
            let dispatcher = thread::Builder::new()
                .name("jobwatch-redraw".to_string())
                .spawn(move || {
                    for event in signal_rx {
                        controller.handle_signal(event);
                    }
                })
                .map_err(|source| JobwatchError::Runtime {
                    details: format!("failed to spawn redraw thread: {source}"),
                })?;
            runtime.dispatcher = Some(dispatcher);
        }

        Ok(runtime)
    }

    /// Act on one signal event: redraw on resize, complete termination on
    /// interrupt/terminate.
    #[cfg(unix)]
    pub fn handle_signal(&self, event: SignalEvent) {
        match event {
            SignalEvent::Resize => {
                self.update();
            }
            SignalEvent::Terminate => {
                tracing::info!("termination signal received");
                self.request_shutdown();
            }
        }
    }

    /// Carry out a key command. Display toggles redraw immediately; quit
    /// completes termination. Refresh needs a job source, so it is left to
    /// the caller and reported as `false`.
    pub fn perform(&self, action: KeyAction) -> bool {
        match action {
            KeyAction::Quit => self.request_shutdown(),
            KeyAction::Refresh => return false,
            KeyAction::ToggleHide => {
                self.toggle_hide();
                self.update();
            }
            KeyAction::ToggleTracker => {
                self.toggle_tracker();
                self.update();
            }
            KeyAction::SwitchSorting => {
                self.cycle_sorting();
                self.update();
            }
        }
        true
    }

    /// Hand a byte to the keypress callback, if one is installed. The
    /// callback runs without any controller lock held.
    pub fn dispatch_key(&self, byte: u8) {
        let handler = self.keypress.read().clone();
        if let Some(handler) = handler {
            handler(byte);
        }
    }

    /// Complete [`await_termination`](Self::await_termination). Repeated
    /// requests are absorbed.
    pub fn request_shutdown(&self) {
        let _ = self.done_tx.try_send(());
    }

    /// Block until a shutdown is requested, by signal or programmatically.
    pub fn await_termination(&self) {
        // The controller keeps its own sender alive, so this cannot disconnect.
        let _ = self.done_rx.recv();
    }
}

/// Background threads started by [`Controller::start`].
pub struct Runtime {
    /// The keypress reader. It blocks on stdin and ends with the stream, so
    /// it is never joined.
    pub input: thread::JoinHandle<()>,
    #[cfg(unix)]
    signals: Option<SignalListener>,
    dispatcher: Option<thread::JoinHandle<()>>,
}

impl Runtime {
    /// Stop signal handling and wait for the redraw dispatcher to drain.
    pub fn stop(mut self) {
        #[cfg(unix)]
        if let Some(signals) = self.signals.take() {
            signals.close();
        }
        if let Some(dispatcher) = self.dispatcher.take()
            && dispatcher.join().is_err()
        {
            tracing::warn!("redraw thread panicked");
        }
    }
}

fn write_frame<W: Write>(out: &mut W, frame: &str) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    out.write_all(frame.as_bytes())?;
    out.flush()
}
