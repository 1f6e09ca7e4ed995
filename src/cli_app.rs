//! Top-level CLI definition and the interactive dashboard run.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::control;
use thiserror::Error;

use jobwatch::controller::{Controller, KeyAction};
use jobwatch::core::config::{Config, parse_state_list};
use jobwatch::core::errors::JobwatchError;
use jobwatch::logging::{self, LogTarget};
use jobwatch::notify::notifier_from_config;
use jobwatch::poller::{Poller, request_refresh};
use jobwatch::render::{Palette, SortMode};
use jobwatch::source::SnapshotFileSource;
use jobwatch::terminal::TerminalGuard;

/// jobwatch: live terminal dashboard for remote build/test jobs.
#[derive(Debug, Parser)]
#[command(name = "jobwatch", author, version, long_about = None)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// JSON snapshot of jobs, re-read on every refresh.
    #[arg(long, value_name = "PATH")]
    jobs: Option<PathBuf>,
    /// JSON list of job groups.
    #[arg(long, value_name = "PATH")]
    groups: Option<PathBuf>,
    /// Seconds between refreshes.
    #[arg(long, value_name = "SECS")]
    interval: Option<u64>,
    /// Comma-separated job states hidden while hiding is on.
    #[arg(long, value_name = "LIST")]
    hide_status: Option<String>,
    /// Start with jobs grouped by job group.
    #[arg(long)]
    grouped: bool,
    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
    /// Send desktop notifications for jobs that fail.
    #[arg(long)]
    notify: bool,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// Terminal setup failed.
    #[error("terminal setup failed: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
        }
    }
}

impl From<JobwatchError> for CliError {
    fn from(error: JobwatchError) -> Self {
        match error {
            JobwatchError::InvalidConfig { .. }
            | JobwatchError::MissingConfig { .. }
            | JobwatchError::ConfigParse { .. } => Self::User(error.to_string()),
            other => Self::Runtime(other.to_string()),
        }
    }
}

/// Run the dashboard until `q`, SIGINT or SIGTERM.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    let config = effective_config(cli)?;
    let log_target = logging::init(&config.logging);
    let jobs_file = config.source.jobs_file.clone().ok_or_else(|| {
        CliError::User("no jobs file: pass --jobs or set source.jobs_file".to_string())
    })?;
    tracing::info!(
        jobs_file = %jobs_file.display(),
        interval_secs = config.source.refresh_interval_secs,
        ?log_target,
        "starting dashboard"
    );

    let controller = Arc::new(Controller::new());
    configure(&controller, &config, cli.no_color);

    let mut source = SnapshotFileSource::new(jobs_file);
    if let Some(groups_file) = &config.source.groups_file {
        source = source.with_groups_file(groups_file);
    }
    let poller = Poller::new(
        Arc::clone(&controller),
        Box::new(source),
        notifier_from_config(&config.notifications),
        config.notifications.states.clone(),
    );

    let guard = TerminalGuard::enter()?;
    let poll = poller.spawn(Duration::from_secs(config.source.refresh_interval_secs))?;

    let requests = poll.requester();
    let weak = Arc::downgrade(&controller);
    controller.set_keypress_handler(move |byte| {
        let (Some(action), Some(controller)) = (KeyAction::from_key(byte), weak.upgrade()) else {
            return;
        };
        if !controller.perform(action)
            && action == KeyAction::Refresh
            && let Err(error) = request_refresh(&requests)
        {
            tracing::debug!(%error, "refresh key ignored");
        }
    });

    let runtime = controller.start()?;
    controller.update();
    controller.await_termination();

    tracing::info!("shutting down");
    runtime.stop();
    poll.stop();
    drop(guard);
    if let LogTarget::File(path) = log_target {
        tracing::debug!(path = %path.display(), "log file closed");
    }
    Ok(())
}

/// Config file and environment, then command-line flags on top.
fn effective_config(cli: &Cli) -> Result<Config, CliError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(jobs) = &cli.jobs {
        config.source.jobs_file = Some(jobs.clone());
    }
    if let Some(groups) = &cli.groups {
        config.source.groups_file = Some(groups.clone());
    }
    if let Some(interval) = cli.interval {
        config.source.refresh_interval_secs = interval;
    }
    if let Some(list) = &cli.hide_status {
        config.display.hide_status = parse_state_list(list);
    }
    if cli.grouped {
        config.display.sorting = SortMode::Grouped;
    }
    if cli.no_color {
        config.display.color = false;
    }
    if cli.notify {
        config.notifications.enabled = true;
    }
    config.validate()?;
    Ok(config)
}

fn configure(controller: &Controller, config: &Config, no_color: bool) {
    let display = &config.display;
    controller.set_hide(display.hide);
    controller.set_hide_status(display.hide_status.iter().cloned());
    controller.set_sorting(display.sorting);
    controller.set_show_tracker(display.show_tracker);
    controller.set_show_status(display.show_status);
    controller.set_header(display.header.clone());
    controller.set_palette(if no_color || !display.color {
        Palette::plain()
    } else {
        Palette::from_environment()
    });
}
