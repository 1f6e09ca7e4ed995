#![allow(dead_code)]

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, ExitStatus};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use jobwatch::controller::Controller;
use jobwatch::model::parse_timestamp;
use jobwatch::render::Palette;
use jobwatch::terminal::FixedTerminal;

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Run the binary with an isolated config/state home so the developer's
/// own config never leaks into a test.
pub fn run_cli_case(case_name: &str, args: &[&str]) -> CmdResult {
    let root = std::env::temp_dir().join("jobwatch-test-logs");
    fs::create_dir_all(&root).expect("create temp test log dir");
    let home = tempfile::tempdir().expect("create isolated home");

    let log_path = root.join(format!("{}-{}.log", sanitize(case_name), now_millis()));
    let bin_path = PathBuf::from(env!("CARGO_BIN_EXE_jobwatch"));

    let output = Command::new(&bin_path)
        .args(args)
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_STATE_HOME", home.path().join("state"))
        .env_remove("JOBWATCH_JOBS_FILE")
        .env("RUST_BACKTRACE", "1")
        .output()
        .expect("execute jobwatch command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let mut log_content = String::new();
    log_content.push_str(&format!("case={case_name}\n"));
    log_content.push_str(&format!("bin={}\n", bin_path.display()));
    log_content.push_str(&format!("args={args:?}\n"));
    log_content.push_str(&format!("status={}\n", output.status));
    log_content.push_str("----- stdout -----\n");
    log_content.push_str(&stdout);
    log_content.push('\n');
    log_content.push_str("----- stderr -----\n");
    log_content.push_str(&stderr);
    log_content.push('\n');
    fs::write(&log_path, log_content).expect("write test log");

    CmdResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}

/// In-memory screen: every byte the controller writes, shared with the test.
#[derive(Clone, Default)]
pub struct Screen(Arc<Mutex<Vec<u8>>>);

impl Write for Screen {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Screen {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }

    /// Frames in write order, without the clear/home prefix.
    pub fn frames(&self) -> Vec<String> {
        self.text()
            .split(CLEAR_PREFIX)
            .filter(|frame| !frame.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// What crossterm emits for `Clear(All)` followed by `MoveTo(0, 0)`.
pub const CLEAR_PREFIX: &str = "\u{1b}[2J\u{1b}[1;1H";

pub fn fixed_now() -> DateTime<Utc> {
    parse_timestamp("2024-03-10T12:00:00").expect("valid timestamp")
}

/// Plain-palette controller drawing into `screen` at `columns` wide.
pub fn dashboard(screen: &Screen, columns: u16) -> Controller {
    let controller = Controller::new()
        .with_output(screen.clone())
        .with_terminal(FixedTerminal::new(columns, 40))
        .with_clock(fixed_now);
    controller.set_palette(Palette::plain());
    controller
}
