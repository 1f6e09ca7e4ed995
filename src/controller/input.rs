//! Background keypress reader: one byte at a time, handed to a callback.

use std::io::{self, ErrorKind, Read};
use std::sync::Arc;
use std::thread;

use crate::core::errors::{JobwatchError, Result};

/// Callback invoked with every byte read from the input stream.
pub type KeyHandler = Arc<dyn Fn(u8) + Send + Sync>;

/// Dashboard commands bound to single keys (see the help line).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Refresh,
    ToggleHide,
    ToggleTracker,
    SwitchSorting,
}

impl KeyAction {
    #[must_use]
    pub const fn from_key(byte: u8) -> Option<Self> {
        match byte {
            b'q' => Some(Self::Quit),
            b'r' => Some(Self::Refresh),
            b'h' => Some(Self::ToggleHide),
            b'm' => Some(Self::ToggleTracker),
            b's' => Some(Self::SwitchSorting),
            _ => None,
        }
    }
}

/// Feed `reader` to `on_key` byte by byte until end of input.
///
/// Returns `Ok(())` on a clean end of stream and the first read error
/// otherwise. Interrupted reads are retried.
pub fn read_keys<R: Read, F: FnMut(u8)>(mut reader: R, mut on_key: F) -> io::Result<()> {
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) => return Ok(()),
            Ok(_) => on_key(byte[0]),
            Err(error) if error.kind() == ErrorKind::Interrupted => {}
            Err(error) => return Err(error),
        }
    }
}

/// Run [`read_keys`] on its own thread. The thread ends with the stream;
/// errors are logged, never retried.
pub fn spawn_input_reader<R, F>(reader: R, on_key: F) -> Result<thread::JoinHandle<()>>
where
    R: Read + Send + 'static,
    F: FnMut(u8) + Send + 'static,
{
    thread::Builder::new()
        .name("jobwatch-input".to_string())
        .spawn(move || match read_keys(reader, on_key) {
            Ok(()) => tracing::debug!("input stream closed, keypress handling stopped"),
            Err(error) => {
                tracing::warn!(%error, "input stream error, keypress handling stopped");
            }
        })
        .map_err(|source| JobwatchError::Runtime {
            details: format!("failed to spawn input thread: {source}"),
        })
}
