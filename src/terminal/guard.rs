//! RAII terminal lifecycle guard.
//!
//! [`TerminalGuard`] switches stdin to cbreak mode (byte-at-a-time reads, no
//! echo, signals still generated) and enters the alternate screen on
//! construction, and restores both on [`Drop`]. A panic hook does the same
//! *before* the default panic message is printed, so the message lands on
//! the normal screen and the shell gets its echo back even when the release
//! profile aborts on panic and no destructor runs.

use std::io::{self, Write};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
#[cfg(unix)]
use parking_lot::Mutex;

/// Set while the alternate screen is active. Checked by the panic hook.
static ALT_SCREEN_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Input mode to put back on stdin. Taken by whichever of drop or the panic
/// hook runs first.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<nix::sys::termios::Termios>> = Mutex::new(None);

const ALT_SCREEN_LEAVE: &[u8] = b"\x1b[?1049l";
const CURSOR_SHOW: &[u8] = b"\x1b[?25h";

pub struct TerminalGuard {
    hook_installed: bool,
}

impl TerminalGuard {
    /// Enter cbreak mode and the alternate screen.
    ///
    /// Cbreak is best effort: when stdin is not a terminal the guard still
    /// works, and keypresses simply arrive line-buffered.
    pub fn enter() -> io::Result<Self> {
        #[cfg(unix)]
        match cbreak::enable(io::stdin()) {
            Ok(saved) => *SAVED_TERMIOS.lock() = Some(saved),
            Err(error) => tracing::debug!(%error, "stdin cbreak mode unavailable"),
        }

        if let Err(error) = execute!(io::stdout(), EnterAlternateScreen) {
            #[cfg(unix)]
            restore_input_best_effort(io::stdin());
            return Err(error);
        }
        ALT_SCREEN_ACTIVE.store(true, Ordering::SeqCst);

        let prev = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            restore_screen_best_effort();
            #[cfg(unix)]
            restore_input_best_effort(io::stdin());
            prev(info);
        }));

        Ok(Self {
            hook_installed: true,
        })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if ALT_SCREEN_ACTIVE.swap(false, Ordering::SeqCst) {
            let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        }

        #[cfg(unix)]
        restore_input_best_effort(io::stdin());

        if self.hook_installed {
            // The previous hook was moved into ours; fall back to the default.
            let _ = panic::take_hook();
        }
    }
}

/// Leave the alternate screen. Idempotent.
fn restore_screen_best_effort() {
    if ALT_SCREEN_ACTIVE.swap(false, Ordering::SeqCst) {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(ALT_SCREEN_LEAVE);
        let _ = stdout.write_all(CURSOR_SHOW);
        let _ = stdout.flush();
    }
}

/// Put back the saved input mode on `fd`. Returns whether anything was
/// restored; a second call is a no-op.
#[cfg(unix)]
fn restore_input_best_effort<Fd: std::os::fd::AsFd>(fd: Fd) -> bool {
    // `try_lock`: the panic may have happened while the lock was held.
    let Some(saved) = SAVED_TERMIOS.try_lock().and_then(|mut slot| slot.take()) else {
        return false;
    };
    if let Err(error) = cbreak::restore(fd, &saved) {
        tracing::warn!(%error, "failed to restore terminal input mode");
        return false;
    }
    true
}

#[cfg(unix)]
mod cbreak {
    use std::os::fd::AsFd;

    use nix::sys::termios::{self, LocalFlags, SetArg, SpecialCharacterIndices, Termios};

    /// Disable canonical mode and echo, returning the previous settings.
    pub(super) fn enable<Fd: AsFd>(fd: Fd) -> nix::Result<Termios> {
        let saved = termios::tcgetattr(&fd)?;
        let mut raw = saved.clone();
        raw.local_flags.remove(LocalFlags::ICANON | LocalFlags::ECHO);
        raw.control_chars[SpecialCharacterIndices::VMIN as usize] = 1;
        raw.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;
        termios::tcsetattr(&fd, SetArg::TCSANOW, &raw)?;
        Ok(saved)
    }

    pub(super) fn restore<Fd: AsFd>(fd: Fd, saved: &Termios) -> nix::Result<()> {
        termios::tcsetattr(fd, SetArg::TCSANOW, saved)
    }
}
