//! Terminal capabilities: size queries and the screen/input-mode guard.

#![allow(missing_docs)]

pub mod guard;

use crate::core::errors::{JobwatchError, Result};

pub use guard::TerminalGuard;

/// "Current (columns, rows) or fail."
///
/// Redraws skip the frame when this fails instead of guessing dimensions.
pub trait TerminalSize: Send + Sync {
    fn size(&self) -> Result<(u16, u16)>;
}

/// Queries the controlling terminal through crossterm.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrosstermTerminal;

impl TerminalSize for CrosstermTerminal {
    fn size(&self) -> Result<(u16, u16)> {
        crossterm::terminal::size().map_err(|error| JobwatchError::TerminalQuery {
            details: error.to_string(),
        })
    }
}

/// Fixed dimensions, for tests and headless rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedTerminal {
    pub columns: u16,
    pub rows: u16,
}

impl FixedTerminal {
    #[must_use]
    pub const fn new(columns: u16, rows: u16) -> Self {
        Self { columns, rows }
    }
}

impl TerminalSize for FixedTerminal {
    fn size(&self) -> Result<(u16, u16)> {
        Ok((self.columns, self.rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_terminal_reports_its_dimensions() {
        let terminal = FixedTerminal::new(132, 43);
        assert_eq!(terminal.size().unwrap(), (132, 43));
    }

    #[test]
    fn size_capability_is_object_safe() {
        let boxed: Box<dyn TerminalSize> = Box::new(FixedTerminal::new(80, 24));
        assert_eq!(boxed.size().unwrap().0, 80);
    }
}
