//! Terminal initialization and management for the viewer

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

pub type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Initialize the terminal
pub fn init() -> Result<Tui> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore() -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)
        .context("Failed to leave alternate screen")?;
    Ok(())
}

/// Holds the terminal in raw mode on the alternate screen until dropped.
pub struct TerminalGuard {
    terminal: Tui,
    restored: bool,
}

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        let terminal = match init() {
            Ok(terminal) => terminal,
            Err(err) => {
                // Undo whatever part of init succeeded
                let _ = restore();
                return Err(err);
            }
        };
        Ok(Self {
            terminal,
            restored: false,
        })
    }

    pub fn terminal(&mut self) -> &mut Tui {
        &mut self.terminal
    }

    /// Restore now and report failures; dropping restores silently.
    pub fn leave(mut self) -> Result<()> {
        let result = release(
            || self.terminal.show_cursor().context("Failed to show cursor"),
            restore,
        );
        self.restored = true;
        result
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if !self.restored {
            let _ = self.terminal.show_cursor();
            let _ = restore();
        }
    }
}

/// Run both release steps, reporting the first failure.
fn release(
    show_cursor: impl FnOnce() -> Result<()>,
    restore: impl FnOnce() -> Result<()>,
) -> Result<()> {
    let cursor = show_cursor();
    let restored = restore();
    cursor.and(restored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn release_restores_after_cursor_failure() {
        let restored = Cell::new(false);
        let result = release(
            || anyhow::bail!("no cursor"),
            || {
                restored.set(true);
                Ok(())
            },
        );

        assert!(restored.get());
        assert_eq!(result.unwrap_err().to_string(), "no cursor");
    }

    #[test]
    fn release_reports_restore_failure() {
        let result = release(|| Ok(()), || anyhow::bail!("still raw"));
        assert_eq!(result.unwrap_err().to_string(), "still raw");
    }
}
