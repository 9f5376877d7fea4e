//! Terminal setup and teardown utilities.
//!
//! [`RawDisplayGuard`] owns the terminal while the dashboard runs: raw mode,
//! the alternate screen and a hidden cursor are acquired together and
//! released together, on [`RawDisplayGuard::restore`] or when the guard is
//! dropped. A panic hook covers panics that unwind past the guard.

use std::io::{self, Stdout};

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

/// The terminal type used by the application.
pub type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Error type for terminal operations.
#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    /// Failed to initialize the terminal.
    #[error("failed to setup terminal: {0}")]
    Setup(#[source] io::Error),

    /// Failed to restore the terminal.
    #[error("failed to restore terminal: {0}")]
    Restore(#[source] io::Error),
}

/// Scoped ownership of the terminal in raw mode.
///
/// # Examples
///
/// ```no_run
/// use ghdash_tui::terminal::{RawDisplayGuard, install_panic_hook};
///
/// # fn example() -> Result<(), ghdash_tui::terminal::TerminalError> {
/// install_panic_hook();
/// let mut guard = RawDisplayGuard::acquire()?;
/// guard.terminal().clear().map_err(ghdash_tui::terminal::TerminalError::Setup)?;
/// guard.restore()?;
/// # Ok(())
/// # }
/// ```
pub struct RawDisplayGuard {
    terminal: AppTerminal,
    restored: bool,
}

impl RawDisplayGuard {
    /// Enables raw mode, enters the alternate screen and hides the cursor.
    ///
    /// If a later step fails, the earlier ones are undone before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if any terminal operation fails.
    pub fn acquire() -> Result<Self, TerminalError> {
        enable_raw_mode().map_err(TerminalError::Setup)?;

        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(TerminalError::Setup(e));
        }

        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self {
                terminal,
                restored: false,
            }),
            Err(e) => {
                reset_terminal();
                Err(TerminalError::Setup(e))
            }
        }
    }

    /// Returns the terminal to draw on.
    pub fn terminal(&mut self) -> &mut AppTerminal {
        &mut self.terminal
    }

    /// Restores the terminal, reporting failures.
    ///
    /// Dropping the guard restores it too, but silently.
    ///
    /// # Errors
    ///
    /// Returns an error if any terminal operation fails.
    pub fn restore(mut self) -> Result<(), TerminalError> {
        self.restored = true;
        restore_terminal(&mut self.terminal)
    }
}

impl Drop for RawDisplayGuard {
    fn drop(&mut self) {
        if !self.restored {
            let _ = restore_terminal(&mut self.terminal);
        }
    }
}

fn restore_terminal(terminal: &mut AppTerminal) -> Result<(), TerminalError> {
    disable_raw_mode().map_err(TerminalError::Restore)?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, Show).map_err(TerminalError::Restore)?;
    Ok(())
}

/// Best-effort restoration when no terminal handle is available.
fn reset_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}

/// Installs a panic hook that restores the terminal before panicking.
///
/// The previous hook still runs afterwards, so the panic message is printed
/// on the main screen. Call this once, before acquiring the terminal.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        reset_terminal();
        original_hook(panic_info);
    }));
}
