//! Terminal UI for ghdash.
//!
//! This crate provides the Ratatui-based live dashboard showing the recent
//! activity of every followed repository.
//!
//! # Overview
//!
//! - [`app`]: Main application struct and run loop
//! - [`state`]: Dashboard rows and how refresh results update them
//! - [`terminal`]: Raw-mode guard and panic handling
//! - [`event`]: Event handling and key mappings
//! - [`widgets`]: Activity table and status bar rendering
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use ghdash_protocol::ActivityWindow;
//! use ghdash_tui::{ActivitySource, App, RepoReport, terminal};
//!
//! struct Nothing;
//!
//! impl ActivitySource for Nothing {
//!     async fn refresh(&mut self) -> Vec<RepoReport> {
//!         Vec::new()
//!     }
//! }
//!
//! # async fn example() -> anyhow::Result<()> {
//! terminal::install_panic_hook();
//! let mut guard = terminal::RawDisplayGuard::acquire()?;
//!
//! let mut app = App::new(ActivityWindow::days(7), Duration::from_secs(60));
//! let result = app.run(guard.terminal(), &mut Nothing).await;
//!
//! guard.restore()?;
//! result
//! # }
//! ```

pub mod app;
pub mod event;
pub mod layout;
pub mod state;
pub mod terminal;
pub mod widgets;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export primary types at crate root for convenience
pub use app::{ActivitySource, App};
pub use state::{ActivitySummary, DashboardState, RepoReport, RepoRow};
