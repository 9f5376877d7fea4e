//! Widget components for the ghdash dashboard.
//!
//! Each widget is a function rendering state into a buffer, which keeps
//! them easy to test and compose.
//!
//! - [`activity_table`]: one row per followed repository
//! - [`status_bar`]: key hints and refresh status
//!
//! # Example
//!
//! ```
//! use ghdash_protocol::ActivityWindow;
//! use ghdash_tui::DashboardState;
//! use ghdash_tui::widgets;
//! use ratatui::buffer::Buffer;
//! use ratatui::layout::Rect;
//!
//! let state = DashboardState::new(ActivityWindow::days(7));
//! let area = Rect::new(0, 0, 100, 10);
//! let mut buf = Buffer::empty(area);
//!
//! widgets::render_activity_table(&state, area, &mut buf);
//! ```

pub mod activity_table;
pub mod status_bar;

pub use activity_table::render_activity_table;
pub use status_bar::render_status_bar;
