//! Centralized layout measurements for the TUI.

/// Height of the header bar in rows.
pub const HEADER_HEIGHT: u16 = 3;

/// Height of the status bar in rows.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Minimum terminal height for useful rendering.
///
/// Header, status bar, table borders and its header row, plus one row of
/// data.
pub const MIN_HEIGHT: u16 = HEADER_HEIGHT + STATUS_BAR_HEIGHT + 4;

/// Minimum terminal width for useful rendering.
pub const MIN_WIDTH: u16 = 60;
