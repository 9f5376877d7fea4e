//! Trailing time windows.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The default window length in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// A trailing window of whole days ending at "now".
///
/// A timestamp is inside the window when it is strictly after
/// `now - days`.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use ghdash_protocol::ActivityWindow;
///
/// let now = Utc::now();
/// let week = ActivityWindow::days(7);
/// assert!(week.includes(now - Duration::days(3), now));
/// assert!(!week.includes(now - Duration::days(7), now));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActivityWindow {
    days: u32,
}

impl ActivityWindow {
    /// Creates a window covering the last `days` days.
    #[must_use]
    pub const fn days(days: u32) -> Self {
        Self { days }
    }

    /// Returns the window length in days.
    #[must_use]
    pub const fn len_days(self) -> u32 {
        self.days
    }

    /// Returns the exclusive lower bound of the window.
    ///
    /// Windows reaching before the earliest representable time are
    /// clamped to it.
    #[must_use]
    pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
        Duration::try_days(i64::from(self.days))
            .and_then(|span| now.checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Returns whether `timestamp` falls inside the window.
    #[must_use]
    pub fn includes(self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        timestamp > self.cutoff(now)
    }

    /// Returns "day" or "days" to match the window length.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        if self.days == 1 { "day" } else { "days" }
    }
}

impl Default for ActivityWindow {
    fn default() -> Self {
        Self::days(DEFAULT_WINDOW_DAYS)
    }
}
