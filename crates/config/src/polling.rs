//! Live refresh interval configuration with rate-limit awareness.
//!
//! The live dashboard re-fetches every followed repository on a fixed
//! interval. Each cycle costs two API requests per repository (commits and
//! pull requests).
//!
//! # Rate Limits
//!
//! - Unauthenticated: 60 requests/hour
//! - Authenticated: 5000 requests/hour
//!
//! With `auto_adjust` enabled (the default) anonymous sessions never poll
//! faster than [`MIN_INTERVAL_UNAUTHENTICATED`].

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default refresh interval in seconds.
pub const DEFAULT_INTERVAL: u32 = 10;

/// Slowest automatic interval for anonymous sessions, in seconds.
pub const MIN_INTERVAL_UNAUTHENTICATED: u32 = 60;

/// Minimum allowed polling interval in seconds.
pub const MIN_POLLING_INTERVAL: u32 = 5;

/// Maximum allowed polling interval in seconds (1 hour).
pub const MAX_POLLING_INTERVAL: u32 = 3600;

/// Refresh interval settings for the live dashboard.
///
/// # Examples
///
/// ```
/// use ghdash_config::PollingConfig;
///
/// let config = PollingConfig::default();
/// assert_eq!(config.effective_interval(true), 10);
/// assert_eq!(config.effective_interval(false), 60);
///
/// let fixed = PollingConfig::fixed(15);
/// assert_eq!(fixed.effective_interval(false), 15);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Refresh interval in seconds.
    #[serde(default = "default_interval")]
    pub interval_secs: u32,

    /// Whether anonymous sessions are slowed down automatically.
    #[serde(default = "default_auto_adjust")]
    pub auto_adjust: bool,
}

fn default_interval() -> u32 {
    DEFAULT_INTERVAL
}

fn default_auto_adjust() -> bool {
    true
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL,
            auto_adjust: true,
        }
    }
}

impl PollingConfig {
    /// Creates an auto-adjusting config with the given interval.
    #[must_use]
    pub fn with_interval(interval_secs: u32) -> Self {
        Self {
            interval_secs,
            auto_adjust: true,
        }
    }

    /// Creates a config that always uses exactly `interval_secs`.
    #[must_use]
    pub fn fixed(interval_secs: u32) -> Self {
        Self {
            interval_secs,
            auto_adjust: false,
        }
    }

    /// Returns the interval to use given the authentication status.
    #[must_use]
    pub fn effective_interval(&self, is_authenticated: bool) -> u32 {
        if !self.auto_adjust || is_authenticated {
            return self.interval_secs;
        }
        self.interval_secs.max(MIN_INTERVAL_UNAUTHENTICATED)
    }

    /// Validates that the interval is within bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPollingInterval`] when the interval is
    /// outside `MIN_POLLING_INTERVAL..=MAX_POLLING_INTERVAL`.
    pub fn validate(&self) -> Result<()> {
        if self.interval_secs < MIN_POLLING_INTERVAL {
            return Err(ConfigError::InvalidPollingInterval {
                reason: format!(
                    "interval {} is below minimum of {} seconds",
                    self.interval_secs, MIN_POLLING_INTERVAL
                ),
            });
        }

        if self.interval_secs > MAX_POLLING_INTERVAL {
            return Err(ConfigError::InvalidPollingInterval {
                reason: format!(
                    "interval {} exceeds maximum of {} seconds",
                    self.interval_secs, MAX_POLLING_INTERVAL
                ),
            });
        }

        Ok(())
    }
}
