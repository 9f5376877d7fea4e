//! Logging setup.
//!
//! - File logging: always enabled, daily files under `<data dir>/logs/`
//! - Terminal logging: only with `--verbose` or the `GHDASH_LOG` env var,
//!   and never while the live dashboard owns the screen

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding the terminal log filter.
pub const LOG_ENV: &str = "GHDASH_LOG";

/// Returns the log directory inside `data_dir`.
pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

/// Returns whether terminal logging was asked for.
pub fn wants_terminal(verbose: bool) -> bool {
    verbose || std::env::var(LOG_ENV).is_ok()
}

/// Initializes the global subscriber, logging to stderr too when
/// `terminal` is set.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created.
pub fn init(data_dir: &Path, terminal: bool) -> Result<()> {
    let log_dir = log_dir(data_dir);
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("could not create log directory {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "ghdash.log");

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_filter(EnvFilter::new("debug"));

    // stderr keeps stdout clean for command output
    let terminal_layer = if terminal {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
        Some(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(filter),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(terminal_layer)
        .try_init()
        .context("could not install the log subscriber")?;

    Ok(())
}
