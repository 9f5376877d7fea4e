//! Dashboard state management.
//!
//! This module defines the rows shown by the live dashboard and how refresh
//! results are folded into them.

use chrono::{DateTime, Utc};
use ghdash_protocol::{ActivityWindow, RepoName};

/// Windowed activity of one repository at the time of a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivitySummary {
    /// The name as GitHub spells it.
    pub full_name: String,
    /// Commits inside the window.
    pub commits: usize,
    /// Pull requests created inside the window.
    pub pull_requests: usize,
    /// Summary line of the newest commit inside the window.
    pub latest_commit: Option<String>,
    /// When the activity was fetched.
    pub fetched_at: DateTime<Utc>,
}

/// The outcome of refreshing one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoReport {
    /// The repository that was refreshed.
    pub name: RepoName,
    /// The activity, or a message describing why the refresh failed.
    pub result: Result<ActivitySummary, String>,
}

/// One row of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRow {
    /// The followed repository.
    pub name: RepoName,
    /// The last activity that was fetched successfully.
    pub summary: Option<ActivitySummary>,
    /// The error of the most recent refresh, if it failed.
    pub error: Option<String>,
}

impl RepoRow {
    /// Returns the name to display, preferring GitHub's spelling.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.summary
            .as_ref()
            .map_or(self.name.as_str(), |s| s.full_name.as_str())
    }

    /// Returns whether the row shows data from an earlier refresh.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.error.is_some() && self.summary.is_some()
    }
}

/// The state of the live dashboard.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Rows in the order the repositories were followed.
    pub rows: Vec<RepoRow>,
    /// The activity window being shown.
    pub window: ActivityWindow,
    /// When the last refresh completed.
    pub last_refresh: Option<DateTime<Utc>>,
    /// Whether a refresh is in progress.
    pub refreshing: bool,
    /// Index of the highlighted row.
    pub selected: usize,
}

impl DashboardState {
    /// Creates an empty dashboard for `window`.
    #[must_use]
    pub fn new(window: ActivityWindow) -> Self {
        Self {
            rows: Vec::new(),
            window,
            last_refresh: None,
            refreshing: false,
            selected: 0,
        }
    }

    /// Replaces the rows with the outcome of a refresh.
    ///
    /// Rows follow the order of `reports`. A failed repository keeps the
    /// activity it had before, flagged with the error. Repositories missing
    /// from `reports` are dropped.
    pub fn apply(&mut self, reports: Vec<RepoReport>, now: DateTime<Utc>) {
        let mut previous = std::mem::take(&mut self.rows);
        self.rows = reports
            .into_iter()
            .map(|report| {
                let earlier = previous
                    .iter()
                    .position(|row| row.name == report.name)
                    .map(|index| previous.swap_remove(index));
                match report.result {
                    Ok(summary) => RepoRow {
                        name: report.name,
                        summary: Some(summary),
                        error: None,
                    },
                    Err(error) => RepoRow {
                        name: report.name,
                        summary: earlier.and_then(|row| row.summary),
                        error: Some(error),
                    },
                }
            })
            .collect();

        self.last_refresh = Some(now);
        self.refreshing = false;
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
    }

    /// Returns the number of rows whose last refresh failed.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.rows.iter().filter(|row| row.error.is_some()).count()
    }

    /// Moves the highlight by `delta` rows, clamped to the table.
    pub fn select_relative(&mut self, delta: isize) {
        if self.rows.is_empty() {
            self.selected = 0;
            return;
        }
        let last = self.rows.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }

    /// Returns the highlighted row, if any.
    #[must_use]
    pub fn selected_row(&self) -> Option<&RepoRow> {
        self.rows.get(self.selected)
    }
}
