//! Main application struct and run loop.
//!
//! This module provides the [`App`] struct which drives the live dashboard:
//! rendering, key handling and periodic refreshes.

use std::future::Future;
use std::time::{Duration, Instant};

use chrono::Utc;
use ghdash_protocol::ActivityWindow;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::{
    event::{Action, event_to_action, poll_event},
    layout::{HEADER_HEIGHT, MIN_HEIGHT, MIN_WIDTH, STATUS_BAR_HEIGHT},
    state::{DashboardState, RepoReport},
    terminal::AppTerminal,
    widgets::{render_activity_table, render_status_bar},
};

/// Provides fresh activity for every followed repository.
pub trait ActivitySource {
    /// Refreshes every repository and returns one report per repository,
    /// in the order they should be shown.
    ///
    /// Failures are reported per repository and never abort the others.
    fn refresh(&mut self) -> impl Future<Output = Vec<RepoReport>>;
}

/// The live dashboard application.
#[derive(Debug)]
pub struct App {
    state: DashboardState,
    interval: Duration,
    should_quit: bool,
    refresh_requested: bool,
}

impl App {
    /// Creates a dashboard showing `window`, refreshing every `interval`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use ghdash_protocol::ActivityWindow;
    /// use ghdash_tui::App;
    ///
    /// let app = App::new(ActivityWindow::days(7), Duration::from_secs(60));
    /// assert!(app.state().rows.is_empty());
    /// ```
    #[must_use]
    pub fn new(window: ActivityWindow, interval: Duration) -> Self {
        Self {
            state: DashboardState::new(window),
            interval,
            should_quit: false,
            // The first loop iteration fetches immediately
            refresh_requested: true,
        }
    }

    /// Returns a reference to the dashboard state.
    #[must_use]
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Returns the refresh interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns whether the user asked to quit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Updates the application state based on an action.
    pub fn update(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Refresh => self.refresh_requested = true,
            Action::Up => self.state.select_relative(-1),
            Action::Down => self.state.select_relative(1),
        }
    }

    /// Returns whether a refresh is due, either requested or because
    /// `interval` has elapsed since `last`.
    fn refresh_due(&self, last: Option<Instant>) -> bool {
        self.refresh_requested || last.is_none_or(|at| at.elapsed() >= self.interval)
    }

    /// Fetches from `source` and folds the reports into the state.
    pub async fn refresh<S: ActivitySource>(&mut self, source: &mut S) {
        self.refresh_requested = false;
        self.state.refreshing = true;
        let reports = source.refresh().await;
        self.state.apply(reports, Utc::now());
    }

    /// Renders the application UI to the given frame.
    ///
    /// Terminals below the minimum size get a "terminal too small" message
    /// instead of the dashboard.
    pub fn view(&self, frame: &mut Frame) {
        let area = frame.area();
        if area.height < MIN_HEIGHT || area.width < MIN_WIDTH {
            render_terminal_too_small(frame, area);
            return;
        }

        let [header_area, table_area, status_area] = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .areas(area);

        self.render_header(frame, header_area);
        render_activity_table(&self.state, table_area, frame.buffer_mut());
        render_status_bar(&self.state, status_area, frame.buffer_mut());
    }

    /// Runs the dashboard until the user quits.
    ///
    /// Repositories are refreshed on start, every interval, and whenever the
    /// user presses `r`. The screen is redrawn before each refresh so the
    /// "refreshing" status is visible while it runs.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing or reading terminal events fails.
    pub async fn run<S: ActivitySource>(
        &mut self,
        terminal: &mut AppTerminal,
        source: &mut S,
    ) -> anyhow::Result<()> {
        let mut last_refresh: Option<Instant> = None;

        loop {
            if self.refresh_due(last_refresh) {
                self.state.refreshing = true;
                terminal.draw(|frame| self.view(frame))?;
                self.refresh(source).await;
                last_refresh = Some(Instant::now());
            }

            terminal.draw(|frame| self.view(frame))?;

            if let Some(action) = poll_event()?.as_ref().and_then(event_to_action) {
                self.update(action);
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [title_area, interval_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(24)]).areas(inner);

        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                "ghdash",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" - "),
            Span::styled(
                format!("{} followed", self.state.rows.len()),
                Style::default().fg(Color::White),
            ),
        ]));
        frame.render_widget(title, title_area);

        let interval = Paragraph::new(format!("every {}s", self.interval.as_secs()))
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Right);
        frame.render_widget(interval, interval_area);
    }
}

fn render_terminal_too_small(frame: &mut Frame, area: Rect) {
    let message = format!(
        "Terminal too small ({}×{})\nMinimum: {}×{} (w×h)",
        area.width, area.height, MIN_WIDTH, MIN_HEIGHT
    );

    let paragraph = Paragraph::new(message)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    let vertical_offset = area.height.saturating_sub(2) / 2;
    let centered_area = Rect {
        x: area.x,
        y: area.y + vertical_offset,
        width: area.width,
        height: area.height.saturating_sub(vertical_offset),
    };

    frame.render_widget(paragraph, centered_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ActivitySummary;
    use crate::test_utils::buffer_to_string;
    use ghdash_protocol::RepoName;
    use ratatui::{Terminal, backend::TestBackend};

    /// Reports fixed commit counts and counts calls.
    struct FixedSource {
        calls: usize,
        fail_second: bool,
    }

    impl ActivitySource for FixedSource {
        async fn refresh(&mut self) -> Vec<RepoReport> {
            self.calls += 1;
            let name = RepoName::parse("owner/repo").unwrap();
            let result = if self.fail_second && self.calls == 2 {
                Err("network unreachable".to_string())
            } else {
                Ok(ActivitySummary {
                    full_name: "Owner/Repo".to_string(),
                    commits: self.calls,
                    pull_requests: 0,
                    latest_commit: None,
                    fetched_at: Utc::now(),
                })
            };
            vec![RepoReport { name, result }]
        }
    }

    fn render(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| app.view(frame)).unwrap();
        buffer_to_string(terminal.backend().buffer())
    }

    #[test]
    fn quit_action_sets_flag() {
        let mut app = App::new(ActivityWindow::days(7), Duration::from_secs(10));
        assert!(!app.should_quit());
        app.update(Action::Quit);
        assert!(app.should_quit());
    }

    #[test]
    fn refresh_is_due_on_start_and_after_interval() {
        let mut app = App::new(ActivityWindow::days(7), Duration::from_secs(3600));
        assert!(app.refresh_due(None));

        app.refresh_requested = false;
        assert!(!app.refresh_due(Some(Instant::now())));

        app.update(Action::Refresh);
        assert!(app.refresh_due(Some(Instant::now())));

        let app = App::new(ActivityWindow::days(7), Duration::ZERO);
        assert!(app.refresh_due(Some(Instant::now())));
    }

    #[tokio::test]
    async fn refresh_applies_reports() {
        let mut app = App::new(ActivityWindow::days(7), Duration::from_secs(10));
        let mut source = FixedSource {
            calls: 0,
            fail_second: true,
        };

        app.refresh(&mut source).await;
        assert!(!app.refresh_requested);
        assert!(!app.state().refreshing);
        assert_eq!(app.state().rows[0].summary.as_ref().unwrap().commits, 1);

        // A failed refresh keeps the previous counts
        app.refresh(&mut source).await;
        let row = &app.state().rows[0];
        assert!(row.is_stale());
        assert_eq!(row.summary.as_ref().unwrap().commits, 1);

        app.refresh(&mut source).await;
        assert_eq!(app.state().rows[0].summary.as_ref().unwrap().commits, 3);
        assert_eq!(source.calls, 3);
    }

    #[tokio::test]
    async fn view_renders_dashboard() {
        let mut app = App::new(ActivityWindow::days(7), Duration::from_secs(30));
        let mut source = FixedSource {
            calls: 0,
            fail_second: false,
        };
        app.refresh(&mut source).await;

        let output = render(&app, 100, 12);
        assert!(output.contains("ghdash"));
        assert!(output.contains("1 followed"));
        assert!(output.contains("every 30s"));
        assert!(output.contains("Owner/Repo"));
        assert!(output.contains("q quit"));
    }

    #[test]
    fn small_terminal_shows_message() {
        let app = App::new(ActivityWindow::days(7), Duration::from_secs(30));
        let output = render(&app, 40, 6);
        assert!(output.contains("Terminal too small"));
    }
}
