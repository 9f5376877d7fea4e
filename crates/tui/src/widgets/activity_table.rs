//! The per-repository activity table.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Widget},
};

use crate::state::{DashboardState, RepoRow};

const COLUMN_WIDTHS: [Constraint; 5] = [
    Constraint::Min(24),
    Constraint::Length(7),
    Constraint::Length(4),
    Constraint::Fill(1),
    Constraint::Length(30),
];

/// Renders the activity table for every followed repository.
///
/// Rows keep the order of [`DashboardState::rows`]. A row whose refresh
/// failed still shows its previous counts, marked stale.
pub fn render_activity_table(state: &DashboardState, area: Rect, buf: &mut Buffer) {
    let window = state.window;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(
            " Activity in the last {} {} ",
            window.len_days(),
            window.unit()
        ));

    if state.rows.is_empty() {
        let message = if state.last_refresh.is_none() {
            "Loading…"
        } else {
            "Not following any repositories. Try `ghdash follow OWNER/REPO`."
        };
        Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
        return;
    }

    let header = Row::new(["Repository", "Commits", "PRs", "Latest commit", "Status"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = state.rows.iter().enumerate().map(|(index, row)| {
        let style = if index == state.selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        table_row(row).style(style)
    });

    Table::new(rows, COLUMN_WIDTHS)
        .header(header)
        .column_spacing(1)
        .block(block)
        .render(area, buf);
}

fn table_row(row: &RepoRow) -> Row<'static> {
    let (commits, pull_requests, latest) = match &row.summary {
        Some(summary) => (
            summary.commits.to_string(),
            summary.pull_requests.to_string(),
            summary.latest_commit.clone().unwrap_or_default(),
        ),
        None => ("-".to_string(), "-".to_string(), String::new()),
    };

    Row::new([
        Cell::from(row.display_name().to_string()),
        Cell::from(Line::from(commits).alignment(Alignment::Right)),
        Cell::from(Line::from(pull_requests).alignment(Alignment::Right)),
        Cell::from(latest),
        status_cell(row),
    ])
}

fn status_cell(row: &RepoRow) -> Cell<'static> {
    match &row.error {
        None => Cell::from("ok").style(Style::default().fg(Color::Green)),
        Some(error) if row.is_stale() => {
            Cell::from(format!("stale: {error}")).style(Style::default().fg(Color::Yellow))
        }
        Some(error) => Cell::from(format!("error: {error}")).style(Style::default().fg(Color::Red)),
    }
}
