//! Status bar widget.

use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::state::DashboardState;

/// Renders key hints on the left and refresh status on the right.
pub fn render_status_bar(state: &DashboardState, area: Rect, buf: &mut Buffer) {
    let [hints_area, status_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(area);

    let key = Style::default().fg(Color::Yellow);
    let label = Style::default().fg(Color::DarkGray);
    Paragraph::new(Line::from(vec![
        Span::styled("q", key),
        Span::styled(" quit  ", label),
        Span::styled("r", key),
        Span::styled(" refresh  ", label),
        Span::styled("↑↓", key),
        Span::styled(" select", label),
    ]))
    .render(hints_area, buf);

    Paragraph::new(status_text(state))
        .style(label)
        .alignment(Alignment::Right)
        .render(status_area, buf);
}

fn status_text(state: &DashboardState) -> String {
    if state.refreshing {
        return "Refreshing…".to_string();
    }

    let Some(last) = state.last_refresh else {
        return String::new();
    };
    let updated = last.with_timezone(&Local).format("%H:%M:%S");
    match state.failures() {
        0 => format!("Updated {updated}"),
        n => format!("Updated {updated}, {n} failed"),
    }
}
