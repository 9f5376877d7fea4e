//! Event handling and key mappings.
//!
//! This module provides event polling and conversion from terminal events
//! to dashboard actions.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Default poll timeout for events.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Something the user asked the dashboard to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Leave the dashboard.
    Quit,
    /// Refresh every repository now.
    Refresh,
    /// Highlight the previous row.
    Up,
    /// Highlight the next row.
    Down,
}

/// Polls for a terminal event with the default timeout.
///
/// Returns `Some(Event)` if an event is available within the timeout,
/// or `None` if the timeout expires without an event.
///
/// # Errors
///
/// Returns an error if polling the terminal fails.
pub fn poll_event() -> std::io::Result<Option<Event>> {
    if event::poll(POLL_TIMEOUT)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Converts a terminal event to an action.
#[must_use]
pub fn event_to_action(event: &Event) -> Option<Action> {
    match event {
        Event::Key(key) => key_to_action(*key),
        _ => None,
    }
}

/// Converts a key press to an action.
///
/// # Key Bindings
///
/// | Key | Action |
/// |-----|--------|
/// | `q`, `Esc`, `Ctrl+C` | Quit |
/// | `r` | Refresh now |
/// | `Up`, `k` | Previous row |
/// | `Down`, `j` | Next row |
#[must_use]
pub fn key_to_action(key: KeyEvent) -> Option<Action> {
    // Windows reports key releases too
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::Down),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn make_key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn quit_keys() {
        for key in [
            make_key(KeyCode::Char('q')),
            make_key(KeyCode::Esc),
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            assert_eq!(key_to_action(key), Some(Action::Quit));
        }
    }

    #[test]
    fn plain_c_does_not_quit() {
        assert_eq!(key_to_action(make_key(KeyCode::Char('c'))), None);
    }

    #[test]
    fn refresh_and_navigation_keys() {
        assert_eq!(
            key_to_action(make_key(KeyCode::Char('r'))),
            Some(Action::Refresh)
        );
        assert_eq!(key_to_action(make_key(KeyCode::Up)), Some(Action::Up));
        assert_eq!(key_to_action(make_key(KeyCode::Char('j'))), Some(Action::Down));
    }

    #[test]
    fn key_release_is_ignored() {
        let key = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(key_to_action(key), None);
    }

    #[test]
    fn non_key_events_are_ignored() {
        assert_eq!(event_to_action(&Event::Resize(80, 24)), None);
        assert_eq!(event_to_action(&Event::FocusGained), None);
        assert_eq!(
            event_to_action(&Event::Key(make_key(KeyCode::Char('r')))),
            Some(Action::Refresh)
        );
    }
}
