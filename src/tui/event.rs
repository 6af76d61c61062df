//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::Clock;
use crate::error::DeepWorkError;
use crate::features::timer::TimerState;
use crate::storage::KeyValueStore;
use crate::tui::app::App;

/// Wait up to `timeout` for a key and apply it.
///
/// Returns true if a key was handled.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn handle_events<K: KeyValueStore, C: Clock>(
    app: &mut App<K, C>,
    timeout: Duration,
) -> Result<bool, DeepWorkError> {
    if !event::poll(timeout).map_err(|e| DeepWorkError::Terminal(format!("Event poll failed: {e}")))? {
        return Ok(false);
    }

    match event::read().map_err(|e| DeepWorkError::Terminal(format!("Event read failed: {e}")))? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            handle_key(app, key);
            Ok(true)
        }
        Event::Resize(_, _) => Ok(true),
        _ => Ok(false),
    }
}

/// Apply one key press.
pub fn handle_key<K: KeyValueStore, C: Clock>(app: &mut App<K, C>, key: KeyEvent) {
    // Handle Ctrl+C
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.timer.state() == TimerState::Distracted {
        app.cancel_pending();
        match key.code {
            KeyCode::Enter => app.submit_reason(),
            KeyCode::Esc => app.cancel_distraction(),
            KeyCode::Backspace => app.pop_char(),
            KeyCode::Char(c) => app.push_char(c),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.request_quit(),
        KeyCode::Char('s' | ' ') => {
            app.cancel_pending();
            app.toggle_running();
        }
        KeyCode::Char('d') => {
            app.cancel_pending();
            app.begin_distraction();
        }
        KeyCode::Char('e') => {
            app.cancel_pending();
            app.end_session();
        }
        KeyCode::Char('h') => {
            app.cancel_pending();
            app.toggle_history();
        }
        KeyCode::Char('j') | KeyCode::Down if app.show_history => {
            app.cancel_pending();
            app.scroll_down();
        }
        KeyCode::Char('k') | KeyCode::Up if app.show_history => {
            app.cancel_pending();
            app.scroll_up();
        }
        _ => app.cancel_pending(),
    }
}
