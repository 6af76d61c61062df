//! Terminal User Interface (TUI) for deepwork.
//!
//! The interactive timer. Built with ratatui and crossterm. The loop owns the
//! clock: it waits for a key no longer than the next due tick, then pumps the
//! timer so every due second is applied exactly once.

mod app;
mod event;
mod ui;

pub use app::App;

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::core::Clock;
use crate::error::DeepWorkError;
use crate::features::session::SessionStore;
use crate::features::timer::TimerCore;
use crate::storage::KeyValueStore;

/// Run the TUI application.
///
/// # Errors
///
/// Returns an error if the TUI fails to initialize or run.
pub fn run<K: KeyValueStore>(store: SessionStore<K>) -> Result<(), DeepWorkError> {
    // Setup terminal
    enable_raw_mode()
        .map_err(|e| DeepWorkError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| DeepWorkError::Terminal(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| DeepWorkError::Terminal(format!("Failed to create terminal: {e}")))?;

    // Create app state and run main loop
    let mut app = App::new(TimerCore::new(), store);
    tracing::info!(sessions = app.store.len(), "timer opened");
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    if app.timer.has_time() {
        tracing::warn!(
            elapsed = app.timer.elapsed_seconds(),
            "quit with unsaved session time"
        );
    }
    result
}

/// Run the main application loop.
fn run_app<B: Backend, K: KeyValueStore, C: Clock>(
    terminal: &mut Terminal<B>,
    app: &mut App<K, C>,
) -> Result<(), DeepWorkError> {
    let mut dirty = true;

    loop {
        if dirty {
            terminal
                .draw(|frame| ui::render(frame, app))
                .map_err(|e| DeepWorkError::Terminal(format!("Failed to draw: {e}")))?;
        }

        let timeout = app.poll_timeout();
        let handled = event::handle_events(app, timeout)?;
        if app.should_quit {
            break;
        }

        dirty = handled || app.pump().needs_redraw();
    }

    Ok(())
}
