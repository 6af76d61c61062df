//! Application state for the TUI.

use std::time::Duration;

use chrono::{Local, NaiveDate};

use crate::core::datetime::format_clock;
use crate::core::{Clock, SystemClock};
use crate::error::DeepWorkError;
use crate::features::session::SessionStore;
use crate::features::timer::{Pumped, TimerCore, TimerState};
use crate::storage::KeyValueStore;

/// Longest the loop sleeps waiting for input.
const MAX_IDLE_WAIT: Duration = Duration::from_millis(250);

/// Key help shown when there is nothing else to say.
pub const KEY_HELP: &str = "s/space:start-pause | d:distraction | e:end | h:history | q:quit";

/// Key help while the history pane is shown.
pub const HISTORY_HELP: &str = "j/k:scroll | h:back to timer | q:quit";

/// Key help while a distraction is open.
pub const DISTRACTED_HELP: &str = "type the reason | Enter:back to work | Esc:drop it";

/// Application state.
pub struct App<K: KeyValueStore, C: Clock = SystemClock> {
    /// The running timer.
    pub timer: TimerCore<C>,
    /// Completed sessions.
    pub store: SessionStore<K>,
    /// Reason typed so far for the open distraction.
    pub reason: String,
    /// Whether the history pane replaces the timer pane.
    pub show_history: bool,
    /// First history row shown.
    pub history_scroll: usize,
    /// Status message to display.
    pub status: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Set after a first `q` with unsaved time.
    pub confirm_quit: bool,
}

impl<K: KeyValueStore, C: Clock> App<K, C> {
    /// Create a new app instance.
    pub fn new(timer: TimerCore<C>, store: SessionStore<K>) -> Self {
        Self {
            timer,
            store,
            reason: String::new(),
            show_history: false,
            history_scroll: 0,
            status: None,
            should_quit: false,
            confirm_quit: false,
        }
    }

    /// Start when idle or paused, pause when running.
    pub fn toggle_running(&mut self) {
        let result = match self.timer.state() {
            TimerState::Running => self.timer.pause(),
            _ => self.timer.start(),
        };
        self.report(result, None);
    }

    /// Open a distraction.
    pub fn begin_distraction(&mut self) {
        self.reason.clear();
        let result = self.timer.log_distraction();
        self.report(result, None);
    }

    /// Append to the distraction reason.
    pub fn push_char(&mut self, c: char) {
        self.reason.push(c);
    }

    /// Delete the last character of the distraction reason.
    pub fn pop_char(&mut self) {
        self.reason.pop();
    }

    /// Record the open distraction with the typed reason.
    pub fn submit_reason(&mut self) {
        match self.timer.resume_from_distraction(&self.reason) {
            Ok(d) => {
                self.status = Some(format!(
                    "Logged \"{}\" ({})",
                    d.reason,
                    format_clock(d.duration_seconds)
                ));
                self.reason.clear();
            }
            Err(e) => self.report(Err(e), None),
        }
    }

    /// Drop the open distraction.
    pub fn cancel_distraction(&mut self) {
        let result = self.timer.cancel_distraction();
        if result.is_ok() {
            self.reason.clear();
        }
        self.report(result, Some("Distraction dropped"));
    }

    /// End the session and save it if it has any work time.
    pub fn end_session(&mut self) {
        self.reason.clear();
        match self.timer.end_session_into(&mut self.store) {
            Ok(Some(session)) => {
                self.status = Some(format!(
                    "Saved {} with {} distraction(s)",
                    format_clock(session.duration_seconds),
                    session.distraction_count()
                ));
            }
            Ok(None) => self.status = Some("Nothing to save".to_string()),
            Err(e) => {
                tracing::error!(error = %e, "could not save session");
                self.status = Some(format!("Could not save session: {e}"));
            }
        }
    }

    /// Quit, asking once more if the current session has unsaved time.
    pub fn request_quit(&mut self) {
        if self.timer.has_time() && !self.confirm_quit {
            self.confirm_quit = true;
            self.status = Some(format!(
                "{} unsaved: press q again to discard, e to end and save",
                format_clock(self.timer.elapsed_seconds())
            ));
        } else {
            self.should_quit = true;
        }
    }

    /// Forget a pending quit confirmation.
    pub fn cancel_pending(&mut self) {
        self.confirm_quit = false;
    }

    /// Flip between the timer and the history pane.
    pub fn toggle_history(&mut self) {
        self.show_history = !self.show_history;
        self.history_scroll = 0;
    }

    /// Rows in the history pane: one per day, session and distraction.
    #[must_use]
    pub fn history_rows(&self) -> usize {
        self.store
            .group_by_date()
            .iter()
            .map(|g| {
                1 + g
                    .sessions
                    .iter()
                    .map(|s| 1 + s.distraction_count())
                    .sum::<usize>()
            })
            .sum()
    }

    /// Scroll the history pane down one row, stopping at the last row.
    pub fn scroll_down(&mut self) {
        let last = self.history_rows().saturating_sub(1);
        self.history_scroll = (self.history_scroll + 1).min(last);
    }

    /// Scroll the history pane up one row.
    pub fn scroll_up(&mut self) {
        self.history_scroll = self.history_scroll.saturating_sub(1);
    }

    /// Today's date, local time, on the timer's clock.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.timer.now().with_timezone(&Local).date_naive()
    }

    /// Apply ticks that are due.
    pub fn pump(&mut self) -> Pumped {
        self.timer.pump()
    }

    /// How long to wait for input before the next tick is due.
    #[must_use]
    pub fn poll_timeout(&self) -> Duration {
        self.timer
            .until_next_tick()
            .and_then(|d| d.to_std().ok())
            .map_or(MAX_IDLE_WAIT, |d| d.min(MAX_IDLE_WAIT))
    }

    /// Help text for the current state.
    #[must_use]
    pub fn help(&self) -> &'static str {
        if self.timer.state() == TimerState::Distracted {
            DISTRACTED_HELP
        } else if self.show_history {
            HISTORY_HELP
        } else {
            KEY_HELP
        }
    }

    fn report(&mut self, result: Result<(), DeepWorkError>, ok_message: Option<&str>) {
        match result {
            Ok(()) => self.status = ok_message.map(str::to_string),
            Err(e) if e.is_recoverable() => {
                tracing::debug!(error = %e, "rejected");
                self.status = Some(e.to_string());
            }
            Err(e) => {
                tracing::error!(error = %e, "operation failed");
                self.status = Some(format!("Error: {e}"));
            }
        }
    }
}
