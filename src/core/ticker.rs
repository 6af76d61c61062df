//! Cancellable repeating schedule.
//!
//! A [`Ticker`] has no thread behind it. The owner arms it at a state
//! transition, the event loop asks how many periods have come due, and the
//! owner cancels it on the way out of the state. A cancelled ticker never
//! reports a due period, so no tick can land after the transition.
//!
//! Periods missed while the process was suspended are not replayed: once
//! the schedule has fallen [`MAX_LAG_PERIODS`] behind, it reports a single
//! period and restarts its phase from the current instant.

use chrono::{DateTime, Duration, Utc};

/// How far behind, in periods, the schedule may fall before it re-phases.
pub const MAX_LAG_PERIODS: i32 = 2;

/// A repeating deadline with a fixed period.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next_due: Option<DateTime<Utc>>,
}

impl Ticker {
    /// Create a disarmed ticker with the given period.
    #[must_use]
    pub const fn every(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    /// A disarmed one-second ticker.
    #[must_use]
    pub const fn per_second() -> Self {
        Self::every(Duration::seconds(1))
    }

    /// Start counting periods from `now`. Re-arming restarts the phase.
    pub fn arm(&mut self, now: DateTime<Utc>) {
        self.next_due = Some(now + self.period);
    }

    /// Stop the schedule. Pending periods are dropped.
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Whether the ticker is currently scheduled.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Consume and return the number of whole periods due at `now`.
    ///
    /// Small lateness is caught up. A longer stall (sleep, clock jump)
    /// yields one period and re-arms from `now`.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };

        if now - due >= self.period * MAX_LAG_PERIODS {
            tracing::debug!(lag_ms = (now - due).num_milliseconds(), "ticker stalled, re-phasing");
            self.next_due = Some(now + self.period);
            return 1;
        }

        let mut fired = 0u32;
        while due <= now {
            fired = fired.saturating_add(1);
            due += self.period;
        }
        self.next_due = Some(due);
        fired
    }

    /// Time left until the next period, if armed.
    #[must_use]
    pub fn until_next(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.next_due
            .map(|due| (due - now).max(Duration::zero()))
    }
}
