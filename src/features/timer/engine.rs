//! The deep work timer state machine.
//!
//! ```text
//!            start              logDistraction
//!   Idle ───────────▶ Running ─────────────────▶ Distracted
//!    ▲                 │  ▲  ◀───────────────────    │
//!    │          pause  │  │ start   resume/cancel    │
//!    │                 ▼  │                          │
//!    └──── endSession ─ Paused                       │
//!    └──────────────── endSession (any state) ◀──────┘
//! ```
//!
//! Work time advances by one second per tick while `Running` and is frozen
//! otherwise. Distraction time is never ticked; it is measured from the
//! wall-clock instant the distraction began, so it stays right even if the
//! process was suspended. Each state owns a [`Ticker`] that is armed on entry
//! and cancelled on exit, which is what keeps a late tick from counting
//! against the wrong state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::datetime::to_timestamp;
use crate::core::{Clock, IdGenerator, SystemClock, Ticker};
use crate::error::DeepWorkError;
use crate::features::session::{Distraction, Session, SessionStore};
use crate::storage::KeyValueStore;

/// Where the timer is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// No session in progress.
    Idle,
    /// Work time is advancing.
    Running,
    /// Work time is frozen by the user.
    Paused,
    /// Work time is frozen while a distraction is being timed.
    Distracted,
}

impl std::fmt::Display for TimerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Distracted => write!(f, "distracted"),
        }
    }
}

/// Ticks applied by one call to [`TimerCore::pump`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pumped {
    /// Seconds added to work time.
    pub work_ticks: u32,
    /// Display refreshes due for the distraction counter.
    pub distraction_ticks: u32,
}

impl Pumped {
    /// Whether anything visible changed.
    #[must_use]
    pub const fn needs_redraw(&self) -> bool {
        self.work_ticks > 0 || self.distraction_ticks > 0
    }
}

/// Single active timer with a distraction sub-state.
#[derive(Debug)]
pub struct TimerCore<C: Clock = SystemClock> {
    clock: C,
    state: TimerState,
    elapsed_seconds: u64,
    pending: Vec<Distraction>,
    distraction_started: Option<DateTime<Utc>>,
    work_ticker: Ticker,
    distraction_ticker: Ticker,
    ids: IdGenerator,
}

impl TimerCore<SystemClock> {
    /// A timer on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for TimerCore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TimerCore<C> {
    /// A timer on the given clock.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            state: TimerState::Idle,
            elapsed_seconds: 0,
            pending: Vec::new(),
            distraction_started: None,
            work_ticker: Ticker::per_second(),
            distraction_ticker: Ticker::per_second(),
            ids: IdGenerator::new(),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> TimerState {
        self.state
    }

    /// Work seconds accumulated in the current session.
    #[must_use]
    pub const fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Distractions resolved so far in the current session.
    #[must_use]
    pub fn pending_distractions(&self) -> &[Distraction] {
        &self.pending
    }

    /// Whether ending now would record a session.
    #[must_use]
    pub const fn has_time(&self) -> bool {
        self.elapsed_seconds > 0
    }

    /// Whole seconds since the open distraction began, 0 if none is open.
    #[must_use]
    pub fn distraction_elapsed_seconds(&self) -> u64 {
        self.distraction_started.map_or(0, |started| {
            let ms = (self.clock.now() - started).num_milliseconds().max(0);
            u64::try_from(ms / 1000).unwrap_or(0)
        })
    }

    /// Begin or resume work.
    ///
    /// # Errors
    ///
    /// Returns [`DeepWorkError::InvalidTransition`] unless idle or paused.
    pub fn start(&mut self) -> Result<(), DeepWorkError> {
        self.require(&[TimerState::Idle, TimerState::Paused], "start")?;
        self.enter_running();
        Ok(())
    }

    /// Freeze work time.
    ///
    /// # Errors
    ///
    /// Returns [`DeepWorkError::InvalidTransition`] unless running.
    pub fn pause(&mut self) -> Result<(), DeepWorkError> {
        self.require(&[TimerState::Running], "pause")?;
        self.work_ticker.cancel();
        self.state = TimerState::Paused;
        tracing::debug!(elapsed = self.elapsed_seconds, "timer paused");
        Ok(())
    }

    /// Stop work time and start timing a distraction.
    ///
    /// # Errors
    ///
    /// Returns [`DeepWorkError::InvalidTransition`] unless running.
    pub fn log_distraction(&mut self) -> Result<(), DeepWorkError> {
        self.require(&[TimerState::Running], "log a distraction")?;
        self.work_ticker.cancel();

        let now = self.clock.now();
        self.distraction_started = Some(now);
        self.distraction_ticker.arm(now);
        self.state = TimerState::Distracted;
        tracing::debug!(elapsed = self.elapsed_seconds, "distraction started");
        Ok(())
    }

    /// Record the open distraction with `reason` and go back to work.
    ///
    /// The duration is the wall-clock span since the distraction began,
    /// rounded to the nearest second.
    ///
    /// # Errors
    ///
    /// Returns [`DeepWorkError::InvalidTransition`] unless distracted, or
    /// [`DeepWorkError::Validation`] if `reason` is blank. The state is
    /// unchanged in both cases.
    pub fn resume_from_distraction(&mut self, reason: &str) -> Result<&Distraction, DeepWorkError> {
        self.require(&[TimerState::Distracted], "resume")?;

        let reason = reason.trim();
        if reason.is_empty() {
            return Err(DeepWorkError::Validation(
                "A reason is required to log a distraction".to_string(),
            ));
        }
        let Some(started) = self.distraction_started else {
            return Err(DeepWorkError::InvalidTransition {
                action: "resume",
                state: self.state,
            });
        };

        self.distraction_ticker.cancel();
        let now = self.clock.now();
        let distraction = Distraction {
            id: self.ids.next_at(now),
            reason: reason.to_string(),
            logged_at: to_timestamp(now),
            duration_seconds: rounded_seconds(now - started),
        };
        tracing::debug!(
            reason = %distraction.reason,
            duration = distraction.duration_seconds,
            "distraction logged"
        );
        self.pending.push(distraction);
        self.distraction_started = None;
        self.enter_running();

        Ok(&self.pending[self.pending.len() - 1])
    }

    /// Drop the open distraction without recording it and go back to work.
    ///
    /// # Errors
    ///
    /// Returns [`DeepWorkError::InvalidTransition`] unless distracted.
    pub fn cancel_distraction(&mut self) -> Result<(), DeepWorkError> {
        self.require(&[TimerState::Distracted], "cancel a distraction")?;
        self.distraction_ticker.cancel();
        self.distraction_started = None;
        self.enter_running();
        tracing::debug!("distraction cancelled");
        Ok(())
    }

    /// Finish the session and reset to idle.
    ///
    /// Returns the completed session, or `None` when no work time was
    /// accumulated. An open distraction is discarded.
    pub fn end_session(&mut self) -> Option<Session> {
        let session = self.build_session();
        self.reset();
        session
    }

    /// Finish the session, record it at the head of `store`, and reset.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot persist the session. The timer
    /// keeps its state so the user can try again.
    pub fn end_session_into<K: KeyValueStore>(
        &mut self,
        store: &mut SessionStore<K>,
    ) -> Result<Option<Session>, DeepWorkError> {
        let session = self.build_session();
        if let Some(ref s) = session {
            store.record_session(s.clone())?;
        }
        self.reset();
        Ok(session)
    }

    /// The current instant on this timer's clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Apply one clock tick.
    ///
    /// Returns true if work time advanced.
    pub fn tick(&mut self) -> bool {
        if self.state == TimerState::Running {
            self.elapsed_seconds += 1;
            true
        } else {
            false
        }
    }

    /// Apply every tick that has come due on the clock.
    pub fn pump(&mut self) -> Pumped {
        let now = self.clock.now();

        let work_ticks = self.work_ticker.take_due(now);
        for _ in 0..work_ticks {
            self.tick();
        }

        Pumped {
            work_ticks,
            distraction_ticks: self.distraction_ticker.take_due(now),
        }
    }

    /// Time until the next scheduled tick, if any ticker is armed.
    #[must_use]
    pub fn until_next_tick(&self) -> Option<Duration> {
        let now = self.clock.now();
        match (
            self.work_ticker.until_next(now),
            self.distraction_ticker.until_next(now),
        ) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn require(&self, allowed: &[TimerState], action: &'static str) -> Result<(), DeepWorkError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(DeepWorkError::InvalidTransition {
                action,
                state: self.state,
            })
        }
    }

    fn enter_running(&mut self) {
        self.work_ticker.arm(self.clock.now());
        self.state = TimerState::Running;
        tracing::debug!(elapsed = self.elapsed_seconds, "timer running");
    }

    fn build_session(&mut self) -> Option<Session> {
        if !self.has_time() {
            return None;
        }
        let now = self.clock.now();
        Some(Session {
            id: self.ids.next_at(now),
            duration_seconds: self.elapsed_seconds,
            distractions: self.pending.clone(),
            ended_at: to_timestamp(now),
        })
    }

    fn reset(&mut self) {
        self.work_ticker.cancel();
        self.distraction_ticker.cancel();
        self.state = TimerState::Idle;
        self.elapsed_seconds = 0;
        self.pending.clear();
        self.distraction_started = None;
        tracing::debug!("timer reset");
    }
}

/// Seconds in `span`, rounded half up, never negative.
fn rounded_seconds(span: Duration) -> u64 {
    let ms = span.num_milliseconds().max(0);
    u64::try_from((ms + 500) / 1000).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;
    use crate::features::session::DEFAULT_STORAGE_KEY;
    use crate::storage::MemoryKv;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap())
    }

    /// Advance one second at a time, pumping after each step.
    fn wait(timer: &mut TimerCore<ManualClock>, clock: &ManualClock, seconds: u32) {
        for _ in 0..seconds {
            clock.advance_secs(1);
            timer.pump();
        }
    }

    #[test]
    fn test_new_timer_is_idle() {
        let timer = TimerCore::with_clock(clock());
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.elapsed_seconds(), 0);
        assert!(timer.until_next_tick().is_none());
    }

    #[test]
    fn test_full_scenario() {
        let clock = clock();
        let mut timer = TimerCore::with_clock(clock.clone());

        timer.start().unwrap();
        wait(&mut timer, &clock, 65);
        timer.log_distraction().unwrap();
        wait(&mut timer, &clock, 10);
        assert_eq!(timer.distraction_elapsed_seconds(), 10);
        assert_eq!(timer.elapsed_seconds(), 65);

        let logged = timer.resume_from_distraction("noise").unwrap();
        assert_eq!(logged.duration_seconds, 10);
        wait(&mut timer, &clock, 5);

        let session = timer.end_session().unwrap();
        assert_eq!(session.duration_seconds, 70);
        assert_eq!(session.distractions.len(), 1);
        assert_eq!(session.distractions[0].reason, "noise");
        assert_eq!(session.distractions[0].duration_seconds, 10);
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn test_end_with_no_time_records_nothing() {
        let kv = MemoryKv::new();
        let mut store = SessionStore::load(&kv, DEFAULT_STORAGE_KEY);
        let mut timer = TimerCore::with_clock(clock());

        timer.start().unwrap();
        let ended = timer.end_session_into(&mut store).unwrap();

        assert!(ended.is_none());
        assert!(store.is_empty());
        assert_eq!(kv.get(DEFAULT_STORAGE_KEY).unwrap(), None);
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn test_end_session_into_records_at_head() {
        let clock = clock();
        let kv = MemoryKv::new();
        let mut store = SessionStore::load(&kv, DEFAULT_STORAGE_KEY);
        let mut timer = TimerCore::with_clock(clock.clone());

        for seconds in [3, 7] {
            timer.start().unwrap();
            wait(&mut timer, &clock, seconds);
            timer.end_session_into(&mut store).unwrap();
        }

        let durations: Vec<u64> = store.sessions().iter().map(|s| s.duration_seconds).collect();
        assert_eq!(durations, vec![7, 3]);
    }

    #[test]
    fn test_whitespace_reason_rejected() {
        let clock = clock();
        let mut timer = TimerCore::with_clock(clock.clone());
        timer.start().unwrap();
        wait(&mut timer, &clock, 2);
        timer.log_distraction().unwrap();

        let err = timer.resume_from_distraction("   ").unwrap_err();
        assert!(matches!(err, DeepWorkError::Validation(_)));
        assert_eq!(timer.state(), TimerState::Distracted);
        assert!(timer.pending_distractions().is_empty());

        assert!(timer.resume_from_distraction("").is_err());
        assert_eq!(timer.state(), TimerState::Distracted);
    }

    #[test]
    fn test_reason_is_trimmed() {
        let clock = clock();
        let mut timer = TimerCore::with_clock(clock.clone());
        timer.start().unwrap();
        timer.log_distraction().unwrap();
        let logged = timer.resume_from_distraction("  phone call \n").unwrap();
        assert_eq!(logged.reason, "phone call");
    }

    #[test]
    fn test_distraction_duration_rounds() {
        let clock = clock();
        let mut timer = TimerCore::with_clock(clock.clone());
        timer.start().unwrap();

        timer.log_distraction().unwrap();
        clock.advance(Duration::milliseconds(2499));
        assert_eq!(timer.resume_from_distraction("a").unwrap().duration_seconds, 2);

        timer.log_distraction().unwrap();
        clock.advance(Duration::milliseconds(2500));
        assert_eq!(timer.distraction_elapsed_seconds(), 2);
        assert_eq!(timer.resume_from_distraction("b").unwrap().duration_seconds, 3);
    }

    #[test]
    fn test_distraction_duration_never_negative() {
        let clock = clock();
        let mut timer = TimerCore::with_clock(clock.clone());
        timer.start().unwrap();
        timer.log_distraction().unwrap();

        clock.advance_secs(-30);
        assert_eq!(timer.distraction_elapsed_seconds(), 0);
        assert_eq!(timer.resume_from_distraction("clock skew").unwrap().duration_seconds, 0);
    }

    #[test]
    fn test_cancel_distraction_discards() {
        let clock = clock();
        let mut timer = TimerCore::with_clock(clock.clone());
        timer.start().unwrap();
        wait(&mut timer, &clock, 4);
        timer.log_distraction().unwrap();
        wait(&mut timer, &clock, 20);

        timer.cancel_distraction().unwrap();
        assert_eq!(timer.state(), TimerState::Running);
        assert!(timer.pending_distractions().is_empty());
        assert_eq!(timer.elapsed_seconds(), 4);
        assert_eq!(timer.distraction_elapsed_seconds(), 0);
    }

    #[test]
    fn test_pause_freezes_time() {
        let clock = clock();
        let mut timer = TimerCore::with_clock(clock.clone());
        timer.start().unwrap();
        wait(&mut timer, &clock, 3);
        timer.pause().unwrap();
        wait(&mut timer, &clock, 30);
        assert_eq!(timer.elapsed_seconds(), 3);

        timer.start().unwrap();
        wait(&mut timer, &clock, 2);
        assert_eq!(timer.elapsed_seconds(), 5);
    }

    #[test]
    fn test_resume_returns_latest_distraction() {
        let clock = clock();
        let mut timer = TimerCore::with_clock(clock.clone());
        timer.start().unwrap();

        timer.log_distraction().unwrap();
        clock.advance_secs(2);
        timer.resume_from_distraction("first").unwrap();

        timer.log_distraction().unwrap();
        clock.advance_secs(7);
        let logged = timer.resume_from_distraction("second").unwrap();
        assert_eq!(logged.reason, "second");
        assert_eq!(logged.duration_seconds, 7);
        assert_eq!(timer.pending_distractions().len(), 2);
    }

    #[test]
    fn test_long_suspend_counts_one_tick() {
        let clock = clock();
        let mut timer = TimerCore::with_clock(clock.clone());
        timer.start().unwrap();
        wait(&mut timer, &clock, 3);

        // Machine sleeps for eight hours, then the loop pumps once.
        clock.advance_secs(8 * 3600);
        let pumped = timer.pump();
        assert_eq!(pumped.work_ticks, 1);
        assert_eq!(timer.elapsed_seconds(), 4);

        wait(&mut timer, &clock, 2);
        assert_eq!(timer.elapsed_seconds(), 6);
    }

    #[test]
    fn test_long_suspend_while_distracted() {
        let clock = clock();
        let mut timer = TimerCore::with_clock(clock.clone());
        timer.start().unwrap();
        wait(&mut timer, &clock, 2);
        timer.log_distraction().unwrap();

        clock.advance_secs(8 * 3600);
        let pumped = timer.pump();
        assert_eq!(pumped.work_ticks, 0);
        assert!(pumped.distraction_ticks <= 1);
        assert_eq!(timer.elapsed_seconds(), 2);
    }

    #[test]
    fn test_stale_ticks_dropped_on_pause() {
        let clock = clock();
        let mut timer = TimerCore::with_clock(clock.clone());
        timer.start().unwrap();

        // Three seconds pass but the loop never pumped before the pause.
        clock.advance_secs(3);
        timer.pause().unwrap();
        assert_eq!(timer.pump(), Pumped::default());
        assert_eq!(timer.elapsed_seconds(), 0);
    }

    #[test]
    fn test_invalid_transitions_rejected() {
        let mut timer = TimerCore::with_clock(clock());

        assert!(matches!(
            timer.pause(),
            Err(DeepWorkError::InvalidTransition { state: TimerState::Idle, .. })
        ));
        assert!(timer.log_distraction().is_err());
        assert!(timer.cancel_distraction().is_err());
        assert!(timer.resume_from_distraction("x").is_err());

        timer.start().unwrap();
        assert!(timer.start().is_err());

        timer.log_distraction().unwrap();
        assert!(timer.start().is_err());
        assert!(timer.pause().is_err());
        assert_eq!(timer.state(), TimerState::Distracted);
    }

    #[test]
    fn test_end_while_distracted_discards_open_distraction() {
        let clock = clock();
        let mut timer = TimerCore::with_clock(clock.clone());
        timer.start().unwrap();
        wait(&mut timer, &clock, 8);
        timer.log_distraction().unwrap();
        wait(&mut timer, &clock, 3);

        let session = timer.end_session().unwrap();
        assert_eq!(session.duration_seconds, 8);
        assert!(session.distractions.is_empty());
        assert_eq!(timer.state(), TimerState::Idle);
        assert!(timer.until_next_tick().is_none());
    }

    #[test]
    fn test_manual_tick_only_counts_when_running() {
        let mut timer = TimerCore::with_clock(clock());
        assert!(!timer.tick());
        timer.start().unwrap();
        assert!(timer.tick());
        timer.log_distraction().unwrap();
        assert!(!timer.tick());
        assert_eq!(timer.elapsed_seconds(), 1);
    }

    #[test]
    fn test_session_ids_unique_within_instant() {
        let mut timer = TimerCore::with_clock(clock());
        timer.start().unwrap();
        timer.log_distraction().unwrap();
        let distraction_id = timer.resume_from_distraction("x").unwrap().id;
        timer.tick();
        let session = timer.end_session().unwrap();
        assert_ne!(session.id, distraction_id);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Start,
        Pause,
        Distract,
        Resume(String),
        Cancel,
        End,
        Wait(u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Start),
            Just(Op::Pause),
            Just(Op::Distract),
            prop_oneof![Just(String::new()), Just("  ".to_string()), "[a-z]{1,8}"].prop_map(Op::Resume),
            Just(Op::Cancel),
            Just(Op::End),
            (0u8..5).prop_map(Op::Wait),
        ]
    }

    proptest! {
        #[test]
        fn prop_state_machine_stays_consistent(ops in prop::collection::vec(op(), 0..60)) {
            let clock = clock();
            let mut timer = TimerCore::with_clock(clock.clone());

            for op in ops {
                let before = timer.state();
                let elapsed_before = timer.elapsed_seconds();
                let result = match op {
                    Op::Start => timer.start().map(|()| ()),
                    Op::Pause => timer.pause(),
                    Op::Distract => timer.log_distraction(),
                    Op::Resume(reason) => timer.resume_from_distraction(&reason).map(|_| ()),
                    Op::Cancel => timer.cancel_distraction(),
                    Op::End => {
                        if let Some(session) = timer.end_session() {
                            prop_assert!(session.duration_seconds > 0);
                            prop_assert_eq!(session.duration_seconds, elapsed_before);
                        }
                        prop_assert_eq!(timer.state(), TimerState::Idle);
                        Ok(())
                    }
                    Op::Wait(n) => {
                        wait(&mut timer, &clock, u32::from(n));
                        if before == TimerState::Running {
                            prop_assert_eq!(timer.elapsed_seconds(), elapsed_before + u64::from(n));
                        } else {
                            prop_assert_eq!(timer.elapsed_seconds(), elapsed_before);
                        }
                        Ok(())
                    }
                };

                if result.is_err() {
                    prop_assert_eq!(timer.state(), before);
                    prop_assert_eq!(timer.elapsed_seconds(), elapsed_before);
                }

                let distracted = timer.state() == TimerState::Distracted;
                prop_assert_eq!(timer.distraction_started.is_some(), distracted);
                prop_assert_eq!(timer.distraction_ticker.is_armed(), distracted);
                prop_assert_eq!(
                    timer.work_ticker.is_armed(),
                    timer.state() == TimerState::Running
                );
                if timer.state() == TimerState::Idle {
                    prop_assert_eq!(timer.elapsed_seconds(), 0);
                    prop_assert!(timer.pending_distractions().is_empty());
                }
            }
        }
    }
}
