//! Deep work timer.
//!
//! Tracks one session at a time: work time, pauses, and distractions logged
//! while the session runs.

mod engine;

pub use engine::{Pumped, TimerCore, TimerState};
