//! Completed sessions and the distractions logged inside them.
//!
//! Field names on the wire match the browser logger's storage record, so a
//! history exported there imports here unchanged.

use chrono::{Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::core::datetime;

/// An interruption recorded during a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distraction {
    /// Unique id, assigned when the distraction is resolved.
    pub id: i64,
    /// What pulled focus away. Never blank.
    pub reason: String,
    /// When the distraction was resolved.
    #[serde(rename = "timestamp")]
    pub logged_at: String,
    /// Seconds spent distracted.
    #[serde(rename = "duration", default)]
    pub duration_seconds: u64,
}

/// A finished block of deep work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique id, assigned when the session ends.
    pub id: i64,
    /// Seconds of active, non-distracted work.
    #[serde(rename = "duration")]
    pub duration_seconds: u64,
    /// Distractions in the order they happened.
    #[serde(default)]
    pub distractions: Vec<Distraction>,
    /// When the session was ended.
    #[serde(rename = "timestamp")]
    pub ended_at: String,
}

impl Session {
    /// Number of distractions logged.
    #[must_use]
    pub fn distraction_count(&self) -> usize {
        self.distractions.len()
    }

    /// Total seconds spent distracted.
    #[must_use]
    pub fn distraction_seconds(&self) -> u64 {
        self.distractions
            .iter()
            .fold(0, |acc: u64, d| acc.saturating_add(d.duration_seconds))
    }

    /// Calendar date the session ended on, as seen from `tz`.
    #[must_use]
    pub fn ended_on_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<NaiveDate> {
        datetime::calendar_date_in(&self.ended_at, tz)
    }

    /// Calendar date the session ended on, in local time.
    #[must_use]
    pub fn ended_on(&self) -> Option<NaiveDate> {
        self.ended_on_in(&Local)
    }
}
