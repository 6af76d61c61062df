//! Record identifiers.

use chrono::{DateTime, Utc};

/// Hands out epoch-millisecond ids that strictly increase.
///
/// Two records created within the same millisecond still get distinct ids.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    /// Create a generator with no history.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: 0 }
    }

    /// Next id for a record created at `at`.
    pub fn next_at(&mut self, at: DateTime<Utc>) -> i64 {
        let candidate = at.timestamp_millis();
        self.last = if candidate > self.last {
            candidate
        } else {
            self.last + 1
        };
        self.last
    }
}
