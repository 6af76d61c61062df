//! Date and time helpers.
//!
//! Timestamps are stored as strings so that histories written by older
//! versions (and hand-edited backups) survive a round trip untouched. These
//! helpers turn them back into calendar dates and display labels.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// US locale format written by the browser version of the logger.
const LOCALE_DATETIME: &str = "%m/%d/%Y, %I:%M:%S %p";

/// Render a moment as the canonical stored timestamp (RFC 3339, local offset).
#[must_use]
pub fn to_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).to_rfc3339()
}

/// A timestamp string parsed into something datable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parsed {
    /// Carries an offset, so it can be shifted into any zone.
    Absolute(DateTime<Utc>),
    /// Wall time with no zone, taken as already local to the reader.
    Floating(NaiveDateTime),
    /// Date only.
    Day(NaiveDate),
}

fn parse(timestamp: &str) -> Option<Parsed> {
    let s = timestamp.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(Parsed::Absolute(dt.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, LOCALE_DATETIME) {
        return Some(Parsed::Floating(naive));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Parsed::Floating(naive));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(Parsed::Day)
}

/// The calendar date of `timestamp` as seen from `tz`.
///
/// Returns `None` when the string is not in any recognised format.
#[must_use]
pub fn calendar_date_in<Tz: TimeZone>(timestamp: &str, tz: &Tz) -> Option<NaiveDate> {
    match parse(timestamp)? {
        Parsed::Absolute(dt) => Some(dt.with_timezone(tz).date_naive()),
        Parsed::Floating(naive) => Some(naive.date()),
        Parsed::Day(date) => Some(date),
    }
}

/// Time-of-day label (`HH:MM:SS`) for `timestamp` as seen from `tz`.
///
/// Unrecognised strings are returned unchanged.
#[must_use]
pub fn time_label_in<Tz: TimeZone>(timestamp: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match parse(timestamp) {
        Some(Parsed::Absolute(dt)) => dt.with_timezone(tz).format("%H:%M:%S").to_string(),
        Some(Parsed::Floating(naive)) => naive.format("%H:%M:%S").to_string(),
        Some(Parsed::Day(_)) | None => timestamp.to_string(),
    }
}

/// Short date label (`M/D/YYYY`) for CSV rows.
#[must_use]
pub fn short_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Heading label for a day of history, e.g. `Fri, Mar 1 2024`.
#[must_use]
pub fn day_heading(date: NaiveDate) -> String {
    date.format("%a, %b %-d %Y").to_string()
}

/// Heading relative to `today`: `Today`, `Yesterday`, else [`day_heading`].
#[must_use]
pub fn relative_day_heading(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if today.pred_opt() == Some(date) {
        "Yesterday".to_string()
    } else {
        day_heading(date)
    }
}

/// Today's date in the local time zone.
#[must_use]
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format seconds as `MM:SS`, or `HH:MM:SS` once an hour is reached.
#[must_use]
pub fn format_clock(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Seconds as minutes rounded to two decimals, without trailing zeros.
#[must_use]
pub fn format_minutes(seconds: u64) -> String {
    let hundredths = (u128::from(seconds) * 100 + 30) / 60;
    let whole = hundredths / 100;
    let frac = hundredths % 100;

    if frac == 0 {
        whole.to_string()
    } else if frac % 10 == 0 {
        format!("{whole}.{}", frac / 10)
    } else {
        format!("{whole}.{frac:02}")
    }
}
