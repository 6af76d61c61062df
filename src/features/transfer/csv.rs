//! CSV export of session history.

use chrono::{Local, NaiveDate, TimeZone};

use crate::core::datetime::{format_clock, format_minutes, short_date, time_label_in};
use crate::features::session::Session;

/// Header row, in column order.
pub const CSV_HEADERS: [&str; 5] = [
    "Date",
    "Duration (min)",
    "Duration (formatted)",
    "Distractions Count",
    "Distraction Details",
];

/// Default file name for an export made on `today`.
#[must_use]
pub fn default_csv_name(today: NaiveDate) -> String {
    format!("deep-work-sessions-{}.csv", today.format("%Y-%m-%d"))
}

/// Render sessions as CSV, dates and times as seen from `tz`.
///
/// Every field is quoted; embedded quotes are doubled.
#[must_use]
pub fn sessions_to_csv_in<Tz: TimeZone>(sessions: &[Session], tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut lines = Vec::with_capacity(sessions.len() + 1);
    lines.push(csv_line(CSV_HEADERS.iter().map(|h| (*h).to_string())));

    for session in sessions {
        let date = session
            .ended_on_in(tz)
            .map_or_else(|| session.ended_at.clone(), short_date);

        let details = session
            .distractions
            .iter()
            .map(|d| {
                let when = time_label_in(&d.logged_at, tz);
                if d.duration_seconds > 0 {
                    format!("{} ({} - {})", d.reason, when, format_clock(d.duration_seconds))
                } else {
                    format!("{} ({})", d.reason, when)
                }
            })
            .collect::<Vec<_>>()
            .join("; ");

        lines.push(csv_line([
            date,
            format_minutes(session.duration_seconds),
            format_clock(session.duration_seconds),
            session.distraction_count().to_string(),
            details,
        ]));
    }

    lines.join("\n")
}

/// Render sessions as CSV in local time.
#[must_use]
pub fn sessions_to_csv(sessions: &[Session]) -> String {
    sessions_to_csv_in(sessions, &Local)
}

fn csv_line(cells: impl IntoIterator<Item = String>) -> String {
    cells
        .into_iter()
        .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",")
}
