use colored::Colorize;
use chrono::{Local, NaiveDate};

use crate::core::datetime::{format_clock, relative_day_heading, time_label_in};
use crate::features::session::{DateGroup, Session, Totals};

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// Format grouped history as a day-by-day listing, labelling `today` and
/// the day before it by name.
pub fn format_history_pretty(groups: &[DateGroup<'_>], today: NaiveDate) -> String {
    if groups.is_empty() {
        return "History (0 sessions)\n  No sessions yet. Start one with: deepwork".to_string();
    }

    let count: usize = groups.iter().map(|g| g.sessions.len()).sum();
    let mut output = format!("History ({})\n", plural(count, "session"));
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for group in groups {
        let heading = group
            .date
            .map_or_else(|| "Unknown date".to_string(), |d| relative_day_heading(d, today));

        output.push_str(&format!(
            "{}  {}  {}\n",
            heading.bold(),
            format_clock(group.total_seconds()).green(),
            plural(group.distraction_count(), "distraction").dimmed()
        ));

        for session in &group.sessions {
            output.push_str(&format_session_line(session));
        }
        output.push('\n');
    }

    output.trim_end().to_string()
}

fn format_session_line(session: &Session) -> String {
    let mut line = format!(
        "  {}  {}",
        time_label_in(&session.ended_at, &Local).dimmed(),
        format_clock(session.duration_seconds)
    );

    if session.distraction_count() > 0 {
        line.push_str(&format!(
            "  {}",
            plural(session.distraction_count(), "distraction").yellow()
        ));
    }
    line.push('\n');

    for d in &session.distractions {
        line.push_str(&format!(
            "      - {} {}\n",
            d.reason,
            format!("({})", format_clock(d.duration_seconds)).dimmed()
        ));
    }

    line
}

/// Format aggregate totals
pub fn format_totals_pretty(totals: &Totals) -> String {
    let mut output = "Deep work totals\n".bold().to_string();
    output.push_str(&"─".repeat(40));
    output.push('\n');

    output.push_str(&format!("  {:<20} {}\n", "Sessions".dimmed(), totals.total_sessions));
    output.push_str(&format!(
        "  {:<20} {}\n",
        "Focused time".dimmed(),
        format_clock(totals.total_duration_seconds).green()
    ));
    output.push_str(&format!(
        "  {:<20} {}\n",
        "Distractions".dimmed(),
        totals.total_distraction_count
    ));
    output.push_str(&format!(
        "  {:<20} {}",
        "Distracted time".dimmed(),
        format_clock(totals.total_distraction_seconds).yellow()
    ));

    if totals.total_sessions > 0 {
        let per_session = totals.total_distraction_count as f64 / totals.total_sessions as f64;
        output.push_str(&format!(
            "\n  {:<20} {per_session:.1}",
            "Per session".dimmed()
        ));
    }

    output
}
