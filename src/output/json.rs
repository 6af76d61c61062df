//! JSON output formatting for deepwork.

use serde::Serialize;
use serde_json::json;

use crate::error::DeepWorkError;
use crate::features::session::DateGroup;

/// Format grouped history as JSON.
///
/// Days whose sessions carry an unreadable timestamp have a `null` date.
///
/// # Errors
///
/// Returns `DeepWorkError::Parse` if JSON serialization fails.
pub fn format_history_json(groups: &[DateGroup<'_>]) -> Result<String, DeepWorkError> {
    let days: Vec<_> = groups
        .iter()
        .map(|group| {
            json!({
                "date": group.date,
                "totalTime": group.total_seconds(),
                "distractions": group.distraction_count(),
                "sessions": group.sessions,
            })
        })
        .collect();

    let output = json!({
        "count": groups.iter().map(|g| g.sessions.len()).sum::<usize>(),
        "days": days,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `DeepWorkError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, DeepWorkError> {
    Ok(serde_json::to_string_pretty(value)?)
}
