//! The persisted history record and its validation.
//!
//! Both the storage record and backup files carry a top-level `sessions`
//! array. [`parse_sessions`] is the single gate every such document passes
//! through before it can reach the store.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::model::Session;
use crate::error::ImportError;

/// What is written under the storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredHistory {
    /// Newest first.
    pub sessions: Vec<Session>,
    /// ISO-8601 instant of the write.
    pub last_updated: String,
}

/// Validate a JSON document and pull out its sessions.
///
/// Any other top-level fields (export metadata, `lastUpdated`) are ignored.
///
/// # Errors
///
/// Returns an [`ImportError`] describing the first problem found.
pub fn parse_sessions(json: &str) -> Result<Vec<Session>, ImportError> {
    let document: Value = serde_json::from_str(json).map_err(ImportError::Malformed)?;

    let entries = match document.get("sessions") {
        None | Some(Value::Null) => return Err(ImportError::MissingSessions),
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(ImportError::SessionsNotArray),
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            Session::deserialize(entry).map_err(|source| ImportError::InvalidSession { index, source })
        })
        .collect()
}
