//! JSON backup export and import.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DeepWorkError, ImportError};
use crate::features::session::{parse_sessions, Session, SessionStore, Totals};
use crate::storage::KeyValueStore;

/// A full history backup with summary fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    /// Newest first.
    pub sessions: Vec<Session>,
    /// ISO-8601 instant the backup was made.
    pub export_date: String,
    /// Number of sessions.
    pub total_sessions: usize,
    /// Sum of work seconds.
    pub total_time: u64,
    /// Sum of distraction counts.
    pub total_distractions: usize,
}

impl Backup {
    /// Snapshot `sessions` as of `exported_at`.
    #[must_use]
    pub fn new(sessions: &[Session], exported_at: DateTime<Utc>) -> Self {
        let totals = Totals::of(sessions);
        Self {
            sessions: sessions.to_vec(),
            export_date: exported_at.to_rfc3339(),
            total_sessions: totals.total_sessions,
            total_time: totals.total_duration_seconds,
            total_distractions: totals.total_distraction_count,
        }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, DeepWorkError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Default file name for a backup made on `today`.
#[must_use]
pub fn default_backup_name(today: NaiveDate) -> String {
    format!("deep-work-backup-{}.json", today.format("%Y-%m-%d"))
}

/// Validate a backup (or raw storage record) and extract its sessions.
///
/// # Errors
///
/// Returns an [`ImportError`] if the document is not usable.
pub fn read_backup(json: &str) -> Result<Vec<Session>, ImportError> {
    parse_sessions(json)
}

/// Replace the history in `store` with the sessions in `json`.
///
/// Returns the number of sessions imported. On any error the store is left
/// exactly as it was.
///
/// # Errors
///
/// Returns [`DeepWorkError::Import`] for an unusable document, or a storage
/// error if the new history cannot be persisted.
pub fn import_into<K: KeyValueStore>(
    store: &mut SessionStore<K>,
    json: &str,
) -> Result<usize, DeepWorkError> {
    let sessions = read_backup(json).inspect_err(|e| {
        tracing::warn!(error = %e, "rejected import");
    })?;
    let count = sessions.len();
    store.replace_all(sessions)?;
    tracing::info!(count, "imported sessions");
    Ok(count)
}
