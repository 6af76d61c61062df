//! Session history store.
//!
//! Holds completed sessions newest first and mirrors every change into a
//! [`KeyValueStore`] under a single key.

use chrono::Utc;

use super::model::Session;
use super::record::{parse_sessions, StoredHistory};
use super::summary::{group_by_date, DateGroup, Totals};
use crate::error::DeepWorkError;
use crate::storage::KeyValueStore;

/// Key the history is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "deepWorkData";

/// Ordered session history backed by a key-value store.
pub struct SessionStore<K: KeyValueStore> {
    kv: K,
    key: String,
    sessions: Vec<Session>,
}

impl<K: KeyValueStore> SessionStore<K> {
    /// Load history from `kv`.
    ///
    /// A missing key, unreadable backend, malformed JSON or a record without
    /// a `sessions` array all yield an empty store.
    pub fn load(kv: K, key: impl Into<String>) -> Self {
        let key = key.into();

        let sessions = match kv.get(&key) {
            Ok(Some(raw)) => parse_sessions(&raw).unwrap_or_else(|e| {
                tracing::warn!(%key, error = %e, "stored history unreadable, starting empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(%key, error = %e, "could not read stored history, starting empty");
                Vec::new()
            }
        };

        tracing::debug!(%key, count = sessions.len(), "loaded session history");
        Self { kv, key, sessions }
    }

    /// Sessions, newest first.
    #[must_use]
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Number of sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether there is no history.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// The storage key in use.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Add a session at the head and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; the in-memory list is left as it
    /// was before the call.
    pub fn record_session(&mut self, session: Session) -> Result<(), DeepWorkError> {
        let id = session.id;
        self.sessions.insert(0, session);

        if let Err(e) = self.save() {
            self.sessions.remove(0);
            return Err(e);
        }

        tracing::info!(id, total = self.sessions.len(), "recorded session");
        Ok(())
    }

    /// Replace the whole history and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; the previous history is kept.
    pub fn replace_all(&mut self, sessions: Vec<Session>) -> Result<(), DeepWorkError> {
        let previous = std::mem::replace(&mut self.sessions, sessions);

        if let Err(e) = self.save() {
            self.sessions = previous;
            return Err(e);
        }

        tracing::info!(total = self.sessions.len(), "replaced session history");
        Ok(())
    }

    /// Drop all history, in memory and in the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend key cannot be removed.
    pub fn clear(&mut self) -> Result<(), DeepWorkError> {
        self.kv.remove(&self.key)?;
        self.sessions.clear();
        tracing::info!(key = %self.key, "cleared session history");
        Ok(())
    }

    /// Write the current history with a fresh `lastUpdated`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self) -> Result<(), DeepWorkError> {
        let record = StoredHistory {
            sessions: self.sessions.clone(),
            last_updated: Utc::now().to_rfc3339(),
        };
        let json = serde_json::to_string(&record)?;
        self.kv.set(&self.key, &json)
    }

    /// Aggregates over the whole history.
    #[must_use]
    pub fn totals(&self) -> Totals {
        Totals::of(&self.sessions)
    }

    /// History partitioned by local calendar date.
    #[must_use]
    pub fn group_by_date(&self) -> Vec<DateGroup<'_>> {
        group_by_date(&self.sessions)
    }
}
