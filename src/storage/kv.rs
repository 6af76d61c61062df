//! Key-value backends.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::error::DeepWorkError;

/// A string-to-string store addressed by key.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore {
    /// Read the value under `key`, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, DeepWorkError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), DeepWorkError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), DeepWorkError>;
}

/// Key-value store on the `kv_store` table.
pub struct SqliteKv {
    db: Database,
}

impl SqliteKv {
    /// Wrap an open database.
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open the database at `path` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open_at(path: &std::path::Path) -> Result<Self, DeepWorkError> {
        Ok(Self::new(Database::open_at(path)?))
    }
}

impl KeyValueStore for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>, DeepWorkError> {
        self.db
            .connection()
            .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|e| DeepWorkError::Database(format!("Failed to read key {key}: {e}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DeepWorkError> {
        self.db
            .connection()
            .execute(
                r"INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                  ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, Utc::now().to_rfc3339()],
            )
            .map(|_| ())
            .map_err(|e| DeepWorkError::Database(format!("Failed to write key {key}: {e}")))
    }

    fn remove(&self, key: &str) -> Result<(), DeepWorkError> {
        self.db
            .connection()
            .execute("DELETE FROM kv_store WHERE key = ?1", [key])
            .map(|_| ())
            .map_err(|e| DeepWorkError::Database(format!("Failed to remove key {key}: {e}")))
    }
}

/// Process-local store. Contents vanish on drop.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryKv {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with one entry.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, DeepWorkError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DeepWorkError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DeepWorkError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, DeepWorkError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DeepWorkError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), DeepWorkError> {
        (**self).remove(key)
    }
}
