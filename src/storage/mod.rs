//! Storage layer for deepwork.
//!
//! Session history lives under a single key in a key-value store. The
//! default backend is a small SQLite table; an in-memory backend is used for
//! tests and throwaway runs.

mod database;
mod kv;
mod migrations;

pub use database::Database;
pub use kv::{KeyValueStore, MemoryKv, SqliteKv};

#[cfg(test)]
pub use kv::MockKeyValueStore;
