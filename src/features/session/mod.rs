//! Completed sessions and their history.
//!
//! - [`Session`] / [`Distraction`]: the records
//! - [`SessionStore`]: newest-first history persisted under one key
//! - [`group_by_date`] / [`Totals`]: read-only views for review

mod model;
mod record;
mod store;
mod summary;

pub use model::{Distraction, Session};
pub use record::{parse_sessions, StoredHistory};
pub use store::{SessionStore, DEFAULT_STORAGE_KEY};
pub use summary::{group_by_date, group_by_date_in, DateGroup, Totals};
