//! Moving history in and out.
//!
//! CSV for spreadsheets, JSON backups for restoring, and a validated import
//! that only touches the store once the whole file checks out.

mod backup;
mod csv;

pub use backup::{default_backup_name, import_into, read_backup, Backup};
pub use csv::{default_csv_name, sessions_to_csv, sessions_to_csv_in, CSV_HEADERS};
