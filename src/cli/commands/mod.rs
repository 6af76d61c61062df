//! Command implementations for deepwork.
//!
//! Every command renders its result to a string; `main` prints it.

mod completions;
mod data;

pub use completions::completions;
pub use data::{clear, export, import};

use crate::cli::args::OutputFormat;
use crate::error::DeepWorkError;
use crate::features::session::{group_by_date, SessionStore};
use crate::output::{format_history, format_totals};
use crate::storage::KeyValueStore;

/// Execute history command
///
/// # Errors
///
/// Returns an error if output formatting fails.
pub fn history<K: KeyValueStore>(
    store: &SessionStore<K>,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<String, DeepWorkError> {
    let sessions = store.sessions();
    let shown = limit.map_or(sessions, |n| &sessions[..n.min(sessions.len())]);
    format_history(&group_by_date(shown), format)
}

/// Execute stats command
///
/// # Errors
///
/// Returns an error if output formatting fails.
pub fn stats<K: KeyValueStore>(
    store: &SessionStore<K>,
    format: OutputFormat,
) -> Result<String, DeepWorkError> {
    format_totals(&store.totals(), format)
}
