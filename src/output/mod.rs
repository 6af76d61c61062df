//! Output formatting for deepwork.
//!
//! This module provides formatters for displaying session history in various
//! formats.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::core::datetime::local_today;
use crate::error::DeepWorkError;
use crate::features::session::{DateGroup, Totals};

pub use json::*;
pub use pretty::*;

/// Format grouped history based on output format.
///
/// # Errors
///
/// Returns `DeepWorkError::Parse` if JSON serialization fails.
pub fn format_history(groups: &[DateGroup<'_>], format: OutputFormat) -> Result<String, DeepWorkError> {
    match format {
        OutputFormat::Pretty => Ok(format_history_pretty(groups, local_today())),
        OutputFormat::Json => format_history_json(groups),
    }
}

/// Format totals based on output format.
///
/// # Errors
///
/// Returns `DeepWorkError::Parse` if JSON serialization fails.
pub fn format_totals(totals: &Totals, format: OutputFormat) -> Result<String, DeepWorkError> {
    match format {
        OutputFormat::Pretty => Ok(format_totals_pretty(totals)),
        OutputFormat::Json => to_json(totals),
    }
}
