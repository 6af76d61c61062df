//! Structured logging with tracing.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

use crate::error::DeepWorkError;

/// Filter directive for a `-v` count, falling back to `configured`.
#[must_use]
pub fn level_for(verbose: u8, configured: &str) -> &str {
    match verbose {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `level`. With `log_file` set, output is appended
/// there without ANSI colors; otherwise it goes to stderr.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(level: &str, log_file: Option<&Path>) -> Result<(), DeepWorkError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let installed = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .compact()
                .try_init()
        }
        None => fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .try_init(),
    };

    // Already installed (e.g. by a test harness) is fine
    if let Err(e) = installed {
        tracing::debug!(error = %e, "subscriber already set");
    }
    Ok(())
}
