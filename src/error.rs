//! Error types for deepwork.

use thiserror::Error;

use crate::features::timer::TimerState;

/// Errors that can occur anywhere in deepwork.
#[derive(Debug, Error)]
pub enum DeepWorkError {
    /// Configuration or path resolution problem.
    #[error("Configuration error: {0}")]
    Config(String),

    /// SQLite failure in the storage layer.
    #[error("Database error: {0}")]
    Database(String),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A timer operation was requested from a state that does not allow it.
    #[error("Cannot {action} while the timer is {state}")]
    InvalidTransition {
        /// The operation that was attempted.
        action: &'static str,
        /// The state the timer was in.
        state: TimerState,
    },

    /// User input was rejected. The state is unchanged.
    #[error("{0}")]
    Validation(String),

    /// An import file was rejected. The store is unchanged.
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    /// Terminal setup or drawing failed.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// Reasons an import file is rejected.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The file is not valid JSON.
    #[error("file is not valid JSON ({0})")]
    Malformed(serde_json::Error),

    /// The top-level value is not an object with a `sessions` key.
    #[error("no \"sessions\" list found; is this a deepwork backup?")]
    MissingSessions,

    /// `sessions` exists but is not an array.
    #[error("\"sessions\" must be a list")]
    SessionsNotArray,

    /// A session entry has the wrong shape.
    #[error("session #{index} is invalid ({source})")]
    InvalidSession {
        /// Zero-based position of the entry in the file.
        index: usize,
        /// Underlying decode failure.
        source: serde_json::Error,
    },
}

impl DeepWorkError {
    /// Whether this error leaves the application fully usable.
    ///
    /// Validation and transition errors are expected during normal use. The
    /// TUI shows them as-is in the status bar and logs anything else as an
    /// error.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidTransition { .. } | Self::Import(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_message() {
        let err = DeepWorkError::InvalidTransition {
            action: "pause",
            state: TimerState::Idle,
        };
        assert_eq!(err.to_string(), "Cannot pause while the timer is idle");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_import_error_wraps() {
        let err: DeepWorkError = ImportError::MissingSessions.into();
        assert!(err.to_string().starts_with("Import failed:"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_database_error_not_recoverable() {
        let err = DeepWorkError::Database("locked".to_string());
        assert!(!err.is_recoverable());
    }
}
