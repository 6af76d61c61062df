//! Path resolution for deepwork configuration and data files.
//!
//! Everything lives under one root, `~/.deepwork/` unless overridden:
//! - `config.yaml` - Main configuration file
//! - `deepwork.db` - SQLite database holding the session history
//! - `deepwork.log` - Log output while the interactive timer owns the terminal

use std::path::PathBuf;

use crate::error::DeepWorkError;

/// Paths to deepwork configuration and data files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Root directory: `~/.deepwork/`
    pub root: PathBuf,
    /// Config file: `~/.deepwork/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.deepwork/deepwork.db`
    pub database: PathBuf,
    /// Log file: `~/.deepwork/deepwork.log`
    pub log_file: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, DeepWorkError> {
        let home = std::env::var("HOME").map_err(|_| {
            DeepWorkError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".deepwork")))
    }

    /// Use `root` if given, otherwise the default under `$HOME`.
    ///
    /// # Errors
    ///
    /// Returns an error if no root is given and the home directory cannot be
    /// determined.
    pub fn resolve(root: Option<PathBuf>) -> Result<Self, DeepWorkError> {
        root.map_or_else(Self::new, |root| Ok(Self::with_root(root)))
    }

    /// Create paths with a custom root directory.
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("deepwork.db"),
            log_file: root.join("deepwork.log"),
            root,
        }
    }

    /// Ensure the root directory exists, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), DeepWorkError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                DeepWorkError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }

        Ok(())
    }
}
