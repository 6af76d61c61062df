//! Configuration management for deepwork.
//!
//! This module handles loading and saving configuration from `~/.deepwork/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{ColorSetting, Config, ExportConfig, GeneralConfig, LoggingConfig, StorageConfig};
