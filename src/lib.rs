//! deepwork - a deep-work timer for the terminal
//!
//! This crate provides a single-session work timer that logs distractions,
//! a persistent session history, and CSV/JSON export and import.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod logging;
pub mod output;
pub mod storage;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::DeepWorkError;
pub use features::session::SessionStore;
pub use features::timer::TimerCore;
