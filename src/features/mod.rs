//! Feature implementations for deepwork.
//!
//! - Timer: the session state machine
//! - Session: completed sessions, history store, grouping and totals
//! - Transfer: CSV/JSON export and validated import

pub mod session;
pub mod timer;
pub mod transfer;
