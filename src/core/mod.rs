//! Core abstractions for deepwork.
//!
//! Clock sources, the repeating tick schedule, id generation and the
//! date/time helpers shared by every feature.

mod clock;
pub mod datetime;
mod ids;
mod ticker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ids::IdGenerator;
pub use ticker::Ticker;
