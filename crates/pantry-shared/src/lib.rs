//! # pantry-shared
//!
//! Constants and small value types shared by the store and the client core.

pub mod constants;
pub mod error;
pub mod types;

pub use error::ReminderTimeError;
pub use types::ReminderTime;
