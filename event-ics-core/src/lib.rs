//! Event ICS Core Library
//!
//! This library turns the loosely formatted fields of an event card into
//! ICS calendar files, and renders the card itself as sanitized HTML.

pub mod card;
pub mod date;
pub mod error;
pub mod export;
pub mod ics;
pub mod sanitize;
pub mod timestamp;
pub mod types;

// Re-export core types and error handling
pub use error::{Error, Result};
pub use types::*;

/// Commonly used items
pub mod prelude {
    pub use crate::{card::*, date::*, export::*, ics::*, sanitize::*, timestamp::*, types::*};
}
