//! Domain models for disaster event tables
//!
//! This module contains the raw event record read from the input file and
//! the categorical values derived from it.

pub mod columns;
pub mod event;
pub mod status;

// Re-export commonly used types
pub use event::{PreparedEvent, RawEvent};
pub use status::DevelopmentStatus;
