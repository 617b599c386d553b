//! Shared helpers for logging and Arrow column access

pub mod arrow;
pub mod logging;
