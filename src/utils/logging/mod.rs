//! Logging utilities
//!
//! This module provides standardized log lines and progress bars for
//! long-running operations.

pub mod log;
pub mod progress;

// Re-export commonly used functions for convenience
pub use self::log::{log_operation_complete, log_operation_start, log_step, log_warning};
pub use self::progress::create_load_progress_bar;
