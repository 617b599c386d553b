//! Logging helpers
//!
//! Consistent start/complete lines for file loads and pipeline steps.

use std::path::Path;
use std::time::Duration;

/// Log the start of an operation on a file
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log the completion of an operation on a file
///
/// # Arguments
/// * `operation` - Past-tense verb, e.g. "read"
/// * `path` - File that was operated on
/// * `rows` - Number of rows produced
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(
    operation: &str,
    path: &Path,
    rows: usize,
    elapsed: Option<Duration>,
) {
    match elapsed {
        Some(duration) => log::info!(
            "Successfully {} {} rows from {} in {:?}",
            operation,
            rows,
            path.display(),
            duration
        ),
        None => log::info!(
            "Successfully {} {} rows from {}",
            operation,
            rows,
            path.display()
        ),
    }
}

/// Log a pipeline step over an in-memory table
pub fn log_step(step: &str, rows: usize) {
    log::debug!("{step}: {rows} rows");
}

/// Log a warning, optionally tied to a file
pub fn log_warning(message: &str, path: Option<&Path>) {
    match path {
        Some(path) => log::warn!("{}: {}", message, path.display()),
        None => log::warn!("{message}"),
    }
}
