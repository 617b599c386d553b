//! Utility functions for error handling
//!
//! Helpers that attach path context to I/O failures while opening input files.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::DataLoadError;

/// Open an input file, distinguishing a missing path from other I/O failures
///
/// # Arguments
/// * `path` - The path to the file to open
///
/// # Returns
/// * `Result<fs::File, DataLoadError>` - The opened file or a load error carrying the path
pub fn safe_open_file(path: &Path) -> Result<fs::File, DataLoadError> {
    if !path.exists() {
        return Err(DataLoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    if !path.is_file() {
        return Err(DataLoadError::Io {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "path is not a file"),
        });
    }

    fs::File::open(path).map_err(|e| match e.kind() {
        // Deleted between the existence check and the open
        io::ErrorKind::NotFound => DataLoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => DataLoadError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })
}
