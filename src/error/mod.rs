//! Error handling for the preparation pipeline.

use std::io;
use std::path::PathBuf;

use arrow::error::ArrowError;

pub mod util;

/// Errors raised while reading the raw event file
///
/// All of these are fatal to the pipeline. The source is static and local,
/// so the caller gets the error once and nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// Input file does not exist
    #[error("Input file not found: {}", path.display())]
    NotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// Input exists but could not be read
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path that caused the error
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Malformed CSV structure
    #[error("CSV error in {source_name}: {source}")]
    Csv {
        /// File path or reader description
        source_name: String,
        /// Underlying CSV error
        source: csv::Error,
    },

    /// Header row lacks a required column
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// Name of the absent column
        column: String,
    },

    /// Date value matched none of the configured formats
    #[error("Row {row}: unparsable date '{value}'")]
    InvalidDate {
        /// 1-based data row (header excluded)
        row: usize,
        /// Raw cell value
        value: String,
    },

    /// A numeric field could not be parsed
    #[error("Row {row}: invalid value '{value}' in column '{column}'")]
    InvalidValue {
        /// 1-based data row (header excluded)
        row: usize,
        /// Column holding the value
        column: String,
        /// Raw cell value
        value: String,
    },
}

/// Errors for the library as a whole
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Loading the raw events failed
    #[error(transparent)]
    DataLoad(#[from] DataLoadError),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Requested column is not part of the table
    #[error("Column '{column}' not found")]
    ColumnNotFound {
        /// Name of the column
        column: String,
    },

    /// Column exists but holds an unexpected array type
    #[error("Column '{column}' is not a {expected} array")]
    InvalidDataType {
        /// Name of the column
        column: String,
        /// Human readable name of the expected type
        expected: String,
    },

    /// Pipeline configuration is inconsistent
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Conversion between rows and Arrow batches failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_arrow::Error),

    /// Filter expression cannot be evaluated against the table
    #[error("Filter error: {0}")]
    Filter(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a filter error
    pub fn filter(message: impl Into<String>) -> Self {
        Self::Filter(message.into())
    }

    /// Create a column-not-found error
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;
