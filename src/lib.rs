//! A Rust library for preparing disaster event tables: loading a CSV of
//! events, deriving rates, classifying countries, binning response times
//! and affected populations, and aggregating the result for presentation.

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod derive;
pub mod error;
pub mod filter;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod table;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{DateFormatConfig, PipelineConfig, RatePolicy};
pub use error::{DataLoadError, Error, Result};
pub use models::{DevelopmentStatus, PreparedEvent, RawEvent};
pub use table::PreparedTable;

// Pipeline
pub use cache::DatasetCache;
pub use derive::{BinScheme, CountryClassifier, TerminalEdge};
pub use loader::{read_events, read_events_from_reader};
pub use pipeline::{PreparationReport, load_and_prepare, prepare, prepare_with_report};

// Presentation queries
pub use aggregate::{AggregateRow, AggregateTable, Reduction, aggregate, box_stats, count_by};
pub use filter::{Expr, LiteralValue};

// Arrow types
pub use arrow::record_batch::RecordBatch;
