//! Caller-owned cache of the prepared table
//!
//! The table is loaded on first use and handed out as an `Arc`. Nothing
//! mutates a prepared table, so clones of the `Arc` can be shared with any
//! number of readers. Dropping the memoised copy is explicit.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::pipeline::load_and_prepare;
use crate::table::PreparedTable;

/// Memoised prepared table for one input file
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    config: PipelineConfig,
    table: Option<Arc<PreparedTable>>,
}

impl DatasetCache {
    /// Create an empty cache; nothing is read until [`get`](Self::get)
    pub fn new(path: impl Into<PathBuf>, config: PipelineConfig) -> Self {
        Self {
            path: path.into(),
            config,
            table: None,
        }
    }

    /// Input file backing this cache
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Configuration used for every load
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Whether a prepared table is currently held
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.table.is_some()
    }

    /// The prepared table, loading it if nothing is held
    ///
    /// A failed load leaves the cache empty.
    pub fn get(&mut self) -> Result<Arc<PreparedTable>> {
        if let Some(table) = &self.table {
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(load_and_prepare(&self.path, &self.config)?);
        self.table = Some(Arc::clone(&table));
        Ok(table)
    }

    /// Drop the memoised table; readers holding an `Arc` keep their copy
    pub fn invalidate(&mut self) {
        if self.table.take().is_some() {
            log::debug!("Invalidated cached table for {}", self.path.display());
        }
    }

    /// Invalidate and load again
    pub fn reload(&mut self) -> Result<Arc<PreparedTable>> {
        self.invalidate();
        self.get()
    }
}
