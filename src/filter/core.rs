//! Core filtering functionality
//!
//! Applies a boolean mask to every column of a record batch.

use arrow::array::{ArrayRef, BooleanArray};
use arrow::compute::filter as arrow_filter;
use arrow::record_batch::RecordBatch;

use crate::error::{Error, Result};

/// Filter a record batch based on a boolean mask
///
/// # Arguments
/// * `batch` - The record batch to filter
/// * `mask` - The boolean mask indicating which rows to keep; null counts as false
///
/// # Returns
/// A new record batch with only rows where mask is true
pub fn filter_record_batch(batch: &RecordBatch, mask: &BooleanArray) -> Result<RecordBatch> {
    if batch.num_rows() != mask.len() {
        return Err(Error::filter(format!(
            "Mask length ({}) doesn't match batch row count ({})",
            mask.len(),
            batch.num_rows()
        )));
    }

    let filtered_columns: Vec<ArrayRef> = batch
        .columns()
        .iter()
        .map(|col| arrow_filter(col, mask))
        .collect::<std::result::Result<_, _>>()?;

    Ok(RecordBatch::try_new(batch.schema(), filtered_columns)?)
}
