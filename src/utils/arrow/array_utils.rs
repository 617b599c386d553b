//! Utilities for working with Arrow arrays.
//!
//! Typed column lookup with errors that name the column involved.

use arrow::array::{Array, ArrayRef, Float64Array};
use arrow::compute::kernels::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::error::{Error, Result};

/// Get the column index by name from a record batch
///
/// # Errors
/// Returns `Error::ColumnNotFound` if the column does not exist
pub fn get_column_index(batch: &RecordBatch, column_name: &str) -> Result<usize> {
    batch
        .schema()
        .index_of(column_name)
        .map_err(|_| Error::column_not_found(column_name))
}

/// Get a column from a record batch by name
pub fn get_column_by_name(batch: &RecordBatch, column_name: &str) -> Result<ArrayRef> {
    let idx = get_column_index(batch, column_name)?;
    Ok(batch.column(idx).clone())
}

/// Downcast a column to a specific array type with clear error messages
///
/// # Type Parameters
///
/// * `A` - The target array type to downcast to
///
/// # Arguments
///
/// * `array` - The array reference to downcast
/// * `column_name` - The name of the column (for error messages)
/// * `expected_type_name` - A human-readable name of the expected type (for error messages)
pub fn downcast_array<'a, A: Array + 'static>(
    array: &'a ArrayRef,
    column_name: &str,
    expected_type_name: &str,
) -> Result<&'a A> {
    array
        .as_any()
        .downcast_ref::<A>()
        .ok_or_else(|| Error::InvalidDataType {
            column: column_name.to_string(),
            expected: expected_type_name.to_string(),
        })
}

/// Read a numeric column as `f64` values, nulls becoming NaN
///
/// Integer columns are widened with Arrow's cast kernel.
///
/// # Errors
/// Returns an error if the column is missing or is not numeric
pub fn column_as_f64(batch: &RecordBatch, column_name: &str) -> Result<Vec<f64>> {
    let column = get_column_by_name(batch, column_name)?;
    if !column.data_type().is_numeric() {
        return Err(Error::InvalidDataType {
            column: column_name.to_string(),
            expected: "numeric".to_string(),
        });
    }

    let widened = if column.data_type() == &DataType::Float64 {
        column
    } else {
        cast::cast(&column, &DataType::Float64)?
    };
    let values = downcast_array::<Float64Array>(&widened, column_name, "Float64")?;

    Ok(values.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}
