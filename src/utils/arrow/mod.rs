//! Arrow utilities
//!
//! Column lookup and typed access for the prepared table.

pub mod array_utils;

pub use array_utils::{column_as_f64, downcast_array, get_column_by_name, get_column_index};
