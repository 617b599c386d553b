//! Expression-based filtering
//!
//! This module provides an expression-based filtering system that
//! builds boolean row masks from column values.

use std::cmp::Ordering;
use std::collections::HashSet;

use arrow::array::{Array, BooleanArray, StringArray};
use arrow::compute::{and, not, or};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::error::{Error, Result};
use crate::utils::arrow::{column_as_f64, downcast_array, get_column_by_name};

/// Represents a filter expression over table columns
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column equals a literal value
    Eq(String, LiteralValue),

    /// Column not equals a literal value
    NotEq(String, LiteralValue),

    /// Column is greater than a literal value
    Gt(String, LiteralValue),

    /// Column is greater than or equal to a literal value
    GtEq(String, LiteralValue),

    /// Column is less than a literal value
    Lt(String, LiteralValue),

    /// Column is less than or equal to a literal value
    LtEq(String, LiteralValue),

    /// Column is in a set of values
    In(String, Vec<LiteralValue>),

    /// Column is not in a set of values
    NotIn(String, Vec<LiteralValue>),

    /// Logical AND of expressions
    And(Vec<Expr>),

    /// Logical OR of expressions
    Or(Vec<Expr>),

    /// Logical NOT of an expression
    Not(Box<Expr>),

    /// Always evaluates to true
    AlwaysTrue,
}

/// Represents a literal value that can be used in filter expressions
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// Numeric value, compared against any numeric column
    Float(f64),

    /// String value, compared against string columns
    String(String),
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl Expr {
    /// `column IN values`
    pub fn is_in<V: Into<LiteralValue>>(column: &str, values: impl IntoIterator<Item = V>) -> Self {
        Self::In(column.to_string(), values.into_iter().map(Into::into).collect())
    }

    /// `column NOT IN values`
    pub fn not_in<V: Into<LiteralValue>>(
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::NotIn(column.to_string(), values.into_iter().map(Into::into).collect())
    }

    /// `column > value`
    pub fn gt(column: &str, value: impl Into<LiteralValue>) -> Self {
        Self::Gt(column.to_string(), value.into())
    }

    /// `column = value`
    pub fn equals(column: &str, value: impl Into<LiteralValue>) -> Self {
        Self::Eq(column.to_string(), value.into())
    }
}

/// Evaluate an expression against a record batch
///
/// # Returns
/// A null-free boolean array indicating which rows match. Null cells and NaN
/// never satisfy a comparison or set test, so the negated forms keep them.
///
/// # Errors
/// Returns an error if a column is missing or a literal's type does not
/// match the column's type
pub fn evaluate_expr(batch: &RecordBatch, expr: &Expr) -> Result<BooleanArray> {
    match expr {
        Expr::AlwaysTrue => Ok(BooleanArray::from(vec![true; batch.num_rows()])),

        Expr::And(exprs) => {
            let mut result = BooleanArray::from(vec![true; batch.num_rows()]);
            for expr in exprs {
                result = and(&result, &evaluate_expr(batch, expr)?)?;
            }
            Ok(result)
        }

        Expr::Or(exprs) => {
            let mut result = BooleanArray::from(vec![false; batch.num_rows()]);
            for expr in exprs {
                result = or(&result, &evaluate_expr(batch, expr)?)?;
            }
            Ok(result)
        }

        Expr::Not(expr) => Ok(not(&evaluate_expr(batch, expr)?)?),

        Expr::Eq(col, value) => compare(batch, col, value, Ordering::is_eq),
        Expr::NotEq(col, value) => Ok(not(&compare(batch, col, value, Ordering::is_eq)?)?),
        Expr::Gt(col, value) => compare(batch, col, value, Ordering::is_gt),
        Expr::GtEq(col, value) => compare(batch, col, value, Ordering::is_ge),
        Expr::Lt(col, value) => compare(batch, col, value, Ordering::is_lt),
        Expr::LtEq(col, value) => compare(batch, col, value, Ordering::is_le),

        Expr::In(col, values) => membership(batch, col, values),
        Expr::NotIn(col, values) => Ok(not(&membership(batch, col, values)?)?),
    }
}

/// Compare every cell of `col` with `value`, keeping rows where `keep` holds
fn compare(
    batch: &RecordBatch,
    col: &str,
    value: &LiteralValue,
    keep: fn(Ordering) -> bool,
) -> Result<BooleanArray> {
    let column = get_column_by_name(batch, col)?;

    let mask: Vec<bool> = match (column.data_type(), value) {
        (DataType::Utf8, LiteralValue::String(literal)) => {
            let strings = downcast_array::<StringArray>(&column, col, "String")?;
            strings
                .iter()
                .map(|cell| cell.is_some_and(|s| keep(s.cmp(literal.as_str()))))
                .collect()
        }
        (data_type, LiteralValue::Float(literal)) if data_type.is_numeric() => {
            column_as_f64(batch, col)?
                .into_iter()
                .map(|cell| cell.partial_cmp(literal).is_some_and(keep))
                .collect()
        }
        (data_type, literal) => {
            return Err(Error::filter(format!(
                "Cannot compare column '{col}' of type {data_type} with {literal:?}"
            )));
        }
    };

    Ok(BooleanArray::from(mask))
}

/// Rows whose `col` value equals any of `values`
fn membership(batch: &RecordBatch, col: &str, values: &[LiteralValue]) -> Result<BooleanArray> {
    let column = get_column_by_name(batch, col)?;

    let mask: Vec<bool> = if column.data_type() == &DataType::Utf8 {
        let wanted = values
            .iter()
            .map(|value| match value {
                LiteralValue::String(s) => Ok(s.as_str()),
                LiteralValue::Float(_) => Err(Error::filter(format!(
                    "Column '{col}' is a string column; set contains {value:?}"
                ))),
            })
            .collect::<Result<HashSet<&str>>>()?;
        let strings = downcast_array::<StringArray>(&column, col, "String")?;
        strings
            .iter()
            .map(|cell| cell.is_some_and(|s| wanted.contains(s)))
            .collect()
    } else if column.data_type().is_numeric() {
        let wanted = values
            .iter()
            .map(|value| match value {
                LiteralValue::Float(v) => Ok(*v),
                LiteralValue::String(_) => Err(Error::filter(format!(
                    "Column '{col}' is numeric; set contains {value:?}"
                ))),
            })
            .collect::<Result<Vec<f64>>>()?;
        column_as_f64(batch, col)?
            .into_iter()
            .map(|cell| wanted.iter().any(|w| *w == cell))
            .collect()
    } else {
        return Err(Error::filter(format!(
            "Unsupported column type {} for '{col}'",
            column.data_type()
        )));
    };

    Ok(BooleanArray::from(mask))
}
