//! Grouped aggregation over a prepared table
//!
//! Grouping reads one string column and reduces one numeric column per
//! group. Columns with a registered category set are emitted in category
//! order and always include every category, so a filtered table with an
//! empty bin still reports that bin (with `count = 0` and no value).
//! Rows whose key is null are left out.

pub mod stats;
pub mod summary;

use arrow::datatypes::FieldRef;
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_arrow::schema::{SchemaLike, TracingOptions};

use crate::error::Result;
use crate::table::PreparedTable;

pub use stats::{BoxStats, FiveNumberSummary, box_stats, quantile};
pub use summary::{DatasetSummary, GeoPoint, ValueCount, geo_points, summarize, value_counts};

/// Reduction applied to each group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reduction {
    /// Number of rows in the group, NaN values included
    Count,
    /// Sum of non-NaN values; `0.0` for an empty group
    Sum,
    /// Mean of non-NaN values
    Mean,
    /// Median of non-NaN values
    Median,
    /// Smallest non-NaN value
    Min,
    /// Largest non-NaN value
    Max,
}

impl Reduction {
    /// Reduce one group's values
    ///
    /// `None` when the reduction has no defined value for the group (an empty
    /// group, or one holding only NaN).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn apply(self, values: &[f64]) -> Option<f64> {
        let finite = || values.iter().copied().filter(|v| !v.is_nan());
        match self {
            Self::Count => Some(values.len() as f64),
            Self::Sum => Some(finite().sum()),
            Self::Mean => {
                let (sum, n) = finite().fold((0.0, 0_usize), |(sum, n), v| (sum + v, n + 1));
                (n > 0).then(|| sum / n as f64)
            }
            Self::Median => {
                let mut sorted: Vec<f64> = finite().collect();
                sorted.sort_by(f64::total_cmp);
                quantile(&sorted, 0.5)
            }
            Self::Min => finite().reduce(f64::min),
            Self::Max => finite().reduce(f64::max),
        }
    }
}

/// One group of an aggregate result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    /// Group key
    pub category: String,
    /// Rows in the group
    pub count: u64,
    /// Reduced value, `None` for an empty group
    pub value: Option<f64>,
}

/// Result of grouping a table by one column
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateTable {
    pub group_column: String,
    pub value_column: String,
    pub reduction: Reduction,
    pub rows: Vec<AggregateRow>,
}

impl AggregateTable {
    /// Row for `category`, if the grouping produced one
    #[must_use]
    pub fn get(&self, category: &str) -> Option<&AggregateRow> {
        self.rows.iter().find(|row| row.category == category)
    }

    /// Reduced value for `category`
    #[must_use]
    pub fn value(&self, category: &str) -> Option<f64> {
        self.get(category).and_then(|row| row.value)
    }

    /// Convert to an Arrow batch with columns `category`, `count`, `value`
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let fields = Vec::<FieldRef>::from_type::<AggregateRow>(
            TracingOptions::default().allow_null_fields(true),
        )?;
        Ok(serde_arrow::to_record_batch(&fields, &self.rows)?)
    }
}

/// Row indices of each group, in output order
pub(crate) fn group_indices(
    table: &PreparedTable,
    by: &str,
) -> Result<Vec<(String, Vec<usize>)>> {
    let keys = table.string_column(by)?;

    let mut groups: Vec<(String, Vec<usize>)> = table
        .categories(by)
        .map(|labels| {
            labels
                .iter()
                .map(|label| (label.clone(), Vec::new()))
                .collect()
        })
        .unwrap_or_default();
    let mut position: FxHashMap<String, usize> = groups
        .iter()
        .enumerate()
        .map(|(idx, (label, _))| (label.clone(), idx))
        .collect();

    for (row, key) in keys.iter().enumerate() {
        let Some(key) = key else {
            continue;
        };
        let idx = match position.get(key) {
            Some(idx) => *idx,
            None => {
                groups.push((key.to_string(), Vec::new()));
                position.insert(key.to_string(), groups.len() - 1);
                groups.len() - 1
            }
        };
        groups[idx].1.push(row);
    }

    Ok(groups)
}

/// Group `table` by `by` and reduce `value` in each group
///
/// # Errors
/// Returns an error if `by` is not a string column or `value` is not numeric
pub fn aggregate(
    table: &PreparedTable,
    by: &str,
    value: &str,
    reduction: Reduction,
) -> Result<AggregateTable> {
    let values = table.numeric_values(value)?;
    let rows = group_indices(table, by)?
        .into_iter()
        .map(|(category, indices)| {
            let group: Vec<f64> = indices.iter().map(|&i| values[i]).collect();
            AggregateRow {
                category,
                count: indices.len() as u64,
                value: reduction.apply(&group),
            }
        })
        .collect();

    Ok(AggregateTable {
        group_column: by.to_string(),
        value_column: value.to_string(),
        reduction,
        rows,
    })
}

/// Number of rows per group of `by`
pub fn count_by(table: &PreparedTable, by: &str) -> Result<AggregateTable> {
    #[allow(clippy::cast_precision_loss)]
    let rows = group_indices(table, by)?
        .into_iter()
        .map(|(category, indices)| AggregateRow {
            category,
            count: indices.len() as u64,
            value: Some(indices.len() as f64),
        })
        .collect();

    Ok(AggregateTable {
        group_column: by.to_string(),
        value_column: by.to_string(),
        reduction: Reduction::Count,
        rows,
    })
}
