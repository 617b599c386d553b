//! Box-plot statistics per group.

use serde::Serialize;

use crate::aggregate::group_indices;
use crate::error::Result;
use crate::table::PreparedTable;

/// Min, quartiles and max of a group
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl FiveNumberSummary {
    /// Summarise sorted, NaN-free values; `None` when empty
    #[must_use]
    pub fn from_sorted(sorted: &[f64]) -> Option<Self> {
        Some(Self {
            min: *sorted.first()?,
            q1: quantile(sorted, 0.25)?,
            median: quantile(sorted, 0.5)?,
            q3: quantile(sorted, 0.75)?,
            max: *sorted.last()?,
        })
    }

    /// Distance between the first and third quartile
    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Box-plot statistics for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub category: String,
    /// Rows in the group, NaN values included
    pub count: u64,
    /// `None` when the group has no non-NaN value
    pub summary: Option<FiveNumberSummary>,
}

/// Linearly interpolated quantile of sorted values
///
/// Uses position `q * (n - 1)`, the default of most dataframe libraries.
/// `None` for empty input.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let position = q.clamp(0.0, 1.0) * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Box-plot statistics of `value` for each group of `by`
pub fn box_stats(table: &PreparedTable, by: &str, value: &str) -> Result<Vec<BoxStats>> {
    let values = table.numeric_values(value)?;

    Ok(group_indices(table, by)?
        .into_iter()
        .map(|(category, indices)| {
            let mut group: Vec<f64> = indices
                .iter()
                .map(|&i| values[i])
                .filter(|v| !v.is_nan())
                .collect();
            group.sort_by(f64::total_cmp);
            BoxStats {
                category,
                count: indices.len() as u64,
                summary: FiveNumberSummary::from_sorted(&group),
            }
        })
        .collect())
}
