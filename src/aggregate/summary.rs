//! Headline metrics, frequency tables and map points.

use itertools::Itertools;
use serde::Serialize;

use crate::aggregate::{Reduction, group_indices};
use crate::error::Result;
use crate::models::columns;
use crate::table::PreparedTable;

/// Headline numbers for a table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub event_count: usize,
    pub total_affected_population: u64,
    pub total_economic_impact_million_usd: f64,
    pub total_international_aid_million_usd: f64,
    /// Mean of the non-NaN death rates
    pub mean_death_rate_percent: Option<f64>,
}

/// Compute the headline numbers
pub fn summarize(table: &PreparedTable) -> Result<DatasetSummary> {
    let total_affected_population = table
        .count_column(columns::AFFECTED_POPULATION)?
        .iter()
        .flatten()
        .fold(0_u64, u64::saturating_add);

    Ok(DatasetSummary {
        event_count: table.num_rows(),
        total_affected_population,
        total_economic_impact_million_usd: Reduction::Sum
            .apply(&table.numeric_values(columns::ECONOMIC_IMPACT)?)
            .unwrap_or_default(),
        total_international_aid_million_usd: Reduction::Sum
            .apply(&table.numeric_values(columns::INTERNATIONAL_AID)?)
            .unwrap_or_default(),
        mean_death_rate_percent: Reduction::Mean
            .apply(&table.numeric_values(columns::DEATH_RATE)?),
    })
}

/// One entry of a frequency table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: u64,
}

/// Frequency of each distinct value of a string column
///
/// Sorted by count descending, ties broken by value ascending. Only values
/// that occur are listed, even for categorical columns. `top` keeps the
/// first `n` entries.
pub fn value_counts(
    table: &PreparedTable,
    column: &str,
    top: Option<usize>,
) -> Result<Vec<ValueCount>> {
    let counts = group_indices(table, column)?
        .into_iter()
        .filter(|(_, indices)| !indices.is_empty())
        .map(|(value, indices)| ValueCount {
            value,
            count: indices.len() as u64,
        })
        .sorted_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)))
        .take(top.unwrap_or(usize::MAX))
        .collect();
    Ok(counts)
}

/// A point on the scatter map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Marker size, the affected population
    pub size: f64,
    pub event_type: String,
    pub country: String,
}

/// Map points for every row
pub fn geo_points(table: &PreparedTable) -> Result<Vec<GeoPoint>> {
    let latitude = table.numeric_values(columns::LATITUDE)?;
    let longitude = table.numeric_values(columns::LONGITUDE)?;
    let size = table.numeric_values(columns::AFFECTED_POPULATION)?;
    let event_type = table.string_column(columns::EVENT_TYPE)?;
    let country = table.string_column(columns::COUNTRY)?;

    Ok(itertools::izip!(latitude, longitude, size, event_type, country)
        .map(|(latitude, longitude, size, event_type, country)| GeoPoint {
            latitude,
            longitude,
            size,
            event_type: event_type.unwrap_or_default().to_string(),
            country: country.unwrap_or_default().to_string(),
        })
        .collect())
}
