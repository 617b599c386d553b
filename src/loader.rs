//! CSV loading of raw event records

use std::io;
use std::path::Path;
use std::time::Instant;

use chrono::Datelike;
use serde::Deserialize;

use crate::config::PipelineConfig;
use crate::error::DataLoadError;
use crate::error::util::safe_open_file;
use crate::models::RawEvent;
use crate::models::columns;
use crate::utils::logging::{
    create_load_progress_bar, log_operation_complete, log_operation_start,
};

type LoadResult<T> = std::result::Result<T, DataLoadError>;

/// Row shape as it appears in the file; dates stay textual until the
/// configured formats are applied
#[derive(Debug, Deserialize)]
struct CsvRow {
    event_id: String,
    date: String,
    #[serde(default)]
    year: Option<i32>,
    country: String,
    event_type: String,
    latitude: f64,
    longitude: f64,
    affected_population: u64,
    deaths: u64,
    injuries: u64,
    duration_days: f64,
    infrastructure_damage_score: f64,
    economic_impact_million_usd: f64,
    international_aid_million_usd: f64,
    response_time_hours: f64,
}

/// Read every event from a CSV file
///
/// # Errors
/// Fails with a [`DataLoadError`] if the file is missing or unreadable, if a
/// required column is absent, or if any row holds an unparsable date or a
/// non-numeric magnitude.
pub fn read_events(path: &Path, config: &PipelineConfig) -> LoadResult<Vec<RawEvent>> {
    log_operation_start("Reading events from", path);
    let start = Instant::now();

    let file = safe_open_file(path)?;
    let total_bytes = file.metadata().map(|m| m.len()).unwrap_or_default();
    let pb = create_load_progress_bar(total_bytes, &path.display().to_string());
    let events = read_events_from_reader(pb.wrap_read(file), &path.display().to_string(), config);
    pb.finish_and_clear();
    let events = events?;

    log_operation_complete("read", path, events.len(), Some(start.elapsed()));
    Ok(events)
}

/// Read every event from any CSV source
///
/// `source_name` only appears in error messages.
pub fn read_events_from_reader<R: io::Read>(
    reader: R,
    source_name: &str,
    config: &PipelineConfig,
) -> LoadResult<Vec<RawEvent>> {
    let csv_error = |source: csv::Error| DataLoadError::Csv {
        source_name: source_name.to_string(),
        source,
    };

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(csv_error)?.clone();
    check_required_columns(&headers)?;

    let mut events = Vec::new();
    for (idx, record) in csv_reader.records().enumerate() {
        let row = idx + 1;
        let record = record.map_err(csv_error)?;
        let parsed: CsvRow = record
            .deserialize(Some(&headers))
            .map_err(|e| describe_row_error(e, row, &headers, &record, source_name))?;
        events.push(into_event(parsed, row, config)?);
    }

    log::debug!("Parsed {} rows from {source_name}", events.len());
    Ok(events)
}

fn check_required_columns(headers: &csv::StringRecord) -> LoadResult<()> {
    for column in columns::REQUIRED {
        if !headers.iter().any(|header| header == column) {
            return Err(DataLoadError::MissingColumn {
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Map a deserialization failure to the offending column where csv reports one
fn describe_row_error(
    error: csv::Error,
    row: usize,
    headers: &csv::StringRecord,
    record: &csv::StringRecord,
    source_name: &str,
) -> DataLoadError {
    if let csv::ErrorKind::Deserialize { err, .. } = error.kind() {
        if let Some(field) = err.field().and_then(|f| usize::try_from(f).ok()) {
            return DataLoadError::InvalidValue {
                row,
                column: headers.get(field).unwrap_or("<unknown>").to_string(),
                value: record.get(field).unwrap_or_default().to_string(),
            };
        }
    }
    DataLoadError::Csv {
        source_name: source_name.to_string(),
        source: error,
    }
}

fn into_event(row: CsvRow, row_number: usize, config: &PipelineConfig) -> LoadResult<RawEvent> {
    let date = config
        .date_formats
        .parse(&row.date)
        .ok_or_else(|| DataLoadError::InvalidDate {
            row: row_number,
            value: row.date.clone(),
        })?;

    Ok(RawEvent {
        event_id: row.event_id,
        year: row.year.unwrap_or_else(|| date.year()),
        date,
        country: row.country,
        event_type: row.event_type,
        latitude: row.latitude,
        longitude: row.longitude,
        affected_population: row.affected_population,
        deaths: row.deaths,
        injuries: row.injuries,
        duration_days: row.duration_days,
        infrastructure_damage_score: row.infrastructure_damage_score,
        economic_impact_million_usd: row.economic_impact_million_usd,
        international_aid_million_usd: row.international_aid_million_usd,
        response_time_hours: row.response_time_hours,
    })
}
