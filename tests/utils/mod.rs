use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use disaster_prep::models::columns;
use disaster_prep::{PipelineConfig, PreparedTable, RawEvent, prepare};

/// Build a raw event with the fields the pipeline derives from
#[must_use]
pub fn event(
    id: &str,
    country: &str,
    affected_population: u64,
    deaths: u64,
    injuries: u64,
    response_time_hours: f64,
) -> RawEvent {
    RawEvent {
        event_id: id.to_string(),
        date: NaiveDate::from_ymd_opt(2022, 6, 1).expect("valid date"),
        year: 2022,
        country: country.to_string(),
        event_type: "Flood".to_string(),
        latitude: 10.0,
        longitude: 20.0,
        affected_population,
        deaths,
        injuries,
        duration_days: 2.0,
        infrastructure_damage_score: 3.5,
        economic_impact_million_usd: 100.0,
        international_aid_million_usd: 10.0,
        response_time_hours,
    }
}

/// A small mixed table covering every response bin and scale
#[must_use]
pub fn sample_events() -> Vec<RawEvent> {
    vec![
        event("E1", "Japan", 10_000, 50, 100, 5.0),
        event("E2", "China", 6_000_000, 600, 1_200, 10.0),
        event("E3", "India", 7_500_000, 300, 900, 30.0),
        event("E4", "Chile", 50_000, 20, 40, 80.0),
        event("E5", "Germany", 400_000, 4, 10, 24.0),
        event("E6", "Kenya", 2_000_000, 100, 250, 6.0),
    ]
}

/// Prepare events with the default configuration
#[must_use]
pub fn prepared(events: &[RawEvent]) -> PreparedTable {
    prepare(events, &PipelineConfig::default()).expect("preparation succeeds")
}

/// Write events as a CSV file in `dir`
pub fn write_csv(dir: &Path, name: &str, events: &[RawEvent]) -> PathBuf {
    let path = dir.join(name);
    let mut writer = csv::Writer::from_path(&path).expect("create csv");
    writer
        .write_record(columns::REQUIRED)
        .expect("write header");
    for e in events {
        writer
            .write_record([
                e.event_id.clone(),
                e.date.format("%Y-%m-%d").to_string(),
                e.country.clone(),
                e.event_type.clone(),
                e.latitude.to_string(),
                e.longitude.to_string(),
                e.affected_population.to_string(),
                e.deaths.to_string(),
                e.injuries.to_string(),
                e.duration_days.to_string(),
                e.infrastructure_damage_score.to_string(),
                e.economic_impact_million_usd.to_string(),
                e.international_aid_million_usd.to_string(),
                e.response_time_hours.to_string(),
            ])
            .expect("write row");
    }
    writer.flush().expect("flush csv");
    path
}

/// Assert two floats agree to within `1e-9`
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
