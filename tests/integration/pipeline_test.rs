use arrow::array::{Array, Float64Array, StringArray};
use disaster_prep::models::columns;
use disaster_prep::{
    BinScheme, DateFormatConfig, DevelopmentStatus, Error, PipelineConfig, RatePolicy,
    TerminalEdge, load_and_prepare, prepare, prepare_with_report,
};

use crate::utils::{assert_close, event, prepared, sample_events, write_csv};

/// The worked example: rates, status and response bin of a Japanese flood
#[test]
fn test_concrete_scenario_japan() {
    let table = prepared(&[event("E1", "Japan", 10_000, 50, 100, 5.0)]);
    let record = &table.records().unwrap()[0];

    assert_close(record.death_rate, 0.5);
    assert_close(record.injury_rate, 1.0);
    assert_eq!(record.status, DevelopmentStatus::Developed);
    assert_eq!(record.response_bin.as_deref(), Some("<6h"));
    assert_eq!(record.scale.as_deref(), Some("<100k"));
}

/// Six million affected is a mega-event
#[test]
fn test_concrete_scenario_mega_event() {
    let table = prepared(&[event("E2", "China", 6_000_000, 0, 0, 10.0)]);
    let record = &table.records().unwrap()[0];

    assert_eq!(record.scale.as_deref(), Some(">5M (Mega-event)"));
    assert_eq!(record.status, DevelopmentStatus::Developing);
    assert_eq!(record.response_bin.as_deref(), Some("6-24h"));
}

/// Exactly 24 hours belongs to the higher bin
#[test]
fn test_boundary_goes_right() {
    let table = prepared(&[
        event("a", "Chile", 100, 0, 0, 24.0),
        event("b", "Chile", 100, 0, 0, 6.0),
        event("c", "Chile", 100, 0, 0, 72.0),
        event("d", "Chile", 100, 0, 0, 0.0),
    ]);
    let bins = table.string_column(columns::RESPONSE_BIN).unwrap();
    let labels: Vec<_> = bins.iter().map(Option::unwrap).collect();
    assert_eq!(labels, vec!["24-72h", "6-24h", ">72h", "<6h"]);
}

/// Derived columns sit next to untouched raw columns
#[test]
fn test_table_layout() {
    let events = sample_events();
    let table = prepared(&events);

    assert_eq!(table.num_rows(), events.len());
    let schema = table.schema();
    for name in columns::REQUIRED
        .iter()
        .chain(&[columns::YEAR, columns::DEATH_RATE, columns::INJURY_RATE])
        .chain(&[columns::STATUS, columns::RESPONSE_BIN, columns::SCALE])
    {
        assert!(schema.index_of(name).is_ok(), "missing column {name}");
    }

    let records = table.records().unwrap();
    for (record, raw) in records.iter().zip(&events) {
        assert_eq!(&record.event, raw);
    }
    assert_eq!(
        table.categories(columns::SCALE).unwrap(),
        ["<100k", "100k-1M", "1M-5M", ">5M (Mega-event)"]
    );
    assert_eq!(
        table.categories(columns::STATUS).unwrap(),
        ["Developed", "Developing"]
    );
}

/// Two runs over the same input give bit-identical derived columns
#[test]
fn test_idempotent_derivation() {
    let mut events = sample_events();
    events.push(event("Z", "Chile", 0, 3, 1, 2.0));
    let config = PipelineConfig::default();

    let first = prepare(&events, &config).unwrap();
    let second = prepare(&events, &config).unwrap();

    for name in [columns::DEATH_RATE, columns::INJURY_RATE] {
        let bits = |t: &disaster_prep::PreparedTable| -> Vec<u64> {
            let column = t.batch().column(t.schema().index_of(name).unwrap()).clone();
            column
                .as_any()
                .downcast_ref::<Float64Array>()
                .unwrap()
                .values()
                .iter()
                .map(|v| v.to_bits())
                .collect()
        };
        assert_eq!(bits(&first), bits(&second));
    }
    for name in [columns::STATUS, columns::RESPONSE_BIN, columns::SCALE] {
        let a: &StringArray = first.string_column(name).unwrap();
        let b: &StringArray = second.string_column(name).unwrap();
        assert_eq!(a, b);
    }
}

/// Zero population under each policy
#[test]
fn test_zero_population_policies() {
    let events = vec![
        event("ok", "Chile", 1_000, 10, 20, 3.0),
        event("zero", "Chile", 0, 10, 20, 3.0),
    ];

    let nan = prepared(&events);
    let records = nan.records().unwrap();
    assert!(records[1].death_rate.is_nan());
    assert!(records[1].injury_rate.is_nan());
    assert_eq!(records[1].scale.as_deref(), Some("<100k"));

    let clamp = prepare(
        &events,
        &PipelineConfig::default().with_rate_policy(RatePolicy::ClampToZero),
    )
    .unwrap();
    assert_close(clamp.records().unwrap()[1].death_rate, 0.0);

    let (reject, report) = prepare_with_report(
        &events,
        &PipelineConfig::default().with_rate_policy(RatePolicy::RejectRecord),
    )
    .unwrap();
    assert_eq!(reject.num_rows(), 1);
    assert_eq!(report.rejected_records, 1);
    assert_eq!(reject.records().unwrap()[0].event.event_id, "ok");
}

/// Classification and bin edges come from configuration
#[test]
fn test_substituted_configuration() {
    let scale = BinScheme::new(
        vec![0.0, 1_000.0],
        vec!["small", "large"],
        TerminalEdge::Unbounded,
    )
    .unwrap();
    let config = PipelineConfig::default()
        .with_developed_countries(["Chile"])
        .with_response_bins(BinScheme::response_coarse())
        .with_scale_bins(scale);

    let table = prepare(
        &[
            event("a", "Chile", 500, 0, 0, 13.0),
            event("b", "Japan", 5_000, 0, 0, 25.0),
        ],
        &config,
    )
    .unwrap();
    let records = table.records().unwrap();

    assert_eq!(records[0].status, DevelopmentStatus::Developed);
    assert_eq!(records[1].status, DevelopmentStatus::Developing);
    assert_eq!(records[0].response_bin.as_deref(), Some("12-24h"));
    assert_eq!(records[1].response_bin.as_deref(), Some(">24h"));
    assert_eq!(records[0].scale.as_deref(), Some("small"));
    assert_eq!(records[1].scale.as_deref(), Some("large"));
    assert_eq!(
        table.categories(columns::RESPONSE_BIN).unwrap(),
        ["<12h", "12-24h", ">24h"]
    );
}

/// File in, prepared table out
#[test]
fn test_load_and_prepare() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path(), "events.csv", &sample_events());

    let table = load_and_prepare(&path, &PipelineConfig::default()).unwrap();
    assert_eq!(table.num_rows(), 6);
    let scale = table.string_column(columns::SCALE).unwrap();
    assert_eq!(scale.null_count(), 0);
}

/// An empty input prepares to an empty table that still knows its categories
#[test]
fn test_empty_input() {
    let table = prepared(&[]);
    assert!(table.is_empty());
    assert_eq!(table.categories(columns::RESPONSE_BIN).unwrap().len(), 4);
}

/// A response scheme closed at the data maximum still bins the slowest rows
#[test]
fn test_response_bins_closed_at_data_max() {
    let response = BinScheme::new(
        vec![0.0, 12.0],
        vec!["fast", "slow"],
        TerminalEdge::DataMaxPlusOne,
    )
    .unwrap();
    let config = PipelineConfig::default().with_response_bins(response);

    let (table, report) = prepare_with_report(
        &[
            event("a", "Chile", 100, 0, 0, 5.0),
            event("b", "Chile", 100, 0, 0, 12.0),
            event("c", "Chile", 100, 0, 0, 30.0),
        ],
        &config,
    )
    .unwrap();

    assert_eq!(report.unbinned_response, 0);
    let bins = table.string_column(columns::RESPONSE_BIN).unwrap();
    let labels: Vec<_> = bins.iter().map(Option::unwrap).collect();
    assert_eq!(labels, vec!["fast", "slow", "slow"]);
}

/// An invalid configuration is rejected before the input is opened
#[test]
fn test_invalid_config_fails_before_load() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig::default().with_date_formats(DateFormatConfig {
        date_formats: Vec::new(),
    });

    let err = load_and_prepare(&dir.path().join("absent.csv"), &config).unwrap_err();
    assert!(matches!(err, Error::Config(_)), "unexpected error: {err}");
}
