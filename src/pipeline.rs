//! The dataset preparation pipeline
//!
//! `prepare` turns raw events into a [`PreparedTable`] in three steps after
//! loading: rate derivation, country classification and binning. Each step
//! reads only raw fields and writes its own column, so running the pipeline
//! twice on the same input gives bit-identical derived columns.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;

use crate::config::PipelineConfig;
use crate::derive::{CountryClassifier, RateDerivation, Rates, derive_rates};
use crate::error::Result;
use crate::loader::read_events;
use crate::models::columns;
use crate::models::{DevelopmentStatus, PreparedEvent, RawEvent};
use crate::table::PreparedTable;
use crate::utils::logging::{log_step, log_warning};

/// Counters describing one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreparationReport {
    /// Raw records received
    pub input_rows: usize,
    /// Rows in the prepared table
    pub output_rows: usize,
    /// Records with `affected_population == 0`
    pub division_anomalies: usize,
    /// Records dropped by [`RatePolicy::RejectRecord`](crate::RatePolicy::RejectRecord)
    pub rejected_records: usize,
    /// Kept records whose response time fell in no bin
    pub unbinned_response: usize,
    /// Kept records whose affected population fell in no bin
    pub unbinned_scale: usize,
}

/// Prepare raw events into the augmented table
///
/// # Errors
/// Returns `Error::Config` for an invalid configuration; the derivation
/// steps themselves do not fail.
pub fn prepare(raw: &[RawEvent], config: &PipelineConfig) -> Result<PreparedTable> {
    prepare_with_report(raw, config).map(|(table, _)| table)
}

/// Load a CSV file and prepare it
pub fn load_and_prepare(path: &Path, config: &PipelineConfig) -> Result<PreparedTable> {
    config.validate()?;
    let raw = read_events(path, config)?;
    run(&raw, config).map(|(table, _)| table)
}

/// Like [`prepare`], also returning the run's counters
pub fn prepare_with_report(
    raw: &[RawEvent],
    config: &PipelineConfig,
) -> Result<(PreparedTable, PreparationReport)> {
    config.validate()?;
    run(raw, config)
}

/// Derivation steps over an already validated configuration
fn run(raw: &[RawEvent], config: &PipelineConfig) -> Result<(PreparedTable, PreparationReport)> {
    let start = Instant::now();
    let mut report = PreparationReport {
        input_rows: raw.len(),
        ..PreparationReport::default()
    };

    // Rates
    let derived: Vec<(&RawEvent, RateDerivation)> = raw
        .par_iter()
        .map(|event| {
            let derivation = derive_rates(
                event.deaths,
                event.injuries,
                event.affected_population,
                config.rate_policy,
            );
            (event, derivation)
        })
        .collect();

    let mut kept: Vec<(&RawEvent, Rates)> = Vec::with_capacity(derived.len());
    for (event, derivation) in derived {
        if derivation.is_anomaly() {
            report.division_anomalies += 1;
        }
        match derivation.rates() {
            Some(rates) => kept.push((event, rates)),
            None => {
                report.rejected_records += 1;
                log_warning(
                    &format!(
                        "Rejected event '{}' with zero affected population",
                        event.event_id
                    ),
                    None,
                );
            }
        }
    }
    if report.division_anomalies > 0 {
        log::warn!(
            "{} events have zero affected population ({:?})",
            report.division_anomalies,
            config.rate_policy
        );
    }
    log_step("Derived rates", kept.len());

    // Classification and binning
    let classifier = CountryClassifier::new(config.developed_countries.iter().cloned());
    let response_bins = config
        .response_bins
        .resolve(kept.iter().map(|(e, _)| e.response_time_hours));
    #[allow(clippy::cast_precision_loss)]
    let scale_bins = config
        .scale_bins
        .resolve(kept.iter().map(|(e, _)| e.affected_population as f64));

    #[allow(clippy::cast_precision_loss)]
    let events: Vec<PreparedEvent> = kept
        .par_iter()
        .map(|(event, rates)| PreparedEvent {
            event: (*event).clone(),
            death_rate: rates.death_rate,
            injury_rate: rates.injury_rate,
            status: classifier.classify(&event.country),
            response_bin: response_bins
                .label_of(event.response_time_hours)
                .map(str::to_string),
            scale: scale_bins
                .label_of(event.affected_population as f64)
                .map(str::to_string),
        })
        .collect();

    for prepared in &events {
        if prepared.response_bin.is_none() {
            report.unbinned_response += 1;
            log::warn!(
                "Event '{}' response time {} is outside the response bins",
                prepared.event.event_id,
                prepared.event.response_time_hours
            );
        }
        if prepared.scale.is_none() {
            report.unbinned_scale += 1;
        }
    }
    log_step("Classified and binned", events.len());

    let table = PreparedTable::from_events(&events, category_sets(config))?;
    report.output_rows = table.num_rows();

    log::info!(
        "Prepared {} of {} events in {:?}",
        report.output_rows,
        report.input_rows,
        start.elapsed()
    );
    Ok((table, report))
}

/// Full label sets of the derived categorical columns
fn category_sets(config: &PipelineConfig) -> BTreeMap<String, Vec<String>> {
    BTreeMap::from([
        (
            columns::STATUS.to_string(),
            DevelopmentStatus::ALL
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
        ),
        (
            columns::RESPONSE_BIN.to_string(),
            config.response_bins.labels().to_vec(),
        ),
        (
            columns::SCALE.to_string(),
            config.scale_bins.labels().to_vec(),
        ),
    ])
}
