use arrow::array::Array;
use disaster_prep::aggregate::{geo_points, summarize, value_counts};
use disaster_prep::models::columns;
use disaster_prep::{Expr, Reduction, aggregate, box_stats, count_by};

use crate::utils::{assert_close, event, prepared, sample_events};

/// Every response bin is reported, in bin order
#[test]
fn test_all_categories_in_order() {
    let table = prepared(&sample_events());
    let counts = count_by(&table, columns::RESPONSE_BIN).unwrap();

    let rows: Vec<_> = counts
        .rows
        .iter()
        .map(|r| (r.category.as_str(), r.count))
        .collect();
    assert_eq!(
        rows,
        [("<6h", 1), ("6-24h", 2), ("24-72h", 2), (">72h", 1)]
    );
}

/// An empty bin has a zero count and no value
#[test]
fn test_empty_bin_reported() {
    let table = prepared(&sample_events());
    let developed = table
        .filter(&Expr::equals(columns::STATUS, "Developed"))
        .unwrap();

    let by_bin = aggregate(
        &developed,
        columns::RESPONSE_BIN,
        columns::DEATH_RATE,
        Reduction::Mean,
    )
    .unwrap();
    assert_eq!(by_bin.rows.len(), 4);
    for empty in ["6-24h", ">72h"] {
        let row = by_bin.get(empty).unwrap();
        assert_eq!(row.count, 0);
        assert_eq!(row.value, None);
    }
    assert_close(by_bin.value("<6h").unwrap(), 0.5);
    assert_close(by_bin.value("24-72h").unwrap(), 0.001);

    let sums = aggregate(
        &developed,
        columns::RESPONSE_BIN,
        columns::DEATHS,
        Reduction::Sum,
    )
    .unwrap();
    assert_eq!(sums.value(">72h"), Some(0.0));
}

/// More deaths over the same population never lowers the rate
#[test]
fn test_death_rate_follows_deaths() {
    let events: Vec<_> = (0..5)
        .map(|i| event(&format!("D{i}"), "Chile", 20_000, i * 10, 0, 3.0))
        .collect();
    let table = prepared(&events);
    let rates = table.numeric_values(columns::DEATH_RATE).unwrap();
    assert!(rates.windows(2).all(|w| w[0] < w[1]));
}

/// Deaths rising across response bins at a fixed population keep their
/// order in the per-bin mean rates
#[test]
fn test_bin_means_follow_deaths() {
    let table = prepared(&[
        event("a", "Chile", 1_000, 1, 0, 3.0),
        event("b", "Chile", 1_000, 2, 0, 10.0),
        event("c", "Chile", 1_000, 3, 0, 30.0),
        event("d", "Chile", 1_000, 4, 0, 100.0),
    ]);

    let by_bin = aggregate(&table, columns::RESPONSE_BIN, columns::DEATH_RATE, Reduction::Mean)
        .unwrap();
    let means: Vec<f64> = by_bin.rows.iter().map(|r| r.value.unwrap()).collect();
    assert_eq!(means.len(), 4);
    assert!(means.windows(2).all(|w| w[0] < w[1]), "means {means:?}");
    assert_close(means[0], 0.1);
    assert_close(means[3], 0.4);
}

/// NaN rates are skipped by reductions but still counted
#[test]
fn test_nan_rates_in_groups() {
    let table = prepared(&[
        event("a", "Chile", 0, 5, 0, 3.0),
        event("b", "Chile", 1_000, 5, 0, 3.0),
    ]);
    let mean = aggregate(&table, columns::RESPONSE_BIN, columns::DEATH_RATE, Reduction::Mean)
        .unwrap();
    let row = mean.get("<6h").unwrap();
    assert_eq!(row.count, 2);
    assert_close(row.value.unwrap(), 0.5);

    let count = aggregate(&table, columns::RESPONSE_BIN, columns::DEATH_RATE, Reduction::Count)
        .unwrap();
    assert_eq!(count.value("<6h"), Some(2.0));
}

/// Columns without a category set group in order of first appearance
#[test]
fn test_uncategorised_column_order() {
    let table = prepared(&[
        event("a", "Peru", 100, 0, 0, 1.0),
        event("b", "Chile", 100, 0, 0, 2.0),
        event("c", "Peru", 100, 0, 0, 3.0),
    ]);
    let by_country = aggregate(
        &table,
        columns::COUNTRY,
        columns::RESPONSE_TIME_HOURS,
        Reduction::Median,
    )
    .unwrap();
    let categories: Vec<_> = by_country.rows.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(categories, ["Peru", "Chile"]);
    assert_close(by_country.value("Peru").unwrap(), 2.0);
}

/// Frequency tables sort by count, then by value
#[test]
fn test_value_counts() {
    let mut events = sample_events();
    events.push(event("E7", "Chile", 100, 0, 0, 1.0));
    events.push(event("E8", "Chile", 100, 0, 0, 1.0));
    events.push(event("E9", "Peru", 100, 0, 0, 1.0));
    let table = prepared(&events);

    let counts = value_counts(&table, columns::COUNTRY, Some(3)).unwrap();
    let pairs: Vec<_> = counts.iter().map(|c| (c.value.as_str(), c.count)).collect();
    assert_eq!(pairs, [("Chile", 3), ("China", 1), ("Germany", 1)]);

    let statuses = value_counts(&table, columns::STATUS, None).unwrap();
    assert_eq!(statuses[0].value, "Developing");
    assert_eq!(statuses[0].count, 7);
}

/// Five-number summaries of response time per status
#[test]
fn test_box_stats_by_status() {
    let table = prepared(&sample_events());
    let stats = box_stats(&table, columns::STATUS, columns::RESPONSE_TIME_HOURS).unwrap();

    assert_eq!(stats[0].category, "Developed");
    let developed = stats[0].summary.unwrap();
    assert_close(developed.min, 5.0);
    assert_close(developed.q1, 9.75);
    assert_close(developed.median, 14.5);
    assert_close(developed.max, 24.0);

    assert_eq!(stats[1].category, "Developing");
    assert_eq!(stats[1].count, 4);
    let developing = stats[1].summary.unwrap();
    assert_close(developing.q1, 9.0);
    assert_close(developing.median, 20.0);
    assert_close(developing.q3, 42.5);
    assert_close(developing.iqr(), 33.5);
}

/// Headline numbers over the sample
#[test]
fn test_summarize() {
    let summary = summarize(&prepared(&sample_events())).unwrap();
    assert_eq!(summary.event_count, 6);
    assert_eq!(summary.total_affected_population, 15_960_000);
    assert_close(summary.total_economic_impact_million_usd, 600.0);
    assert_close(summary.total_international_aid_million_usd, 60.0);
    assert_close(summary.mean_death_rate_percent.unwrap(), 0.56 / 6.0);

    let empty = summarize(&prepared(&[])).unwrap();
    assert_eq!(empty.total_affected_population, 0);
    assert_eq!(empty.event_count, 0);
    assert_eq!(empty.mean_death_rate_percent, None);
}

/// Aggregates export to Arrow with a nullable value column
#[test]
fn test_aggregate_to_record_batch() {
    let table = prepared(&sample_events());
    let developed = table
        .filter(&Expr::equals(columns::STATUS, "Developed"))
        .unwrap();
    let by_bin = aggregate(
        &developed,
        columns::RESPONSE_BIN,
        columns::DEATH_RATE,
        Reduction::Mean,
    )
    .unwrap();

    let batch = by_bin.to_record_batch().unwrap();
    assert_eq!(batch.num_rows(), 4);
    assert_eq!(batch.num_columns(), 3);
    let value = batch.column(batch.schema().index_of("value").unwrap());
    assert_eq!(value.null_count(), 2);
}

/// One map point per event, sized by affected population
#[test]
fn test_geo_points() {
    let points = geo_points(&prepared(&sample_events())).unwrap();
    assert_eq!(points.len(), 6);
    assert_eq!(points[1].country, "China");
    assert_close(points[1].size, 6_000_000.0);
    assert_close(points[1].latitude, 10.0);
}

/// Population totals stay exact beyond `f64` precision and saturate on overflow
#[test]
fn test_summarize_large_populations() {
    let big = (1_u64 << 53) + 1;
    let summary = summarize(&prepared(&[
        event("a", "Chile", big, 0, 0, 1.0),
        event("b", "Chile", big, 0, 0, 1.0),
    ]))
    .unwrap();
    assert_eq!(summary.total_affected_population, 2 * big);

    let summary = summarize(&prepared(&[
        event("a", "Chile", u64::MAX - 1, 0, 0, 1.0),
        event("b", "Chile", 10, 0, 0, 1.0),
    ]))
    .unwrap();
    assert_eq!(summary.total_affected_population, u64::MAX);
}
