use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use disaster_prep::aggregate::{box_stats, summarize, value_counts};
use disaster_prep::config::DATA_PATH_ENV;
use disaster_prep::models::columns;
use disaster_prep::{
    AggregateTable, BinScheme, Expr, PipelineConfig, PreparedTable, Reduction, aggregate,
    prepare_with_report, read_events,
};
use log::info;

const MEGA_EVENT: &str = ">5M (Mega-event)";

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut json = false;
    let mut coarse = false;
    let mut path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "--coarse" => coarse = true,
            _ => path = Some(PathBuf::from(arg)),
        }
    }
    let path = match path {
        Some(path) => path,
        None => std::env::var(DATA_PATH_ENV)
            .map(PathBuf::from)
            .with_context(|| format!("usage: disaster-report <file.csv> or set {DATA_PATH_ENV}"))?,
    };

    let mut config = PipelineConfig::default();
    if coarse {
        config = config.with_response_bins(BinScheme::response_coarse());
    }

    let start = Instant::now();
    let raw = read_events(&path, &config)?;
    let (table, report) = prepare_with_report(&raw, &config)?;
    info!("Prepared {} rows in {:?}", table.num_rows(), start.elapsed());
    if report.division_anomalies > 0 {
        info!(
            "{} events had zero affected population",
            report.division_anomalies
        );
    }

    if json {
        print_json(&table)
    } else {
        print_report(&table)
    }
}

fn print_json(table: &PreparedTable) -> anyhow::Result<()> {
    let summary = summarize(table)?;
    let by_response = aggregate(table, columns::RESPONSE_BIN, columns::DEATH_RATE, Reduction::Mean)?;
    let by_scale = aggregate(
        table,
        columns::SCALE,
        columns::RESPONSE_TIME_HOURS,
        Reduction::Mean,
    )?;
    let document = serde_json::json!({
        "summary": summary,
        "death_rate_by_response_bin": by_response.rows,
        "response_time_by_scale": by_scale.rows,
        "response_time_by_status": box_stats(table, columns::STATUS, columns::RESPONSE_TIME_HOURS)?,
    });
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

fn print_report(table: &PreparedTable) -> anyhow::Result<()> {
    let summary = summarize(table)?;
    println!("Events:                  {}", summary.event_count);
    println!("Affected population:     {}", summary.total_affected_population);
    println!(
        "Economic impact (M USD): {:.0}",
        summary.total_economic_impact_million_usd
    );
    println!(
        "International aid (M USD): {:.0}",
        summary.total_international_aid_million_usd
    );
    if let Some(rate) = summary.mean_death_rate_percent {
        println!("Mean death rate:         {rate:.4}%");
    }

    println!("\nTop event types:");
    for entry in value_counts(table, columns::EVENT_TYPE, Some(8))? {
        println!("  {:<24} {}", entry.value, entry.count);
    }

    print_table(&aggregate(
        table,
        columns::RESPONSE_BIN,
        columns::DEATH_RATE,
        Reduction::Mean,
    )?);
    print_table(&aggregate(
        table,
        columns::RESPONSE_BIN,
        columns::INJURY_RATE,
        Reduction::Mean,
    )?);

    println!("\nResponse time by status:");
    for stats in box_stats(table, columns::STATUS, columns::RESPONSE_TIME_HOURS)? {
        match stats.summary {
            Some(s) => println!(
                "  {:<12} n={:<6} min={:.1} q1={:.1} median={:.1} q3={:.1} max={:.1}",
                stats.category, stats.count, s.min, s.q1, s.median, s.q3, s.max
            ),
            None => println!("  {:<12} n=0", stats.category),
        }
    }

    let slow = table.filter(&Expr::gt(columns::RESPONSE_TIME_HOURS, 24.0))?;
    println!("\nSlow responses (>24h):");
    print_table(&aggregate(
        &slow,
        columns::STATUS,
        columns::DEATH_RATE,
        Reduction::Mean,
    )?);

    print_table(&aggregate(
        table,
        columns::SCALE,
        columns::RESPONSE_TIME_HOURS,
        Reduction::Mean,
    )?);
    print_table(&aggregate(
        table,
        columns::SCALE,
        columns::DEATH_RATE,
        Reduction::Mean,
    )?);

    let mega = table.filter(&Expr::equals(columns::SCALE, MEGA_EVENT))?;
    println!("\nTop countries among mega-events:");
    for entry in value_counts(&mega, columns::COUNTRY, Some(10))? {
        println!("  {:<24} {}", entry.value, entry.count);
    }

    let grouped = table.with_membership_column(
        "china_india",
        columns::COUNTRY,
        &["China", "India"],
        "China + India",
        "Rest of world",
    )?;
    println!("\nResponse time, China + India vs rest of world:");
    for stats in box_stats(&grouped, "china_india", columns::RESPONSE_TIME_HOURS)? {
        if let Some(s) = stats.summary {
            println!(
                "  {:<14} n={:<6} median={:.1}",
                stats.category, stats.count, s.median
            );
        }
    }

    let others = table.filter(&Expr::not_in(columns::COUNTRY, ["China", "India"]))?;
    println!("\nWithout China and India:");
    print_table(&aggregate(
        &others,
        columns::SCALE,
        columns::RESPONSE_TIME_HOURS,
        Reduction::Mean,
    )?);
    print_table(&aggregate(
        &others,
        columns::SCALE,
        columns::DEATH_RATE,
        Reduction::Mean,
    )?);

    Ok(())
}

fn print_table(table: &AggregateTable) {
    println!(
        "\n{:?} of {} by {}:",
        table.reduction, table.value_column, table.group_column
    );
    for row in &table.rows {
        match row.value {
            Some(value) => println!("  {:<20} n={:<6} {value:.4}", row.category, row.count),
            None => println!("  {:<20} n={:<6} -", row.category, row.count),
        }
    }
}
