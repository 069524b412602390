//! The dataset command: build a supervised feature matrix from stored
//! sensor readings

use crate::output::{print_info, print_success, print_warning, OutputFormat};
use anyhow::{bail, Context, Result};
use pump_lib::pipeline::{DatasetAssembler, Resampler};
use pump_lib::{store, Dataset, RawObservation};
use sqlx::PgPool;
use tabled::builder::Builder;
use tabled::settings::Style;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    database_url: &str,
    interval_minutes: i64,
    lags: usize,
    horizon: usize,
    since: &str,
    device_id: Option<&str>,
    format: OutputFormat,
    output: Option<String>,
) -> Result<()> {
    let window = parse_since(since)?;
    let cutoff = chrono::Utc::now() - window;

    let pool = PgPool::connect(database_url)
        .await
        .context("failed to connect to sensor store")?;
    let readings = store::fetch_readings(&pool, device_id, cutoff).await?;

    if readings.is_empty() {
        print_warning("No sensor readings in the requested window");
        return Ok(());
    }
    print_info(&format!("Loaded {} readings", readings.len()));

    let observations: Vec<RawObservation> =
        readings.iter().map(|r| r.to_observation()).collect();
    let series = Resampler::new(interval_minutes).resample(&observations);
    let dataset = DatasetAssembler::new(lags, horizon).assemble(&series);

    if dataset.is_empty() {
        print_warning("Not enough readings to build a dataset at these settings");
        return Ok(());
    }

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&dataset)?;
        std::fs::write(&path, json).with_context(|| format!("failed to write {path}"))?;
        print_success(&format!("Dataset with {} rows written to {path}", dataset.len()));
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&dataset)?);
        }
        OutputFormat::Table => {
            println!("{}", render_table(&dataset));
            println!("\nTotal: {} rows", dataset.len());
        }
    }

    Ok(())
}

fn render_table(dataset: &Dataset) -> String {
    let mut builder = Builder::default();
    let mut header: Vec<String> = dataset.columns.clone();
    header.push(dataset.target_name.clone());
    builder.push_record(header);

    for (features, target) in dataset.features.iter().zip(&dataset.targets) {
        let mut row: Vec<String> = features.iter().map(|v| format!("{v:.3}")).collect();
        row.push(format!("{target:.3}"));
        builder.push_record(row);
    }

    builder.build().with(Style::rounded()).to_string()
}

/// Parse a window like `90m`, `24h`, or `7d`
fn parse_since(since: &str) -> Result<chrono::Duration> {
    let since = since.trim();
    let (value, unit) = since.split_at(since.len().saturating_sub(1));
    let value: i64 = value
        .parse()
        .with_context(|| format!("invalid time window '{since}'"))?;
    match unit {
        "m" => Ok(chrono::Duration::minutes(value)),
        "h" => Ok(chrono::Duration::hours(value)),
        "d" => Ok(chrono::Duration::days(value)),
        _ => bail!("invalid time window '{since}': expected a suffix of m, h, or d"),
    }
}
