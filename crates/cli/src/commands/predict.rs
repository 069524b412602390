//! The predict command: load artifact, obtain raw inputs, reconcile,
//! predict, report, persist.
//!
//! Everything up to the report is fatal on failure; the persistence
//! write is not, because the decision has already been produced and
//! printed by then.

use crate::output::{format_decision, print_info, print_success, print_warning};
use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use pump_lib::reconcile::{NonInteractive, StdinPrompter, ValuePrompter};
use pump_lib::{store, PredictionRecord, PredictionService, PumpCommand, RawInputs};
use sqlx::PgPool;
use std::path::PathBuf;
use tracing::warn;

pub struct PredictArgs {
    pub model: PathBuf,
    pub soil: Option<f64>,
    pub temp: Option<f64>,
    pub hum: Option<f64>,
    pub from_db: bool,
    pub device_id: Option<String>,
    pub raw: bool,
    pub no_input: bool,
    pub database_url: String,
}

pub async fn run(args: PredictArgs) -> Result<()> {
    let service = PredictionService::load(&args.model)?;

    let mut pool: Option<PgPool> = None;
    let (raw_inputs, device_id) = if args.from_db {
        print_info("Fetching latest sensor data...");
        let connected = PgPool::connect(&args.database_url)
            .await
            .context("failed to connect to sensor store")?;
        let reading = store::fetch_latest_reading(&connected, args.device_id.as_deref()).await?;
        pool = Some(connected);

        print_info(&format!(
            "Using sensor data from device: {}",
            reading.device_id.as_deref().unwrap_or("N/A")
        ));
        if let Some(m) = reading.moisture {
            println!("  Moisture:    {m}%");
        }
        if let Some(t) = reading.temperature {
            println!("  Temperature: {t}°C");
        }
        if let Some(h) = reading.humidity {
            println!("  Humidity:    {h}%");
        }

        let inputs = reading.to_raw_inputs();
        (inputs, reading.device_id)
    } else {
        (
            RawInputs {
                soil: args.soil,
                temp: args.temp,
                hum: args.hum,
            },
            None,
        )
    };

    let mut stdin_prompter = StdinPrompter;
    let mut no_prompter = NonInteractive;
    let prompter: &mut dyn ValuePrompter =
        if args.no_input || !std::io::stdin().is_terminal() {
            &mut no_prompter
        } else {
            &mut stdin_prompter
        };

    let prediction = service.predict(&raw_inputs, prompter)?;

    println!("{}", format_decision(prediction.command, args.raw));

    // Persistence failure must not change the exit status; the
    // decision above already stands
    match persist(pool, &args.database_url, device_id, prediction.command).await {
        Ok(prediction_id) => {
            print_success(&format!("Prediction saved with ID: {prediction_id}"));
        }
        Err(e) => {
            warn!(error = %e, "failed to save prediction");
            print_warning(&format!("Failed to save prediction to database: {e:#}"));
        }
    }

    Ok(())
}

async fn persist(
    pool: Option<PgPool>,
    database_url: &str,
    device_id: Option<String>,
    command: PumpCommand,
) -> Result<String> {
    let pool = match pool {
        Some(pool) => pool,
        None => PgPool::connect(database_url)
            .await
            .context("failed to connect to prediction store")?,
    };
    let record = PredictionRecord::new(device_id, command);
    store::insert_prediction(&pool, &record).await?;
    Ok(record.prediction_id)
}
