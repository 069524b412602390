//! Irrigation Pump Predictor CLI
//!
//! A command-line tool for producing pump ON/OFF decisions from a
//! trained model, building supervised datasets from stored sensor
//! readings, and managing the store schema.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Irrigation Pump Predictor CLI
#[derive(Parser)]
#[command(name = "pump")]
#[command(author, version, about = "CLI for the Irrigation Pump Predictor", long_about = None)]
pub struct Cli {
    /// PostgreSQL connection string (overrides PUMP_DATABASE_URL)
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Produce a pump ON/OFF decision from a trained model
    Predict {
        /// Path to the model artifact bundle
        #[arg(long)]
        model: PathBuf,

        /// Soil moisture value (numeric)
        #[arg(long)]
        soil: Option<f64>,

        /// Air temperature (numeric)
        #[arg(long)]
        temp: Option<f64>,

        /// Air humidity (numeric)
        #[arg(long)]
        hum: Option<f64>,

        /// Fetch sensor values from the sensor store instead
        #[arg(long)]
        from_db: bool,

        /// Filter by device id when using --from-db
        #[arg(long, env = "PUMP_DEVICE_ID")]
        device_id: Option<String>,

        /// Print raw 0/1 instead of human text
        #[arg(long)]
        raw: bool,

        /// Never prompt; fail on unresolved features instead
        #[arg(long)]
        no_input: bool,
    },

    /// Build a supervised feature matrix from stored readings
    Dataset {
        /// Resampling interval in minutes
        #[arg(long, default_value_t = 15)]
        interval_minutes: i64,

        /// Number of moisture lag features
        #[arg(long, default_value_t = 6)]
        lags: usize,

        /// Prediction horizon in intervals
        #[arg(long, default_value_t = 1)]
        horizon: usize,

        /// Time window to read (e.g. 90m, 24h, 7d)
        #[arg(long, default_value = "24h")]
        since: String,

        /// Filter by device id
        #[arg(long, env = "PUMP_DEVICE_ID")]
        device_id: Option<String>,

        /// Output format
        #[arg(long, short, default_value = "table")]
        format: output::OutputFormat,

        /// Write the dataset to a file as JSON
        #[arg(long, short)]
        output: Option<String>,
    },

    /// Apply the store schema (idempotent)
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let store = config::StoreConfig::load(cli.database_url)?;

    match cli.command {
        Commands::Predict {
            model,
            soil,
            temp,
            hum,
            from_db,
            device_id,
            raw,
            no_input,
        } => {
            commands::predict::run(commands::predict::PredictArgs {
                model,
                soil,
                temp,
                hum,
                from_db,
                device_id,
                raw,
                no_input,
                database_url: store.database_url,
            })
            .await
        }
        Commands::Dataset {
            interval_minutes,
            lags,
            horizon,
            since,
            device_id,
            format,
            output,
        } => {
            commands::dataset::run(
                &store.database_url,
                interval_minutes,
                lags,
                horizon,
                &since,
                device_id.as_deref(),
                format,
                output,
            )
            .await
        }
        Commands::Init => commands::init::run(&store.database_url).await,
    }
}
