//! Store configuration for the CLI

use anyhow::{Context, Result};
use serde::Deserialize;

/// Connection settings, resolved from the environment with the
/// `PUMP` prefix (PUMP_DATABASE_URL) and overridable per invocation
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

fn default_database_url() -> String {
    "postgres://127.0.0.1:5432/irrigation".to_string()
}

impl StoreConfig {
    /// Load configuration from the environment, with a CLI flag
    /// taking precedence over everything
    pub fn load(override_url: Option<String>) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("PUMP"))
            .build()?;

        let mut store: StoreConfig = config
            .try_deserialize()
            .context("invalid PUMP_* environment configuration")?;

        if let Some(url) = override_url {
            store.database_url = url;
        }
        Ok(store)
    }
}
