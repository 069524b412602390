//! The init command: apply the store schema

use crate::output::print_success;
use anyhow::{Context, Result};
use sqlx::PgPool;

pub async fn run(database_url: &str) -> Result<()> {
    let pool = PgPool::connect(database_url)
        .await
        .context("failed to connect to store")?;
    pump_lib::store::create_schema(&pool).await?;
    print_success("Store schema applied");
    Ok(())
}
