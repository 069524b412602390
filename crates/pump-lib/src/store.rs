//! Sensor and prediction store access
//!
//! PostgreSQL-backed document store. Reads are fatal when they fail
//! or match nothing; the prediction write is the caller's decision to
//! downgrade, since the run already produced its result by then.

use crate::error::{PumpError, Result};
use crate::models::{PredictionRecord, SensorReading};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;

/// Create or update the store schema (idempotent). Safe to call on
/// every startup.
pub async fn create_schema(pool: &PgPool) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sensor_readings (
            id          SERIAL PRIMARY KEY,
            device_id   TEXT,
            timestamp   TIMESTAMPTZ NOT NULL,
            moisture    DOUBLE PRECISION,
            temperature DOUBLE PRECISION,
            humidity    DOUBLE PRECISION
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pump_predictions (
            id            SERIAL PRIMARY KEY,
            device_id     TEXT NOT NULL,
            water_mm      DOUBLE PRECISION NOT NULL,
            pump_time_sec INTEGER NOT NULL,
            prediction_id TEXT NOT NULL UNIQUE,
            used          BOOLEAN NOT NULL
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_sensor_readings_device_id
            ON sensor_readings (device_id);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_sensor_readings_timestamp
            ON sensor_readings (timestamp DESC);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    info!("store schema applied");
    Ok(())
}

/// Most recent reading, optionally filtered by device id. No matching
/// row is a fetch error, not an empty result.
pub async fn fetch_latest_reading(
    pool: &PgPool,
    device_id: Option<&str>,
) -> Result<SensorReading> {
    let reading = match device_id {
        Some(id) => {
            sqlx::query_as::<_, SensorReading>(
                r#"
                SELECT device_id, timestamp, moisture, temperature, humidity
                FROM sensor_readings
                WHERE device_id = $1
                ORDER BY timestamp DESC
                LIMIT 1
                "#,
            )
            .bind(id)
            .fetch_optional(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, SensorReading>(
                r#"
                SELECT device_id, timestamp, moisture, temperature, humidity
                FROM sensor_readings
                ORDER BY timestamp DESC
                LIMIT 1
                "#,
            )
            .fetch_optional(pool)
            .await
        }
    }
    .map_err(|e| PumpError::SensorFetch(e.to_string()))?;

    reading.ok_or_else(|| match device_id {
        Some(id) => PumpError::SensorFetch(format!("no sensor data found for device {id}")),
        None => PumpError::SensorFetch("no sensor data found".to_string()),
    })
}

/// Observation window for dataset building, oldest first
pub async fn fetch_readings(
    pool: &PgPool,
    device_id: Option<&str>,
    since: DateTime<Utc>,
) -> Result<Vec<SensorReading>> {
    let readings = match device_id {
        Some(id) => {
            sqlx::query_as::<_, SensorReading>(
                r#"
                SELECT device_id, timestamp, moisture, temperature, humidity
                FROM sensor_readings
                WHERE device_id = $1 AND timestamp >= $2
                ORDER BY timestamp ASC
                "#,
            )
            .bind(id)
            .bind(since)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, SensorReading>(
                r#"
                SELECT device_id, timestamp, moisture, temperature, humidity
                FROM sensor_readings
                WHERE timestamp >= $1
                ORDER BY timestamp ASC
                "#,
            )
            .bind(since)
            .fetch_all(pool)
            .await
        }
    }
    .map_err(|e| PumpError::SensorFetch(e.to_string()))?;

    Ok(readings)
}

/// Write one prediction record
pub async fn insert_prediction(pool: &PgPool, record: &PredictionRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO pump_predictions (device_id, water_mm, pump_time_sec, prediction_id, used)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(&record.device_id)
    .bind(record.water_mm)
    .bind(record.pump_time_sec)
    .bind(&record.prediction_id)
    .bind(record.used)
    .execute(pool)
    .await?;

    info!(prediction_id = %record.prediction_id, used = record.used, "prediction recorded");
    Ok(())
}
