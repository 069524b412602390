//! Core data models for the pump predictor

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default water amount recorded with a prediction, in millimetres
pub const DEFAULT_WATER_MM: f64 = 10.0;

/// Default pump run time recorded with a prediction, in seconds
pub const DEFAULT_PUMP_TIME_SEC: i32 = 20;

/// One raw sensor sample. Any of the measured values may be missing;
/// absence flows through the pipeline rather than raising an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawObservation {
    pub timestamp: DateTime<Utc>,
    pub moisture: Option<f64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
}

/// Aggregate of all observations falling into one fixed-width interval
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledPoint {
    pub interval_start: DateTime<Utc>,
    pub moisture: Option<f64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
}

/// Fixed-interval series produced by the resampler. Points are
/// contiguous from the first to the last observed interval.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledSeries {
    pub interval_minutes: i64,
    pub points: Vec<ResampledPoint>,
}

/// One fully populated training/inference example.
///
/// `interval_index` is the position of this row in the resampled
/// series it was built from; the dataset assembler uses it to align
/// the forward-shifted target.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub interval_start: DateTime<Utc>,
    pub interval_index: usize,
    pub moisture: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub moisture_lags: Vec<f64>,
    pub moisture_diff_1: f64,
    pub moisture_rolling_mean_3: f64,
    pub hour: u32,
    pub dayofyear: u32,
    pub dayofweek: u32,
}

/// Supervised (features, target) pair. Row i of `features` is aligned
/// with `targets[i]`; the raw current-interval moisture column is
/// never part of `columns`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub features: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
    pub target_name: String,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Raw measurement categories the reconciler knows how to source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKey {
    Soil,
    Temp,
    Hum,
}

impl RawKey {
    pub fn name(self) -> &'static str {
        match self {
            RawKey::Soil => "soil",
            RawKey::Temp => "temp",
            RawKey::Hum => "hum",
        }
    }
}

/// Raw named inputs for one inference request, each possibly absent
#[derive(Debug, Clone, Default)]
pub struct RawInputs {
    pub soil: Option<f64>,
    pub temp: Option<f64>,
    pub hum: Option<f64>,
}

impl RawInputs {
    pub fn get(&self, key: RawKey) -> Option<f64> {
        match key {
            RawKey::Soil => self.soil,
            RawKey::Temp => self.temp,
            RawKey::Hum => self.hum,
        }
    }
}

/// Feature row reconciled against the model's expected column names,
/// in the model's column order
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledRow {
    names: Vec<String>,
    values: Vec<f64>,
}

impl ReconciledRow {
    pub fn new(pairs: Vec<(String, f64)>) -> Self {
        let (names, values) = pairs.into_iter().unzip();
        Self { names, values }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Binary pump decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PumpCommand {
    Off,
    On,
}

impl PumpCommand {
    pub fn from_raw(value: u8) -> Self {
        if value == 1 {
            PumpCommand::On
        } else {
            PumpCommand::Off
        }
    }

    pub fn as_raw(self) -> u8 {
        match self {
            PumpCommand::Off => 0,
            PumpCommand::On => 1,
        }
    }

    pub fn is_on(self) -> bool {
        matches!(self, PumpCommand::On)
    }
}

/// One row of the sensor store
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SensorReading {
    pub device_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub moisture: Option<f64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
}

impl SensorReading {
    /// Raw inputs for the reconciler, preserving any missing values
    pub fn to_raw_inputs(&self) -> RawInputs {
        RawInputs {
            soil: self.moisture,
            temp: self.temperature,
            hum: self.humidity,
        }
    }

    pub fn to_observation(&self) -> RawObservation {
        RawObservation {
            timestamp: self.timestamp,
            moisture: self.moisture,
            temperature: self.temperature,
            humidity: self.humidity,
        }
    }
}

/// Persisted pump decision.
///
/// `used` is true exactly when the pump command is Off: an OFF
/// decision needs no further action, an ON decision stays pending
/// until the controller acts on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub device_id: String,
    pub water_mm: f64,
    pub pump_time_sec: i32,
    pub prediction_id: String,
    pub used: bool,
}

impl PredictionRecord {
    pub fn new(device_id: Option<String>, command: PumpCommand) -> Self {
        let prediction_id = format!("{}Z", Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f"));
        Self {
            device_id: device_id.unwrap_or_else(|| "unknown".to_string()),
            water_mm: DEFAULT_WATER_MM,
            pump_time_sec: DEFAULT_PUMP_TIME_SEC,
            prediction_id,
            used: !command.is_on(),
        }
    }
}
