//! Pump decision models
//!
//! The artifact stores a logistic decision rule as plain weights. Only
//! the predict contract matters to the rest of the system: a feature
//! vector in, a binary pump command out.

use crate::models::{PumpCommand, ReconciledRow};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

fn default_threshold() -> f64 {
    0.5
}

/// Trait for model handles.
///
/// `predict_named` is the structured call form and validates column
/// names when the model recorded its own input list. `predict_flat`
/// is the compatibility fallback for handles that only understand a
/// positional vector.
pub trait PumpModel: Send + Sync {
    fn predict_named(&self, row: &ReconciledRow) -> Result<PumpCommand>;

    fn predict_flat(&self, values: &[f64]) -> Result<PumpCommand>;
}

/// Logistic decision rule over a fixed-width feature vector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub weights: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Input column names recorded at training time, when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<String>>,
}

impl LinearModel {
    fn score(&self, values: &[f64]) -> f64 {
        let z: f64 = self
            .weights
            .iter()
            .zip(values)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;
        1.0 / (1.0 + (-z).exp())
    }

    fn decide(&self, values: &[f64]) -> Result<PumpCommand> {
        if values.len() != self.weights.len() {
            bail!(
                "feature vector has {} values, model expects {}",
                values.len(),
                self.weights.len()
            );
        }
        if self.score(values) >= self.threshold {
            Ok(PumpCommand::On)
        } else {
            Ok(PumpCommand::Off)
        }
    }
}

impl PumpModel for LinearModel {
    fn predict_named(&self, row: &ReconciledRow) -> Result<PumpCommand> {
        if let Some(inputs) = &self.inputs {
            if row.names() != inputs.as_slice() {
                bail!(
                    "feature names do not match model inputs: expected {:?}, got {:?}",
                    inputs,
                    row.names()
                );
            }
        }
        self.decide(row.values())
    }

    fn predict_flat(&self, values: &[f64]) -> Result<PumpCommand> {
        self.decide(values)
    }
}
