//! Error taxonomy for the pump predictor.
//!
//! Errors that prevent producing a decision are fatal for the run and
//! propagate to the binary; a failed prediction-store write is the one
//! recoverable case and is downgraded to a warning by the caller.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PumpError {
    /// Model artifact could not be read from disk
    #[error("failed to read model artifact {path}: {source}")]
    ArtifactIo {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Artifact is readable but contains no predictable model
    #[error("invalid model artifact: {0}")]
    ArtifactFormat(String),

    /// Sensor store read failed or matched no document
    #[error("sensor fetch failed: {0}")]
    SensorFetch(String),

    /// A required feature could not be resolved by keyword, exact
    /// name, or prompt
    #[error("no value available for required feature '{0}'")]
    MissingFeatureValue(String),

    /// Model rejected both the named-row and flat-array call forms;
    /// both messages are kept for diagnosis
    #[error("model rejected both call forms; named: {named}; flat: {flat}")]
    PredictInvocation { named: String, flat: String },

    /// Store write failed, either during schema setup or a prediction
    /// insert; the latter is recoverable since the decision was
    /// already produced
    #[error("store write failed: {0}")]
    Persistence(#[from] sqlx::Error),

    /// Interactive prompt could not be read
    #[error("failed to read value from input")]
    Prompt(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, PumpError>;
