//! Core library for the irrigation pump predictor
//!
//! This crate provides:
//! - Time-series resampling and feature engineering over sensor data
//! - Supervised dataset assembly with a forward-shifted target
//! - Model artifact loading and the predict contract
//! - Inference-time feature reconciliation
//! - Sensor and prediction store access

pub mod artifact;
pub mod error;
pub mod model;
pub mod models;
pub mod pipeline;
pub mod reconcile;
pub mod service;
pub mod store;

pub use artifact::{load_artifact, ArtifactForm, ModelArtifact};
pub use error::{PumpError, Result};
pub use models::*;
pub use service::{Prediction, PredictionService};
