//! Model artifact loading
//!
//! An artifact is a JSON bundle. It is either a mapping holding a
//! model under "model" or "pipeline" (or anywhere in the bundle as a
//! last resort), an ordered feature-name list under "features" or
//! "feature_names", and free-form metadata, or it is a bare model
//! document with no surrounding bundle. The two forms are resolved
//! once at load time.

use crate::error::{PumpError, Result};
use crate::model::LinearModel;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// How the bundle was shaped on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactForm {
    Mapping,
    BareModel,
}

/// Deserialized model bundle
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    pub model: LinearModel,
    /// Ordered column names the model expects; fixes both set and
    /// order when present
    pub feature_names: Option<Vec<String>>,
    pub metadata: Map<String, Value>,
    pub form: ArtifactForm,
}

/// Load and resolve an artifact from disk
pub fn load_artifact(path: &Path) -> Result<ModelArtifact> {
    let bytes = fs::read(path).map_err(|source| PumpError::ArtifactIo {
        path: path.display().to_string(),
        source,
    })?;
    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| PumpError::ArtifactFormat(format!("not valid JSON: {e}")))?;
    resolve(value)
}

/// Resolve an already-parsed bundle document
pub fn resolve(value: Value) -> Result<ModelArtifact> {
    match value {
        Value::Object(map) => {
            let model = resolve_model(&map).ok_or_else(|| {
                PumpError::ArtifactFormat("no predictable model found in bundle".to_string())
            })?;
            let feature_names = map
                .get("features")
                .or_else(|| map.get("feature_names"))
                .and_then(string_list);
            let metadata = map
                .get("metadata")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            verify_checksum(&model, &metadata)?;
            Ok(ModelArtifact {
                model,
                feature_names,
                metadata,
                form: ArtifactForm::Mapping,
            })
        }
        other => {
            let model = parse_model(&other).ok_or_else(|| {
                PumpError::ArtifactFormat(
                    "artifact is neither a bundle nor a predictable model".to_string(),
                )
            })?;
            Ok(ModelArtifact {
                model,
                feature_names: None,
                metadata: Map::new(),
                form: ArtifactForm::BareModel,
            })
        }
    }
}

/// Resolution order: explicit "model", then "pipeline", then the
/// first bundle value that parses as a model
fn resolve_model(map: &Map<String, Value>) -> Option<LinearModel> {
    map.get("model")
        .and_then(parse_model)
        .or_else(|| map.get("pipeline").and_then(parse_model))
        .or_else(|| map.values().find_map(parse_model))
}

fn parse_model(value: &Value) -> Option<LinearModel> {
    serde_json::from_value::<LinearModel>(value.clone())
        .ok()
        .filter(|m| !m.weights.is_empty())
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    items
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

/// Validate the weight checksum when the bundle carries one. The
/// digest covers the little-endian bytes of each weight followed by
/// the intercept.
fn verify_checksum(model: &LinearModel, metadata: &Map<String, Value>) -> Result<()> {
    let Some(expected) = metadata.get("weights_sha256").and_then(Value::as_str) else {
        return Ok(());
    };
    let actual = weight_digest(model);
    if !actual.eq_ignore_ascii_case(expected) {
        return Err(PumpError::ArtifactFormat(format!(
            "weight checksum mismatch: expected {expected}, got {actual}"
        )));
    }
    Ok(())
}

/// Hex digest of the model weights, usable as `weights_sha256`
pub fn weight_digest(model: &LinearModel) -> String {
    let mut hasher = Sha256::new();
    for w in &model.weights {
        hasher.update(w.to_le_bytes());
    }
    hasher.update(model.intercept.to_le_bytes());
    hex::encode(hasher.finalize())
}
