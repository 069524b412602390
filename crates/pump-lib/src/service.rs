//! Prediction orchestration
//!
//! Owns the loaded model artifact for the duration of a run and turns
//! raw inputs into a pump command: reconcile, predict with the named
//! row, retry once with the flat vector for handles that reject
//! named-column input.

use crate::artifact::{self, ModelArtifact};
use crate::error::{PumpError, Result};
use crate::model::PumpModel;
use crate::models::{PumpCommand, RawInputs, ReconciledRow};
use crate::reconcile::{reconcile, ValuePrompter};
use std::path::Path;
use tracing::debug;

/// Outcome of one inference run
#[derive(Debug, Clone)]
pub struct Prediction {
    pub command: PumpCommand,
    pub row: ReconciledRow,
}

/// Single-run prediction service. The artifact is loaded once and
/// read-only afterwards.
pub struct PredictionService {
    artifact: ModelArtifact,
}

impl PredictionService {
    pub fn new(artifact: ModelArtifact) -> Self {
        Self { artifact }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(artifact::load_artifact(path)?))
    }

    pub fn feature_names(&self) -> Option<&[String]> {
        self.artifact.feature_names.as_deref()
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Reconcile raw inputs against the model's columns and predict.
    ///
    /// The named call form is tried first; if the handle rejects it,
    /// the equivalent flat vector is tried once. Both failing is
    /// fatal, with both messages surfaced together.
    pub fn predict(
        &self,
        raw: &RawInputs,
        prompter: &mut dyn ValuePrompter,
    ) -> Result<Prediction> {
        let row = reconcile(self.feature_names(), raw, prompter)?;

        let command = match self.artifact.model.predict_named(&row) {
            Ok(command) => command,
            Err(named_err) => match self.artifact.model.predict_flat(row.values()) {
                Ok(command) => {
                    debug!(error = %named_err, "named predict rejected, flat vector accepted");
                    command
                }
                Err(flat_err) => {
                    return Err(PumpError::PredictInvocation {
                        named: named_err.to_string(),
                        flat: flat_err.to_string(),
                    })
                }
            },
        };

        debug!(command = command.as_raw(), features = row.len(), "prediction complete");
        Ok(Prediction { command, row })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{ArtifactForm, ModelArtifact};
    use crate::model::LinearModel;
    use crate::reconcile::NonInteractive;
    use serde_json::Map;

    fn artifact(inputs: Option<Vec<String>>, feature_names: Option<Vec<String>>) -> ModelArtifact {
        ModelArtifact {
            model: LinearModel {
                weights: vec![-1.0, 0.0, 0.0],
                intercept: 30.0,
                threshold: 0.5,
                inputs,
            },
            feature_names,
            metadata: Map::new(),
            form: ArtifactForm::Mapping,
        }
    }

    fn dry_inputs() -> RawInputs {
        RawInputs {
            soil: Some(20.0),
            temp: Some(19.0),
            hum: Some(55.0),
        }
    }

    #[test]
    fn test_predict_with_matching_recorded_inputs() {
        let columns = vec![
            "soil_moisture".to_string(),
            "air_temp".to_string(),
            "rel_humidity".to_string(),
        ];
        let service = PredictionService::new(artifact(Some(columns.clone()), Some(columns)));
        let prediction = service.predict(&dry_inputs(), &mut NonInteractive).unwrap();
        assert_eq!(prediction.command, PumpCommand::On);
        assert_eq!(prediction.row.values(), [20.0, 19.0, 55.0]);
    }

    #[test]
    fn test_flat_fallback_when_named_call_rejected() {
        // Model recorded different column names than the bundle
        // advertises, so the named call fails and the flat retry
        // carries the decision
        let recorded = vec!["f0".to_string(), "f1".to_string(), "f2".to_string()];
        let advertised = vec![
            "soil_moisture".to_string(),
            "air_temp".to_string(),
            "rel_humidity".to_string(),
        ];
        let service = PredictionService::new(artifact(Some(recorded), Some(advertised)));
        let prediction = service.predict(&dry_inputs(), &mut NonInteractive).unwrap();
        assert_eq!(prediction.command, PumpCommand::On);
    }

    #[test]
    fn test_both_call_forms_failing_is_fatal() {
        // Two advertised columns against a three-weight model: both
        // call forms reject the row
        let recorded = vec!["f0".to_string(), "f1".to_string(), "f2".to_string()];
        let advertised = vec!["soil_moisture".to_string(), "air_temp".to_string()];
        let service = PredictionService::new(artifact(Some(recorded), Some(advertised)));
        let err = service.predict(&dry_inputs(), &mut NonInteractive).unwrap_err();
        match err {
            PumpError::PredictInvocation { named, flat } => {
                assert!(named.contains("feature names"));
                assert!(flat.contains("model expects"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_absent_feature_list_uses_fixed_order() {
        let service = PredictionService::new(artifact(None, None));
        let prediction = service.predict(&dry_inputs(), &mut NonInteractive).unwrap();
        assert_eq!(prediction.row.names(), ["soil", "temp", "hum"]);
    }
}
