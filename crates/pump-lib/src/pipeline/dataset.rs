//! Supervised dataset assembly
//!
//! Combines feature rows with a forward-shifted moisture target. The
//! raw current-interval moisture column is excluded from the feature
//! matrix by contract: it is the near-target and must not leak in.

use super::FeatureBuilder;
use crate::models::{Dataset, FeatureRow, ResampledSeries};

/// Default prediction horizon, in intervals
pub const DEFAULT_HORIZON: usize = 1;

/// Builds a (features, target) pair from a resampled series
pub struct DatasetAssembler {
    builder: FeatureBuilder,
    horizon: usize,
}

impl DatasetAssembler {
    pub fn new(lags: usize, horizon: usize) -> Self {
        Self {
            builder: FeatureBuilder::new(lags),
            horizon,
        }
    }

    /// Ordered feature column names for a given lag count
    pub fn feature_columns(lags: usize) -> Vec<String> {
        let mut columns = vec!["temperature".to_string(), "humidity".to_string()];
        columns.extend((1..=lags).map(|k| format!("moisture_lag_{k}")));
        columns.push("moisture_diff_1".to_string());
        columns.push("moisture_rolling_mean_3".to_string());
        columns.push("hour".to_string());
        columns.push("dayofyear".to_string());
        columns.push("dayofweek".to_string());
        columns
    }

    /// Assemble the dataset. The target for the row at interval index
    /// i is the resampled moisture at i + horizon; rows whose target
    /// is missing or past the end of the series are dropped from both
    /// sides, so the matrix and target vector always have equal
    /// length.
    pub fn assemble(&self, series: &ResampledSeries) -> Dataset {
        let rows = self.builder.build(series);
        let mut features = Vec::with_capacity(rows.len());
        let mut targets = Vec::with_capacity(rows.len());

        for row in &rows {
            let target = series
                .points
                .get(row.interval_index + self.horizon)
                .and_then(|p| p.moisture);
            if let Some(target) = target {
                features.push(feature_vector(row));
                targets.push(target);
            }
        }

        Dataset {
            columns: Self::feature_columns(self.builder.lags()),
            features,
            targets,
            target_name: format!("target_t_plus_{}", self.horizon),
        }
    }
}

fn feature_vector(row: &FeatureRow) -> Vec<f64> {
    let mut values = vec![row.temperature, row.humidity];
    values.extend_from_slice(&row.moisture_lags);
    values.push(row.moisture_diff_1);
    values.push(row.moisture_rolling_mean_3);
    values.push(f64::from(row.hour));
    values.push(f64::from(row.dayofyear));
    values.push(f64::from(row.dayofweek));
    values
}
