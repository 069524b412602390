//! Lag, difference, rolling and calendar feature construction
//!
//! Extends a resampled series with lag-aware numeric features. Only
//! fully populated rows are emitted; beyond the forward-fill already
//! applied by the resampler there is no imputation.

use crate::models::{FeatureRow, ResampledPoint, ResampledSeries};
use chrono::{Datelike, Timelike};

/// Default number of moisture lag features
pub const DEFAULT_LAGS: usize = 6;

/// Trailing window for the rolling moisture mean
pub const ROLLING_WINDOW: usize = 3;

/// Derives feature rows from a resampled series
pub struct FeatureBuilder {
    lags: usize,
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_LAGS)
    }
}

impl FeatureBuilder {
    pub fn new(lags: usize) -> Self {
        Self { lags }
    }

    pub fn lags(&self) -> usize {
        self.lags
    }

    /// Build one feature row per interval, dropping any row with a
    /// missing base value, lag, diff, or rolling input.
    pub fn build(&self, series: &ResampledSeries) -> Vec<FeatureRow> {
        let moisture: Vec<Option<f64>> = series.points.iter().map(|p| p.moisture).collect();
        series
            .points
            .iter()
            .enumerate()
            .filter_map(|(i, point)| self.row_at(i, point, &moisture))
            .collect()
    }

    fn row_at(
        &self,
        index: usize,
        point: &ResampledPoint,
        moisture: &[Option<f64>],
    ) -> Option<FeatureRow> {
        let current = point.moisture?;
        let temperature = point.temperature?;
        let humidity = point.humidity?;

        let mut lags = Vec::with_capacity(self.lags);
        for k in 1..=self.lags {
            lags.push(index.checked_sub(k).and_then(|j| moisture[j])?);
        }

        let diff = current - index.checked_sub(1).and_then(|j| moisture[j])?;

        // Shrinking window at the head of the series: at least one
        // observation instead of a missing value
        let window_start = index.saturating_sub(ROLLING_WINDOW - 1);
        let window: Vec<f64> = moisture[window_start..=index].iter().flatten().copied().collect();
        let rolling = window.iter().sum::<f64>() / window.len() as f64;

        Some(FeatureRow {
            interval_start: point.interval_start,
            interval_index: index,
            moisture: current,
            temperature,
            humidity,
            moisture_lags: lags,
            moisture_diff_1: diff,
            moisture_rolling_mean_3: rolling,
            hour: point.interval_start.hour(),
            dayofyear: point.interval_start.ordinal(),
            dayofweek: point.interval_start.weekday().num_days_from_monday(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Resampler;
    use crate::models::RawObservation;
    use chrono::{TimeZone, Utc};

    fn series_from(moisture: &[Option<f64>]) -> ResampledSeries {
        let base = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        ResampledSeries {
            interval_minutes: 15,
            points: moisture
                .iter()
                .enumerate()
                .map(|(i, m)| ResampledPoint {
                    interval_start: base + chrono::Duration::minutes(15 * i as i64),
                    moisture: *m,
                    temperature: Some(21.0),
                    humidity: Some(55.0),
                })
                .collect(),
        }
    }

    #[test]
    fn test_lag_values_point_back_k_intervals() {
        let series = series_from(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
        let rows = FeatureBuilder::new(2).build(&series);
        // Rows 0 and 1 lack lag_2 and are dropped
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].interval_index, 2);
        assert_eq!(rows[0].moisture_lags, vec![2.0, 1.0]);
        assert_eq!(rows[1].moisture_lags, vec![3.0, 2.0]);
    }

    #[test]
    fn test_diff_is_current_minus_previous() {
        let series = series_from(&[Some(10.0), Some(13.0), Some(11.5)]);
        let rows = FeatureBuilder::new(1).build(&series);
        assert_eq!(rows[0].moisture_diff_1, 3.0);
        assert_eq!(rows[1].moisture_diff_1, -1.5);
    }

    #[test]
    fn test_rolling_mean_uses_shrinking_window() {
        let series = series_from(&[Some(3.0), Some(6.0), Some(9.0), Some(12.0)]);
        let rows = FeatureBuilder::new(1).build(&series);
        assert_eq!(rows.len(), 3);
        // Window at index 1 holds only two observations
        assert_eq!(rows[0].moisture_rolling_mean_3, 4.5);
        assert_eq!(rows[1].moisture_rolling_mean_3, 6.0);
        assert_eq!(rows[2].moisture_rolling_mean_3, 9.0);
    }

    #[test]
    fn test_rows_with_missing_inputs_are_dropped() {
        let series = series_from(&[Some(1.0), None, Some(3.0), Some(4.0)]);
        let rows = FeatureBuilder::new(1).build(&series);
        // Index 1 has no moisture; index 2 has no lag_1. Only index 3 survives.
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].interval_index, 3);
    }

    #[test]
    fn test_missing_temperature_drops_row() {
        let mut series = series_from(&[Some(1.0), Some(2.0), Some(3.0)]);
        series.points[2].temperature = None;
        let rows = FeatureBuilder::new(1).build(&series);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].interval_index, 1);
    }

    #[test]
    fn test_calendar_features() {
        // 2025-06-02 is a Monday; the second interval starts 09:15
        let series = series_from(&[Some(1.0), Some(2.0)]);
        let rows = FeatureBuilder::new(1).build(&series);
        assert_eq!(rows[0].hour, 9);
        assert_eq!(rows[0].dayofweek, 0);
        assert_eq!(rows[0].dayofyear, 153);
    }

    #[test]
    fn test_zero_lags_keeps_rows_after_first() {
        let base = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let observations: Vec<RawObservation> = (0..4)
            .map(|i| RawObservation {
                timestamp: base + chrono::Duration::minutes(15 * i),
                moisture: Some(i as f64),
                temperature: Some(20.0),
                humidity: Some(50.0),
            })
            .collect();
        let series = Resampler::new(15).resample(&observations);
        // Even with no lag columns the diff still needs a previous interval
        let rows = FeatureBuilder::new(0).build(&series);
        assert_eq!(rows.len(), 3);
    }
}
