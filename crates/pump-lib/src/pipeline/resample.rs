//! Fixed-interval resampling of raw sensor observations
//!
//! Buckets irregularly timed observations into epoch-aligned intervals,
//! aggregates each interval by arithmetic mean, and forward-fills short
//! gaps. Missing values never raise an error; absence is consumed
//! downstream as a first-class state.

use crate::models::{RawObservation, ResampledPoint, ResampledSeries};
use chrono::{DateTime, Utc};

/// Default resampling interval
pub const DEFAULT_INTERVAL_MINUTES: i64 = 15;

/// Maximum number of consecutive missing intervals to forward-fill.
/// Beyond this cap a value stays missing rather than going stale.
pub const FORWARD_FILL_LIMIT: usize = 2;

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    sum: f64,
    count: u32,
}

impl Accumulator {
    fn add(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }
}

/// Buckets raw observations into fixed-width intervals
pub struct Resampler {
    interval_minutes: i64,
}

impl Default for Resampler {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL_MINUTES)
    }
}

impl Resampler {
    pub fn new(interval_minutes: i64) -> Self {
        Self {
            interval_minutes: interval_minutes.max(1),
        }
    }

    /// Resample observations into a contiguous fixed-interval series.
    ///
    /// Interval starts are epoch-aligned multiples of the interval
    /// width. Every interval between the first and last observed one
    /// is present in the output; intervals with no observations hold
    /// `None` unless the forward-fill pass covers them.
    pub fn resample(&self, observations: &[RawObservation]) -> ResampledSeries {
        let mut sorted: Vec<&RawObservation> = observations.iter().collect();
        sorted.sort_by_key(|o| o.timestamp);

        let Some(first) = sorted.first() else {
            return ResampledSeries {
                interval_minutes: self.interval_minutes,
                points: Vec::new(),
            };
        };

        let step = self.interval_minutes * 60;
        let floor = |ts: DateTime<Utc>| ts.timestamp().div_euclid(step) * step;

        let start = floor(first.timestamp);
        let end = floor(sorted[sorted.len() - 1].timestamp);
        let len = ((end - start) / step) as usize + 1;

        let mut moisture = vec![Accumulator::default(); len];
        let mut temperature = vec![Accumulator::default(); len];
        let mut humidity = vec![Accumulator::default(); len];

        for obs in &sorted {
            let idx = ((floor(obs.timestamp) - start) / step) as usize;
            moisture[idx].add(obs.moisture);
            temperature[idx].add(obs.temperature);
            humidity[idx].add(obs.humidity);
        }

        let mut moisture: Vec<Option<f64>> = moisture.iter().map(Accumulator::mean).collect();
        let mut temperature: Vec<Option<f64>> = temperature.iter().map(Accumulator::mean).collect();
        let mut humidity: Vec<Option<f64>> = humidity.iter().map(Accumulator::mean).collect();

        forward_fill(&mut moisture, FORWARD_FILL_LIMIT);
        forward_fill(&mut temperature, FORWARD_FILL_LIMIT);
        forward_fill(&mut humidity, FORWARD_FILL_LIMIT);

        let points = (0..len)
            .map(|i| ResampledPoint {
                interval_start: DateTime::from_timestamp(start + i as i64 * step, 0)
                    .unwrap_or_else(Utc::now),
                moisture: moisture[i],
                temperature: temperature[i],
                humidity: humidity[i],
            })
            .collect();

        ResampledSeries {
            interval_minutes: self.interval_minutes,
            points,
        }
    }
}

/// Propagate the last known value into missing slots, capped at
/// `limit` consecutive fills per gap. The cap resets at each present
/// value.
fn forward_fill(values: &mut [Option<f64>], limit: usize) {
    let mut last: Option<f64> = None;
    let mut run = 0usize;
    for value in values.iter_mut() {
        match value {
            Some(v) => {
                last = Some(*v);
                run = 0;
            }
            None => {
                run += 1;
                if run <= limit {
                    *value = last;
                }
            }
        }
    }
}
