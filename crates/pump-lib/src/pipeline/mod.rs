//! Time-series feature pipeline

mod dataset;
mod features;
mod resample;

pub use dataset::{DatasetAssembler, DEFAULT_HORIZON};
pub use features::{FeatureBuilder, DEFAULT_LAGS, ROLLING_WINDOW};
pub use resample::{Resampler, DEFAULT_INTERVAL_MINUTES, FORWARD_FILL_LIMIT};
