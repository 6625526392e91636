//! Benchmark normalization and performance prediction.
//!
//! Samples are normalized to a 0-200 scale with a data-quality score.
//! Predictions for unmeasured configurations scale the best-matching sample:
//!
//! - throughput: `(base_size / target_size)^0.8 × batch_ratio^0.6`
//! - memory efficiency: `(base_size / target_size)^0.2`
//! - power efficiency: tracks 90% of the throughput change
//!
//! Without a match above 0.5 the processor degrades to a datasheet
//! estimate with confidence below 0.5 instead of failing.

mod config;
mod matching;
mod processor;
mod types;

pub use config::BenchmarkConfig;
pub use matching::{
    match_score, TargetParams, BATCH_WEIGHT, PRECISION_MISMATCH, SEQUENCE_WEIGHT, SIZE_WEIGHT,
};
pub use processor::{specification_throughput, BenchmarkProcessor, MAX_NORMALIZED_SCORE};
pub use types::{
    ConfidenceInterval, NormalizedBenchmark, PerformancePrediction, PredictionMethod,
    RelativePerformance, MIN_CONFIDENCE,
};

#[cfg(test)]
mod proptests;
