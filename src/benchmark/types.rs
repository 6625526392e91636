//! Benchmark processing results.

use super::matching::TargetParams;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest confidence any result reports.
pub const MIN_CONFIDENCE: f64 = 0.1;

/// Symmetric band around a normalized score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// A benchmark sample on a common 0-200 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedBenchmark {
    pub test_name: String,
    pub device_id: String,
    /// 100 at the reference throughput, adjusted by efficiency bonuses
    pub normalized_score: f64,
    pub confidence_interval: ConfidenceInterval,
    /// Freshness, credibility and verification combined, 0-1
    pub data_quality: f64,
    pub source_credibility: f64,
    /// Match against the reference configuration (7B, batch 1, 2048, fp16)
    pub applicability_score: f64,
}

/// How a prediction was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMethod {
    /// Scaled from the best-matching benchmark sample
    Interpolated,
    /// Derived from datasheet bandwidth for lack of matching samples
    SpecificationBased,
}

impl PredictionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interpolated => "interpolated",
            Self::SpecificationBased => "specification_based",
        }
    }
}

impl fmt::Display for PredictionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predicted performance of a device for a target configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformancePrediction {
    pub device_id: String,
    pub target: TargetParams,
    pub throughput_tokens_per_sec: f64,
    /// 0-100
    pub memory_efficiency: f64,
    /// Tokens per second per watt
    pub power_efficiency: f64,
    /// 0-1
    pub confidence: f64,
    pub method: PredictionMethod,
    /// Test name of the sample the prediction was scaled from
    pub based_on: Option<String>,
    /// Match score of that sample (0 for specification-based estimates)
    pub match_score: f64,
    /// Samples that passed the match threshold
    pub sample_count: usize,
    /// Caveats a reader should know about
    pub limitations: Vec<String>,
}

impl PerformancePrediction {
    /// Whether this is a specification-based estimate.
    pub fn is_fallback(&self) -> bool {
        self.method == PredictionMethod::SpecificationBased
    }
}

/// Throughput of one device relative to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativePerformance {
    pub target_id: String,
    pub reference_id: String,
    /// `target / reference` throughput
    pub ratio: f64,
    /// `min(100, 50 × ratio)`; 50 means parity
    pub score: f64,
    pub confidence: f64,
    /// False when the neutral placeholder was returned
    pub has_data: bool,
    pub limitations: Vec<String>,
}

impl RelativePerformance {
    /// Neutral low-confidence result for devices without usable data.
    pub fn neutral(target_id: &str, reference_id: &str, reason: String) -> Self {
        Self {
            target_id: target_id.to_string(),
            reference_id: reference_id.to_string(),
            ratio: 0.5,
            score: 50.0,
            confidence: MIN_CONFIDENCE,
            has_data: false,
            limitations: vec![reason],
        }
    }
}
