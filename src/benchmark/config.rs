//! Benchmark processing constants.

use crate::error::{require_fraction, require_positive, Error, Result};
use serde::{Deserialize, Serialize};

/// Reference values and thresholds for benchmark normalization and prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Throughput scoring 100 before bonuses, tokens/s
    pub reference_throughput: f64,
    /// Power efficiency for the log-scaled bonus, tokens/s/W
    pub reference_power_efficiency: f64,
    /// Days over which freshness decays linearly to zero
    pub freshness_window_days: f64,
    /// Age after which a prediction notes stale data
    pub stale_after_days: f64,
    /// Samples matching below this are ignored
    pub min_match_score: f64,
    /// Confidence of a specification-based estimate for a known device
    pub fallback_confidence: f64,
    /// Bandwidth assumed for devices missing from the catalog, GB/s
    pub fallback_bandwidth_gbps: f64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            reference_throughput: 100.0,
            reference_power_efficiency: 0.4,
            freshness_window_days: 90.0,
            stale_after_days: 30.0,
            min_match_score: 0.5,
            fallback_confidence: 0.3,
            fallback_bandwidth_gbps: 500.0,
        }
    }
}

impl BenchmarkConfig {
    pub fn validate(&self) -> Result<()> {
        require_positive("reference_throughput", self.reference_throughput)?;
        require_positive("reference_power_efficiency", self.reference_power_efficiency)?;
        require_positive("freshness_window_days", self.freshness_window_days)?;
        require_positive("stale_after_days", self.stale_after_days)?;
        require_fraction("min_match_score", self.min_match_score)?;
        require_fraction("fallback_confidence", self.fallback_confidence)?;
        if self.fallback_confidence >= 0.5 {
            return Err(Error::invalid("fallback_confidence", "must stay below 0.5"));
        }
        require_positive("fallback_bandwidth_gbps", self.fallback_bandwidth_gbps)?;
        Ok(())
    }
}
