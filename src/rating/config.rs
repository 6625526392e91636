//! Reference values the sub-scores are measured against.

use super::weights::WeightPresets;
use crate::error::{require_non_negative, require_positive, Error, Result};
use serde::{Deserialize, Serialize};

/// Rating references, thresholds and weight presets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    pub weights: WeightPresets,
    /// Throughput scoring 100, tokens/s
    pub reference_throughput: f64,
    /// FP16 TFLOPS scoring 100
    pub reference_tflops: f64,
    /// Memory bandwidth scoring 100, GB/s
    pub reference_bandwidth_gbps: f64,
    /// Power efficiency scoring 100, tokens/s/W
    pub reference_power_efficiency: f64,
    /// Tokens/s per USD scoring 100
    pub reference_throughput_per_dollar: f64,
    /// GB of memory per 1000 USD scoring 100
    pub reference_gb_per_kilodollar: f64,
    /// TDP above which the thermal score is penalized, watts
    pub thermal_baseline_watts: f64,
    /// Thermal points lost per watt above the baseline
    pub thermal_penalty_per_watt: f64,
    /// Prices below this earn a bonus, USD
    pub low_price_usd: f64,
    /// Prices above this are penalized, USD
    pub high_price_usd: f64,
    pub low_price_bonus: f64,
    pub high_price_penalty: f64,
    /// Test models above this size reduce confidence, billions
    pub large_model_threshold_billions: f64,
    /// Test batch sizes above this reduce confidence
    pub large_batch_threshold: u32,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            weights: WeightPresets::default(),
            reference_throughput: 100.0,
            reference_tflops: 312.0,
            reference_bandwidth_gbps: 2039.0,
            reference_power_efficiency: 0.4,
            reference_throughput_per_dollar: 0.02,
            reference_gb_per_kilodollar: 10.0,
            thermal_baseline_watts: 250.0,
            thermal_penalty_per_watt: 0.2,
            low_price_usd: 1000.0,
            high_price_usd: 10_000.0,
            low_price_bonus: 5.0,
            high_price_penalty: 10.0,
            large_model_threshold_billions: 70.0,
            large_batch_threshold: 32,
        }
    }
}

impl RatingConfig {
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        require_positive("reference_throughput", self.reference_throughput)?;
        require_positive("reference_tflops", self.reference_tflops)?;
        require_positive("reference_bandwidth_gbps", self.reference_bandwidth_gbps)?;
        require_positive("reference_power_efficiency", self.reference_power_efficiency)?;
        require_positive("reference_throughput_per_dollar", self.reference_throughput_per_dollar)?;
        require_positive("reference_gb_per_kilodollar", self.reference_gb_per_kilodollar)?;
        require_non_negative("thermal_baseline_watts", self.thermal_baseline_watts)?;
        require_non_negative("thermal_penalty_per_watt", self.thermal_penalty_per_watt)?;
        require_non_negative("low_price_bonus", self.low_price_bonus)?;
        require_non_negative("high_price_penalty", self.high_price_penalty)?;
        require_positive("large_model_threshold_billions", self.large_model_threshold_billions)?;
        if self.low_price_usd > self.high_price_usd {
            return Err(Error::Config(format!(
                "low_price_usd ({}) must not exceed high_price_usd ({})",
                self.low_price_usd, self.high_price_usd
            )));
        }
        Ok(())
    }
}
