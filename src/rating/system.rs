//! Weighted multi-factor device rating.

use super::comparison::{compare_ratings, DeviceComparison};
use super::config::RatingConfig;
use super::score::{EfficiencyRating, ScoreFactor, SubScore};
use super::weights::RatingWeights;
use crate::benchmark::{match_score, specification_throughput, TargetParams};
use crate::catalog::{BenchmarkSample, DeviceProfile};
use crate::error::Result;
use crate::workload::Workload;
use rayon::prelude::*;
use std::cmp::Ordering;

/// Base confidence of the compute sub-score.
pub const COMPUTE_BASE_CONFIDENCE: f64 = 0.90;
/// Base confidence of the memory sub-score.
pub const MEMORY_BASE_CONFIDENCE: f64 = 0.85;
/// Base confidence of the power sub-score.
pub const POWER_BASE_CONFIDENCE: f64 = 0.80;
/// Base confidence of the cost sub-score.
pub const COST_BASE_CONFIDENCE: f64 = 0.95;

const NO_DATA_FACTOR: f64 = 0.6;
const LARGE_MODEL_FACTOR: f64 = 0.8;
const LARGE_BATCH_FACTOR: f64 = 0.9;
const UNVERIFIED_FACTOR: f64 = 0.9;
const UNKNOWN_PRICE_FACTOR: f64 = 0.5;
const NEUTRAL_SCORE: f64 = 50.0;

/// Measured or estimated performance feeding the sub-scores.
struct Evidence<'d> {
    throughput: f64,
    memory_efficiency: Option<f64>,
    power_efficiency: f64,
    sample: Option<&'d BenchmarkSample>,
}

/// `100 × value / reference`, capped at 100.
fn capped_ratio(value: f64, reference: f64) -> f64 {
    (100.0 * value / reference).clamp(0.0, 100.0)
}

/// Stateless rating engine; construct once and share.
#[derive(Debug, Clone, Default)]
pub struct EfficiencyRatingSystem {
    config: RatingConfig,
}

impl EfficiencyRatingSystem {
    pub fn new(config: RatingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    /// Weights used for `workload`.
    pub fn weights(&self, workload: Workload) -> RatingWeights {
        self.config.weights.for_workload(workload)
    }

    /// Rate one device for a workload.
    pub fn rate(&self, device: &DeviceProfile, workload: Workload) -> Result<EfficiencyRating> {
        device.validate()?;
        let weights = self.weights(workload);
        let evidence = self.evidence(device);

        let compute = self.compute_score(device, &evidence, weights.compute);
        let memory = self.memory_score(device, &evidence, weights.memory);
        let power = self.power_score(device, &evidence, weights.power);
        let cost = self.cost_score(device, &evidence, weights.cost);

        let overall =
            (compute.weighted() + memory.weighted() + power.weighted() + cost.weighted()).clamp(0.0, 100.0);
        let confidence = compute
            .confidence
            .min(memory.confidence)
            .min(power.confidence)
            .min(cost.confidence);

        tracing::debug!(device = %device.id, %workload, overall, confidence, "device rated");

        Ok(EfficiencyRating {
            device_id: device.id.clone(),
            device_name: device.name.clone(),
            workload,
            overall,
            compute,
            memory,
            power,
            cost,
            confidence,
        })
    }

    /// Rate many devices in parallel, skipping invalid ones, ranked.
    pub fn rate_batch(&self, devices: &[DeviceProfile], workload: Workload) -> Vec<EfficiencyRating> {
        let ratings: Vec<EfficiencyRating> = devices
            .par_iter()
            .filter_map(|device| match self.rate(device, workload) {
                Ok(rating) => Some(rating),
                Err(e) => {
                    tracing::warn!(device = %device.id, error = %e, "device skipped in batch rating");
                    None
                }
            })
            .collect();
        Self::rank(ratings)
    }

    /// Sort by overall score descending, then device id.
    pub fn rank(mut ratings: Vec<EfficiencyRating>) -> Vec<EfficiencyRating> {
        ratings.sort_by(|a, b| {
            b.overall
                .partial_cmp(&a.overall)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.device_id.cmp(&b.device_id))
        });
        ratings
    }

    /// Highest-rated device priced at or below `budget_usd`.
    ///
    /// Devices without a known price are not considered.
    pub fn best_within_budget(
        &self,
        devices: &[DeviceProfile],
        workload: Workload,
        budget_usd: f64,
    ) -> Option<EfficiencyRating> {
        let affordable: Vec<DeviceProfile> = devices
            .iter()
            .filter(|d| d.specs.price_usd > 0.0 && d.specs.price_usd <= budget_usd)
            .cloned()
            .collect();
        self.rate_batch(&affordable, workload).into_iter().next()
    }

    /// Rate both devices and compare them.
    pub fn compare(
        &self,
        a: &DeviceProfile,
        b: &DeviceProfile,
        workload: Workload,
    ) -> Result<DeviceComparison> {
        let rating_a = self.rate(a, workload)?;
        let rating_b = self.rate(b, workload)?;
        Ok(compare_ratings(&rating_a, &rating_b))
    }

    /// Pick the sample closest to the reference configuration, or estimate
    /// from the datasheet when the device has none.
    fn evidence<'d>(&self, device: &'d DeviceProfile) -> Evidence<'d> {
        let reference = TargetParams::default();
        let representative = device.benchmarks.iter().max_by(|a, b| {
            match_score(&a.conditions, &reference)
                .partial_cmp(&match_score(&b.conditions, &reference))
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.credibility.partial_cmp(&b.credibility).unwrap_or(Ordering::Equal))
                .then_with(|| b.test_name.cmp(&a.test_name))
        });

        match representative {
            Some(sample) => Evidence {
                throughput: sample.throughput_tokens_per_sec,
                memory_efficiency: Some(sample.memory_efficiency),
                power_efficiency: sample.power_efficiency,
                sample: Some(sample),
            },
            None => {
                let throughput =
                    specification_throughput(device.specs.memory_bandwidth_gbps, &reference);
                Evidence {
                    throughput,
                    memory_efficiency: None,
                    power_efficiency: throughput / device.specs.tdp_watts,
                    sample: None,
                }
            }
        }
    }

    /// Reduce a base confidence for missing or atypical benchmark data.
    fn adjusted_confidence(&self, base: f64, evidence: &Evidence<'_>) -> f64 {
        let Some(sample) = evidence.sample else {
            return base * NO_DATA_FACTOR;
        };
        let mut confidence = base;
        if sample.conditions.model_params_billions > self.config.large_model_threshold_billions {
            confidence *= LARGE_MODEL_FACTOR;
        }
        if sample.conditions.batch_size > self.config.large_batch_threshold {
            confidence *= LARGE_BATCH_FACTOR;
        }
        if !sample.verified {
            confidence *= UNVERIFIED_FACTOR;
        }
        confidence
    }

    fn bandwidth_utilization(&self, device: &DeviceProfile) -> f64 {
        capped_ratio(device.specs.memory_bandwidth_gbps, self.config.reference_bandwidth_gbps)
    }

    fn compute_score(&self, device: &DeviceProfile, evidence: &Evidence<'_>, weight: f64) -> SubScore {
        let throughput = capped_ratio(evidence.throughput, self.config.reference_throughput);
        let tflops = capped_ratio(device.specs.fp16_tflops, self.config.reference_tflops);
        let bandwidth = self.bandwidth_utilization(device);

        let factors = vec![
            ScoreFactor::new("throughput", evidence.throughput, 0.40 * throughput),
            ScoreFactor::new("fp16_tflops", device.specs.fp16_tflops, 0.35 * tflops),
            ScoreFactor::new("bandwidth", device.specs.memory_bandwidth_gbps, 0.25 * bandwidth),
        ];
        SubScore {
            score: (0.40 * throughput + 0.35 * tflops + 0.25 * bandwidth).min(100.0),
            weight,
            confidence: self.adjusted_confidence(COMPUTE_BASE_CONFIDENCE, evidence),
            factors,
        }
    }

    fn memory_score(&self, device: &DeviceProfile, evidence: &Evidence<'_>, weight: f64) -> SubScore {
        let efficiency = evidence.memory_efficiency.unwrap_or(NEUTRAL_SCORE);
        let bandwidth = self.bandwidth_utilization(device);
        let bonus = device.architecture.memory_bonus();

        let factors = vec![
            ScoreFactor::new("memory_efficiency", efficiency, 0.60 * efficiency),
            ScoreFactor::new("bandwidth", device.specs.memory_bandwidth_gbps, 0.40 * bandwidth),
            ScoreFactor::new("architecture", 0.0, bonus),
        ];
        SubScore {
            score: (0.60 * efficiency + 0.40 * bandwidth + bonus).clamp(0.0, 100.0),
            weight,
            confidence: self.adjusted_confidence(MEMORY_BASE_CONFIDENCE, evidence),
            factors,
        }
    }

    fn power_score(&self, device: &DeviceProfile, evidence: &Evidence<'_>, weight: f64) -> SubScore {
        let efficiency = capped_ratio(evidence.power_efficiency, self.config.reference_power_efficiency);
        let excess_watts = (device.specs.tdp_watts - self.config.thermal_baseline_watts).max(0.0);
        let thermal = (100.0 - excess_watts * self.config.thermal_penalty_per_watt).clamp(0.0, 100.0);
        let bonus = device.architecture.power_bonus();

        let factors = vec![
            ScoreFactor::new("power_efficiency", evidence.power_efficiency, 0.70 * efficiency),
            ScoreFactor::new("thermal", device.specs.tdp_watts, 0.30 * thermal),
            ScoreFactor::new("architecture", 0.0, bonus),
        ];
        SubScore {
            score: (0.70 * efficiency + 0.30 * thermal + bonus).clamp(0.0, 100.0),
            weight,
            confidence: self.adjusted_confidence(POWER_BASE_CONFIDENCE, evidence),
            factors,
        }
    }

    fn cost_score(&self, device: &DeviceProfile, evidence: &Evidence<'_>, weight: f64) -> SubScore {
        let price = device.specs.price_usd;
        let mut confidence = self.adjusted_confidence(COST_BASE_CONFIDENCE, evidence);

        let (value, capacity, bracket) = if price > 0.0 {
            let value = capped_ratio(evidence.throughput / price, self.config.reference_throughput_per_dollar);
            let gb_per_kilodollar = device.specs.memory_gb / (price / 1000.0);
            let capacity = capped_ratio(gb_per_kilodollar, self.config.reference_gb_per_kilodollar);
            let bracket = if price < self.config.low_price_usd {
                self.config.low_price_bonus
            } else if price > self.config.high_price_usd {
                -self.config.high_price_penalty
            } else {
                0.0
            };
            (value, capacity, bracket)
        } else {
            confidence *= UNKNOWN_PRICE_FACTOR;
            (NEUTRAL_SCORE, NEUTRAL_SCORE, 0.0)
        };
        let availability = device.availability.cost_adjustment();
        let per_dollar = |v: f64| if price > 0.0 { v / price } else { 0.0 };

        let factors = vec![
            ScoreFactor::new("throughput_per_dollar", per_dollar(evidence.throughput), 0.60 * value),
            ScoreFactor::new("gb_per_dollar", per_dollar(device.specs.memory_gb), 0.40 * capacity),
            ScoreFactor::new("price_bracket", price, bracket),
            ScoreFactor::new("availability", 0.0, availability),
        ];
        SubScore {
            score: (0.60 * value + 0.40 * capacity + bracket + availability).clamp(0.0, 100.0),
            weight,
            confidence,
            factors,
        }
    }
}
