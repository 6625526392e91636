//! Benchmark normalization and performance prediction.

use super::config::BenchmarkConfig;
use super::matching::{match_score, TargetParams};
use super::types::{
    ConfidenceInterval, NormalizedBenchmark, PerformancePrediction, PredictionMethod,
    RelativePerformance, MIN_CONFIDENCE,
};
use crate::catalog::{BenchmarkSample, DeviceCatalog, DeviceProfile};
use crate::error::Result;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Upper bound of the normalized scale.
pub const MAX_NORMALIZED_SCORE: f64 = 200.0;
/// Throughput exponent on the model-size ratio.
pub const SIZE_EXPONENT: f64 = 0.8;
/// Throughput exponent on the batch ratio.
pub const BATCH_EXPONENT: f64 = 0.6;
/// Memory-efficiency exponent on the model-size ratio.
pub const MEMORY_EFFICIENCY_EXPONENT: f64 = 0.2;
/// Share of relative throughput change carried into power efficiency.
pub const POWER_TRACKING: f64 = 0.9;
/// Share of peak bandwidth a decoder achieves in practice.
const BANDWIDTH_EFFICIENCY: f64 = 0.6;
/// Memory efficiency assumed without measurements.
const ASSUMED_MEMORY_EFFICIENCY: f64 = 60.0;

/// Tokens/s a bandwidth-bound decoder reaches on datasheet bandwidth.
///
/// Each token streams all weights once: `bandwidth / (params × bytes)`,
/// derated to 60% and scaled by `batch^0.6`.
pub fn specification_throughput(bandwidth_gbps: f64, target: &TargetParams) -> f64 {
    let model_gb = target.model_params_billions * target.precision.bytes_per_param();
    if model_gb <= 0.0 {
        return 0.0;
    }
    bandwidth_gbps / model_gb * BANDWIDTH_EFFICIENCY * f64::from(target.batch_size).powf(BATCH_EXPONENT)
}

struct ScaledSample {
    throughput: f64,
    memory_efficiency: f64,
    power_efficiency: f64,
}

/// Normalizes samples and predicts performance from a catalog.
#[derive(Debug, Clone)]
pub struct BenchmarkProcessor<'a> {
    catalog: &'a DeviceCatalog,
    config: BenchmarkConfig,
    reference_time: DateTime<Utc>,
}

impl<'a> BenchmarkProcessor<'a> {
    /// Processor evaluating freshness against the current time.
    pub fn new(catalog: &'a DeviceCatalog, config: BenchmarkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { catalog, config, reference_time: Utc::now() })
    }

    /// Processor with default constants.
    pub fn with_defaults(catalog: &'a DeviceCatalog) -> Self {
        Self { catalog, config: BenchmarkConfig::default(), reference_time: Utc::now() }
    }

    /// Evaluate freshness against a fixed instant.
    pub fn at(mut self, reference_time: DateTime<Utc>) -> Self {
        self.reference_time = reference_time;
        self
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    pub fn catalog(&self) -> &'a DeviceCatalog {
        self.catalog
    }

    /// Linear decay from 1 (now) to 0 at the freshness window.
    pub fn freshness(&self, sample: &BenchmarkSample) -> f64 {
        let age = sample.age_days(self.reference_time);
        (1.0 - age / self.config.freshness_window_days).clamp(0.0, 1.0)
    }

    /// `0.3 × freshness + 0.4 × credibility + 0.3 × verified`.
    pub fn data_quality(&self, sample: &BenchmarkSample) -> f64 {
        let verified = if sample.verified { 1.0 } else { 0.0 };
        (0.3 * self.freshness(sample) + 0.4 * sample.credibility + 0.3 * verified).clamp(0.0, 1.0)
    }

    /// Throughput relative to the reference plus memory- and power-efficiency
    /// bonuses, clamped to [0, 200].
    pub fn normalized_score(&self, sample: &BenchmarkSample) -> f64 {
        let throughput = 100.0 * sample.throughput_tokens_per_sec / self.config.reference_throughput;
        let memory_bonus = (sample.memory_efficiency - 50.0) * 0.2;
        let power_bonus =
            10.0 * (1.0 + sample.power_efficiency / self.config.reference_power_efficiency).ln();
        (throughput + memory_bonus + power_bonus).clamp(0.0, MAX_NORMALIZED_SCORE)
    }

    /// Put samples on a common scale.
    pub fn normalize<'s>(
        &self,
        samples: impl IntoIterator<Item = &'s BenchmarkSample>,
    ) -> Vec<NormalizedBenchmark> {
        let reference = TargetParams::default();
        samples
            .into_iter()
            .map(|sample| {
                let score = self.normalized_score(sample);
                let quality = self.data_quality(sample);
                let margin = score * (0.05 + 0.25 * (1.0 - quality));
                NormalizedBenchmark {
                    test_name: sample.test_name.clone(),
                    device_id: sample.device_id.clone(),
                    normalized_score: score,
                    confidence_interval: ConfidenceInterval {
                        lower: (score - margin).max(0.0),
                        upper: (score + margin).min(MAX_NORMALIZED_SCORE),
                    },
                    data_quality: quality,
                    source_credibility: sample.credibility,
                    applicability_score: match_score(&sample.conditions, &reference),
                }
            })
            .collect()
    }

    /// Predict performance of `device_id` for `target`.
    ///
    /// A sample matching at least `min_match_score` is interpolated. Below
    /// that the closest sample is still scaled, but reported as a
    /// specification-based estimate capped at `fallback_confidence`. Datasheet
    /// bandwidth is used only for devices with no samples at all. Only an
    /// invalid target is an error.
    pub fn predict_performance(&self, device_id: &str, target: &TargetParams) -> Result<PerformancePrediction> {
        target.validate()?;

        let Ok(device) = self.catalog.device(device_id) else {
            tracing::debug!(device_id, "prediction for device missing from catalog");
            return Ok(self.unknown_device_estimate(device_id, target));
        };

        let mut candidates: Vec<(&BenchmarkSample, f64, f64)> = self
            .catalog
            .samples_for(device_id)
            .into_iter()
            .map(|s| (s, match_score(&s.conditions, target), self.data_quality(s)))
            .collect();

        candidates.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.2.partial_cmp(&a.2).unwrap_or(Ordering::Equal))
                .then_with(|| a.0.test_name.cmp(&b.0.test_name))
        });

        let Some(&(best, score, quality)) = candidates.first() else {
            tracing::debug!(device_id, "no benchmark samples, using datasheet estimate");
            return Ok(self.specification_estimate(device, target));
        };

        let matching = candidates
            .iter()
            .filter(|(_, s, _)| *s >= self.config.min_match_score)
            .count();
        if matching == 0 {
            tracing::debug!(device_id, score, "no matching benchmark, scaling closest sample");
            return Ok(self.scaled_estimate(best, score, quality, target));
        }

        Ok(self.interpolate(best, score, quality, matching, target))
    }

    /// Size and batch scaling of a measured sample onto `target`.
    fn scale(base: &BenchmarkSample, target: &TargetParams) -> ScaledSample {
        let conditions = &base.conditions;
        let size_ratio = conditions.model_params_billions / target.model_params_billions;
        let batch_ratio = f64::from(target.batch_size) / f64::from(conditions.batch_size);
        let throughput_scale = size_ratio.powf(SIZE_EXPONENT) * batch_ratio.powf(BATCH_EXPONENT);

        ScaledSample {
            throughput: base.throughput_tokens_per_sec * throughput_scale,
            memory_efficiency: (base.memory_efficiency * size_ratio.powf(MEMORY_EFFICIENCY_EXPONENT))
                .clamp(0.0, 100.0),
            power_efficiency: (base.power_efficiency * (1.0 + POWER_TRACKING * (throughput_scale - 1.0)))
                .max(0.0),
        }
    }

    fn interpolate(
        &self,
        base: &BenchmarkSample,
        score: f64,
        quality: f64,
        sample_count: usize,
        target: &TargetParams,
    ) -> PerformancePrediction {
        let scaled = Self::scale(base, target);
        let coverage = (sample_count as f64 / 3.0).min(1.0);
        let confidence = (score * quality * coverage).clamp(0.0, 1.0);

        let mut limitations = Vec::new();
        if sample_count < 2 {
            limitations.push(format!(
                "Only {sample_count} benchmark sample matches this configuration"
            ));
        }
        limitations.extend(self.condition_limitations(base, target));

        PerformancePrediction {
            device_id: base.device_id.clone(),
            target: *target,
            throughput_tokens_per_sec: scaled.throughput,
            memory_efficiency: scaled.memory_efficiency,
            power_efficiency: scaled.power_efficiency,
            confidence,
            method: PredictionMethod::Interpolated,
            based_on: Some(base.test_name.clone()),
            match_score: score,
            sample_count,
            limitations,
        }
    }

    /// Estimate from a sample too far from `target` to count as a match.
    fn scaled_estimate(
        &self,
        base: &BenchmarkSample,
        score: f64,
        quality: f64,
        target: &TargetParams,
    ) -> PerformancePrediction {
        let scaled = Self::scale(base, target);
        let mut limitations = vec![
            "Insufficient benchmark data: no sample matches this configuration".to_string(),
            format!("Extrapolated from the closest sample '{}'", base.test_name),
        ];
        limitations.extend(self.condition_limitations(base, target));

        PerformancePrediction {
            device_id: base.device_id.clone(),
            target: *target,
            throughput_tokens_per_sec: scaled.throughput,
            memory_efficiency: scaled.memory_efficiency,
            power_efficiency: scaled.power_efficiency,
            confidence: (score * quality).min(self.config.fallback_confidence),
            method: PredictionMethod::SpecificationBased,
            based_on: Some(base.test_name.clone()),
            match_score: score,
            sample_count: 0,
            limitations,
        }
    }

    fn condition_limitations(&self, base: &BenchmarkSample, target: &TargetParams) -> Vec<String> {
        let conditions = &base.conditions;
        let mut limitations = Vec::new();
        let size_mismatch = (target.model_params_billions - conditions.model_params_billions).abs()
            / conditions.model_params_billions;
        if size_mismatch > 0.5 {
            limitations.push(format!(
                "Scaled from a {:.0}B model to {:.0}B ({:.0}% size difference)",
                conditions.model_params_billions,
                target.model_params_billions,
                size_mismatch * 100.0
            ));
        }
        if conditions.batch_size != target.batch_size {
            limitations.push(format!(
                "Measured at batch size {}, target is {}",
                conditions.batch_size, target.batch_size
            ));
        }
        if conditions.precision != target.precision {
            limitations.push(format!(
                "Measured at {} precision, target is {}",
                conditions.precision, target.precision
            ));
        }
        let age = base.age_days(self.reference_time);
        if age > self.config.stale_after_days {
            limitations.push(format!("Source data is {age:.0} days old"));
        }
        limitations
    }

    fn specification_estimate(&self, device: &DeviceProfile, target: &TargetParams) -> PerformancePrediction {
        let throughput = specification_throughput(device.specs.memory_bandwidth_gbps, target);
        PerformancePrediction {
            device_id: device.id.clone(),
            target: *target,
            throughput_tokens_per_sec: throughput,
            memory_efficiency: ASSUMED_MEMORY_EFFICIENCY,
            power_efficiency: throughput / device.specs.tdp_watts,
            confidence: self.config.fallback_confidence,
            method: PredictionMethod::SpecificationBased,
            based_on: None,
            match_score: 0.0,
            sample_count: 0,
            limitations: vec![
                "Insufficient benchmark data: no sample matches this configuration".to_string(),
                "Estimated from datasheet memory bandwidth".to_string(),
            ],
        }
    }

    fn unknown_device_estimate(&self, device_id: &str, target: &TargetParams) -> PerformancePrediction {
        PerformancePrediction {
            device_id: device_id.to_string(),
            target: *target,
            throughput_tokens_per_sec: specification_throughput(self.config.fallback_bandwidth_gbps, target),
            memory_efficiency: ASSUMED_MEMORY_EFFICIENCY,
            power_efficiency: 0.0,
            confidence: MIN_CONFIDENCE,
            method: PredictionMethod::SpecificationBased,
            based_on: None,
            match_score: 0.0,
            sample_count: 0,
            limitations: vec![
                format!("Device '{device_id}' is not in the catalog"),
                "Insufficient benchmark data: no samples available".to_string(),
                format!(
                    "Estimated from a nominal {:.0} GB/s memory bandwidth",
                    self.config.fallback_bandwidth_gbps
                ),
            ],
        }
    }

    /// Throughput of `target_id` relative to `reference_id` for `params`.
    ///
    /// Returns the neutral result (score 50, ratio 0.5, confidence 0.1) when
    /// either device lacks matching samples.
    pub fn calculate_relative_performance(
        &self,
        target_id: &str,
        reference_id: &str,
        params: &TargetParams,
    ) -> Result<RelativePerformance> {
        let target = self.predict_performance(target_id, params)?;
        let reference = self.predict_performance(reference_id, params)?;

        for prediction in [&target, &reference] {
            if prediction.is_fallback() {
                return Ok(RelativePerformance::neutral(
                    target_id,
                    reference_id,
                    format!("No matching benchmark data for '{}'", prediction.device_id),
                ));
            }
        }
        if reference.throughput_tokens_per_sec <= 0.0 {
            return Ok(RelativePerformance::neutral(
                target_id,
                reference_id,
                format!("Reference throughput for '{reference_id}' is zero"),
            ));
        }

        let ratio = target.throughput_tokens_per_sec / reference.throughput_tokens_per_sec;
        let mut limitations = target.limitations;
        limitations.extend(reference.limitations);
        Ok(RelativePerformance {
            target_id: target_id.to_string(),
            reference_id: reference_id.to_string(),
            ratio,
            score: (50.0 * ratio).min(100.0),
            confidence: target.confidence.min(reference.confidence).max(MIN_CONFIDENCE),
            has_data: true,
            limitations,
        })
    }
}
