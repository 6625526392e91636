//! Placeholders substituted for results that fail validation.

use crate::benchmark::{PerformancePrediction, PredictionMethod, TargetParams, MIN_CONFIDENCE};
use crate::breakdown::calculator::description_for;
use crate::breakdown::{color_for, BreakdownEntry, MemoryBreakdown, UNAVAILABLE_LABEL};
use crate::rating::{EfficiencyRating, RatingWeights, SubScore};
use crate::utilization::{EfficiencyBand, UtilizationResult};
use crate::workload::Workload;

/// Raw inputs are kept when usable, otherwise zeroed.
fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        0.0
    }
}

/// Builds well-formed, clearly marked placeholder results.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackProvider;

impl FallbackProvider {
    /// Zeroed utilization in the poor band.
    pub fn utilization(needed_bytes: f64, capacity_bytes: f64) -> UtilizationResult {
        UtilizationResult {
            needed_bytes: sanitize(needed_bytes),
            capacity_bytes: sanitize(capacity_bytes),
            available_bytes: 0.0,
            fragmentation_bytes: 0.0,
            theoretical: 0.0,
            practical: 0.0,
            display_theoretical: 0.0,
            display_practical: 0.0,
            utilization_percentage: 0.0,
            is_over_capacity: false,
            band: EfficiencyBand::Poor,
        }
    }

    /// A single "Unavailable" bucket holding the whole total.
    pub fn breakdown(total_bytes: f64) -> MemoryBreakdown {
        let total = sanitize(total_bytes);
        MemoryBreakdown {
            entries: vec![BreakdownEntry {
                label: UNAVAILABLE_LABEL.to_string(),
                bytes: total,
                percentage: 100.0,
                color: color_for(UNAVAILABLE_LABEL, 0),
                description: description_for(UNAVAILABLE_LABEL).to_string(),
            }],
            total_bytes: total,
        }
    }

    /// Zero scores at minimum confidence.
    pub fn rating(device_id: &str, device_name: &str, workload: Workload) -> EfficiencyRating {
        let weights = RatingWeights::preset(workload);
        let zero = |weight: f64| SubScore { score: 0.0, weight, confidence: MIN_CONFIDENCE, factors: Vec::new() };
        EfficiencyRating {
            device_id: device_id.to_string(),
            device_name: device_name.to_string(),
            workload,
            overall: 0.0,
            compute: zero(weights.compute),
            memory: zero(weights.memory),
            power: zero(weights.power),
            cost: zero(weights.cost),
            confidence: MIN_CONFIDENCE,
        }
    }

    /// No throughput at minimum confidence.
    pub fn prediction(device_id: &str, target: &TargetParams) -> PerformancePrediction {
        PerformancePrediction {
            device_id: device_id.to_string(),
            target: *target,
            throughput_tokens_per_sec: 0.0,
            memory_efficiency: 0.0,
            power_efficiency: 0.0,
            confidence: MIN_CONFIDENCE,
            method: PredictionMethod::SpecificationBased,
            based_on: None,
            match_score: 0.0,
            sample_count: 0,
            limitations: vec!["Prediction unavailable: the computed result failed validation".to_string()],
        }
    }
}
