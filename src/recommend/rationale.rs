//! Human-readable reasons attached to each recommendation.

use crate::benchmark::PerformancePrediction;
use crate::rating::EfficiencyRating;
use crate::utilization::{MultiDeviceResult, UtilizationResult};

pub(super) fn suitability(
    suitable: bool,
    device_count: u32,
    multi: Option<&MultiDeviceResult>,
    max_devices: u32,
) -> String {
    match (suitable, multi) {
        (false, _) => format!("Does not fit even across {max_devices} devices"),
        (true, Some(m)) => format!(
            "Needs {} devices: {:.1} GB usable after {:.1} GB communication overhead",
            device_count, m.usable_capacity_gb, m.communication_overhead_gb
        ),
        (true, None) => "Fits on a single device".to_string(),
    }
}

pub(super) fn utilization(result: &UtilizationResult, multi: Option<&MultiDeviceResult>) -> String {
    match multi {
        Some(m) => {
            let range = m.per_device_utilization;
            format!(
                "Per-device utilization {:.0}% expected ({:.0}-{:.0}%)",
                range.expected * 100.0,
                range.min * 100.0,
                range.max * 100.0
            )
        }
        None => format!(
            "{} utilization: {:.1}% of usable memory",
            capitalize(result.band.as_str()),
            result.utilization_percentage
        ),
    }
}

pub(super) fn performance(prediction: &PerformancePrediction, device_count: u32) -> String {
    let mut line = format!(
        "Predicted {:.0} tokens/s per device ({}, confidence {:.2})",
        prediction.throughput_tokens_per_sec, prediction.method, prediction.confidence
    );
    if device_count > 1 {
        let aggregate = prediction.throughput_tokens_per_sec * f64::from(device_count);
        line.push_str(&format!(", {aggregate:.0} tokens/s aggregate before scaling losses"));
    }
    line
}

pub(super) fn cost(prediction: &PerformancePrediction, price_usd: f64, total_cost_usd: f64) -> String {
    if price_usd <= 0.0 {
        return "Price unknown, cost-effectiveness not assessed".to_string();
    }
    format!(
        "${:.0} total, {:.1} tokens/s per $1000",
        total_cost_usd,
        prediction.throughput_tokens_per_sec / price_usd * 1000.0
    )
}

pub(super) fn strength(rating: &EfficiencyRating) -> String {
    let dimension = rating.strongest();
    format!(
        "Rated {:.0}/100 for {}, strongest on {} ({:.0})",
        rating.overall,
        rating.workload,
        dimension,
        rating.sub_score(dimension).score
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
