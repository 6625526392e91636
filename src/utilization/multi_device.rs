//! Multi-device scaling with communication overhead and load imbalance.

use super::config::UtilizationConfig;
use super::result::UtilizationRange;
use crate::error::{require_non_negative, require_positive, Error, Result};
use serde::{Deserialize, Serialize};

/// Combined overhead + imbalance loss above which one device is dropped.
pub const CONSOLIDATION_THRESHOLD: f64 = 0.3;

/// Share of aggregate capacity usable after load imbalance.
pub fn load_balancing_efficiency(device_count: u32) -> f64 {
    match device_count {
        0 | 1 => 1.00,
        2 => 0.95,
        3..=4 => 0.90,
        5..=8 => 0.85,
        _ => 0.80,
    }
}

/// Scaling characteristics of `device_count` identical devices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiDeviceResult {
    /// Requested memory in GB
    pub needed_gb: f64,
    /// Capacity of one device in GB
    pub per_device_gb: f64,
    /// Number of devices evaluated
    pub device_count: u32,
    /// `per_device × count`
    pub total_capacity_gb: f64,
    /// Capacity lost to communication buffers
    pub communication_overhead_gb: f64,
    /// Total capacity minus communication overhead
    pub effective_capacity_gb: f64,
    /// Step function of device count (1.00 … 0.80)
    pub load_balancing_efficiency: f64,
    /// `effective × load_balancing / per_device`
    pub scaling_factor: f64,
    /// `effective × load_balancing`
    pub usable_capacity_gb: f64,
    /// Whether `needed <= usable`
    pub fits: bool,
    /// Suggested device count for the requirement
    pub optimal_device_count: u32,
    /// Per-device utilization band
    pub per_device_utilization: UtilizationRange,
}

/// Evaluate `device_count` devices of `per_device_gb` each.
pub fn calculate_multi_device_efficiency(
    needed_gb: f64,
    per_device_gb: f64,
    device_count: u32,
    config: &UtilizationConfig,
) -> Result<MultiDeviceResult> {
    let needed = require_non_negative("needed_gb", needed_gb)?;
    let per_device = require_positive("per_device_gb", per_device_gb)?;
    if device_count == 0 {
        return Err(Error::invalid("device_count", "must be >= 1"));
    }
    config.validate()?;

    let count = f64::from(device_count);
    let total = per_device * count;
    let communication_overhead = total * config.communication_overhead;
    let effective = total - communication_overhead;
    let balance = load_balancing_efficiency(device_count);
    let usable = effective * balance;

    let expected = if effective > 0.0 { needed / effective } else { f64::INFINITY };

    Ok(MultiDeviceResult {
        needed_gb: needed,
        per_device_gb: per_device,
        device_count,
        total_capacity_gb: total,
        communication_overhead_gb: communication_overhead,
        effective_capacity_gb: effective,
        load_balancing_efficiency: balance,
        scaling_factor: usable / per_device,
        usable_capacity_gb: usable,
        fits: needed <= usable,
        optimal_device_count: optimal_device_count(needed, per_device, config),
        per_device_utilization: UtilizationRange::around(expected, 1.0 - balance),
    })
}

/// `ceil(needed / per_device)`, minus one device when the combined
/// communication and imbalance loss exceeds 30% (never below 2).
pub fn optimal_device_count(needed_gb: f64, per_device_gb: f64, config: &UtilizationConfig) -> u32 {
    if per_device_gb <= 0.0 || !needed_gb.is_finite() {
        return 1;
    }
    let base = ((needed_gb / per_device_gb).ceil() as u32).max(1);
    let loss = config.communication_overhead + (1.0 - load_balancing_efficiency(base));
    if loss > CONSOLIDATION_THRESHOLD && base > 2 {
        (base - 1).max(2)
    } else {
        base
    }
}

/// Smallest device count in `1..=max_devices` whose usable capacity holds
/// `needed_gb`, or `None` if even `max_devices` is not enough.
pub fn minimum_fitting_devices(
    needed_gb: f64,
    per_device_gb: f64,
    max_devices: u32,
    config: &UtilizationConfig,
) -> Result<Option<MultiDeviceResult>> {
    for count in 1..=max_devices.max(1) {
        let result = calculate_multi_device_efficiency(needed_gb, per_device_gb, count, config)?;
        if result.fits {
            return Ok(Some(result));
        }
    }
    Ok(None)
}
