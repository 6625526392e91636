//! Theoretical vs practical utilization.

use super::config::UtilizationConfig;
use super::multi_device::{calculate_multi_device_efficiency, MultiDeviceResult};
use super::result::{EfficiencyBand, UtilizationResult, DISPLAY_PERCENT_MAX, DISPLAY_RATIO_MAX};
use crate::error::{require_non_negative, require_positive, Result};
use crate::units::BYTES_PER_GB;
use serde::{Deserialize, Serialize};

/// Practical utilization below which the device is considered oversized.
pub const UNDERUSED_THRESHOLD: f64 = 0.50;
/// Practical utilization above which the device is considered too tight.
pub const TIGHT_THRESHOLD: f64 = 0.95;

/// Compute utilization of `capacity_bytes` by `needed_bytes`.
///
/// `theoretical = needed / capacity` exactly. `practical` adds fragmentation
/// to the need and removes reserved memory and driver overhead from the
/// capacity; it is `+inf` when nothing is left after reservations.
pub fn calculate_utilization(
    needed_bytes: f64,
    capacity_bytes: f64,
    config: &UtilizationConfig,
) -> Result<UtilizationResult> {
    let needed = require_non_negative("needed_bytes", needed_bytes)?;
    let capacity = require_positive("capacity_bytes", capacity_bytes)?;
    config.validate()?;

    let theoretical = needed / capacity;

    let available = (capacity - config.reserved_bytes()).max(0.0);
    let fragmentation = needed * config.fragmentation_factor;
    let total_needed = needed + fragmentation;

    let practical = if available > 0.0 { total_needed / available } else { f64::INFINITY };

    Ok(UtilizationResult {
        needed_bytes: needed,
        capacity_bytes: capacity,
        available_bytes: available,
        fragmentation_bytes: fragmentation,
        theoretical,
        practical,
        display_theoretical: theoretical.clamp(0.0, DISPLAY_RATIO_MAX),
        display_practical: practical.clamp(0.0, DISPLAY_RATIO_MAX),
        utilization_percentage: (practical * 100.0).clamp(0.0, DISPLAY_PERCENT_MAX),
        is_over_capacity: practical > 1.0,
        band: EfficiencyBand::from_practical(practical),
    })
}

/// Utilization at GB granularity with an additional safety margin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyMarginAnalysis {
    /// Requested memory in GB
    pub needed_gb: f64,
    /// Raw capacity in GB
    pub capacity_gb: f64,
    /// Reserved + driver overhead in GB
    pub reserved_gb: f64,
    /// Capacity held back as safety margin in GB
    pub safety_gb: f64,
    /// Capacity left after reservations and safety margin
    pub available_gb: f64,
    /// Fragmentation in GB
    pub fragmentation_gb: f64,
    /// Need plus fragmentation
    pub total_needed_gb: f64,
    /// `total_needed / available` (`+inf` if nothing is available)
    pub utilization: f64,
    /// Band of `utilization`
    pub band: EfficiencyBand,
    /// Whether the need fits inside the safe capacity
    pub fits: bool,
    /// Advisory score, 100 inside the 70-85% band and decaying outward
    pub score: f64,
    /// Sizing advice
    pub recommendations: Vec<String>,
}

/// Utilization with a safety margin subtracted from available memory.
pub fn calculate_with_safety_margin(
    needed_gb: f64,
    capacity_gb: f64,
    config: &UtilizationConfig,
) -> Result<SafetyMarginAnalysis> {
    let needed = require_non_negative("needed_gb", needed_gb)?;
    let capacity = require_positive("capacity_gb", capacity_gb)?;
    config.validate()?;

    let reserved = config.reserved_gb();
    let safety = capacity * config.safety_margin;
    let available = (capacity - reserved - safety).max(0.0);
    let fragmentation = needed * config.fragmentation_factor;
    let total_needed = needed + fragmentation;
    let utilization = if available > 0.0 { total_needed / available } else { f64::INFINITY };

    let mut recommendations = Vec::new();
    if utilization < UNDERUSED_THRESHOLD {
        recommendations.push(format!(
            "Only {:.0}% of safe capacity used: consider a smaller device or a larger batch size",
            utilization * 100.0
        ));
    }
    if utilization > TIGHT_THRESHOLD {
        recommendations.push(
            "Utilization above 95% of safe capacity: consider a larger device or a multi-device setup"
                .to_string(),
        );
    }
    if utilization > 1.0 {
        recommendations.push(format!(
            "Requirement exceeds safe capacity by {:.1} GB",
            total_needed - available
        ));
    }

    Ok(SafetyMarginAnalysis {
        needed_gb: needed,
        capacity_gb: capacity,
        reserved_gb: reserved,
        safety_gb: safety,
        available_gb: available,
        fragmentation_gb: fragmentation,
        total_needed_gb: total_needed,
        utilization,
        band: EfficiencyBand::from_practical(utilization),
        fits: utilization <= 1.0,
        score: advisory_score(utilization),
        recommendations,
    })
}

/// 100 inside [0.70, 0.85], linear decay to 0 at 0.20 and at 1.10.
pub fn advisory_score(utilization: f64) -> f64 {
    if !utilization.is_finite() || utilization < 0.0 {
        return 0.0;
    }
    let score = if utilization < 0.70 {
        100.0 - (0.70 - utilization) * 200.0
    } else if utilization <= 0.85 {
        100.0
    } else {
        100.0 - (utilization - 0.85) * 400.0
    };
    score.clamp(0.0, 100.0)
}

/// Stateless calculator bound to one overhead model.
#[derive(Debug, Clone, Default)]
pub struct UtilizationCalculator {
    config: UtilizationConfig,
}

impl UtilizationCalculator {
    /// Create a calculator, validating the config.
    pub fn new(config: UtilizationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The overhead model.
    pub fn config(&self) -> &UtilizationConfig {
        &self.config
    }

    /// See [`calculate_utilization`].
    pub fn calculate(&self, needed_bytes: f64, capacity_bytes: f64) -> Result<UtilizationResult> {
        calculate_utilization(needed_bytes, capacity_bytes, &self.config)
    }

    /// [`calculate_utilization`] with inputs in GB.
    pub fn calculate_gb(&self, needed_gb: f64, capacity_gb: f64) -> Result<UtilizationResult> {
        let needed = require_non_negative("needed_gb", needed_gb)?;
        let capacity = require_positive("capacity_gb", capacity_gb)?;
        self.calculate(needed * BYTES_PER_GB, capacity * BYTES_PER_GB)
    }

    /// See [`calculate_with_safety_margin`].
    pub fn with_safety_margin(&self, needed_gb: f64, capacity_gb: f64) -> Result<SafetyMarginAnalysis> {
        calculate_with_safety_margin(needed_gb, capacity_gb, &self.config)
    }

    /// See [`calculate_multi_device_efficiency`].
    pub fn multi_device(
        &self,
        needed_gb: f64,
        per_device_gb: f64,
        device_count: u32,
    ) -> Result<MultiDeviceResult> {
        calculate_multi_device_efficiency(needed_gb, per_device_gb, device_count, &self.config)
    }
}
