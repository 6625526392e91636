//! Utilization result types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound for displayed utilization ratios.
pub const DISPLAY_RATIO_MAX: f64 = 10.0;
/// Upper bound for displayed utilization percentages.
pub const DISPLAY_PERCENT_MAX: f64 = 1000.0;

/// Qualitative utilization band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EfficiencyBand {
    /// 70-85% practical utilization
    Excellent,
    /// 50-95% outside the excellent band
    Good,
    /// 30-100% outside the bands above
    Fair,
    /// Everything else, including over capacity and non-finite values
    Poor,
}

impl EfficiencyBand {
    /// Classify a practical utilization ratio. Boundaries are inclusive.
    pub fn from_practical(practical: f64) -> Self {
        if !practical.is_finite() || practical < 0.0 {
            return Self::Poor;
        }
        if (0.70..=0.85).contains(&practical) {
            Self::Excellent
        } else if (0.50..=0.95).contains(&practical) {
            Self::Good
        } else if (0.30..=1.00).contains(&practical) {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    /// Lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

impl fmt::Display for EfficiencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Utilization of one device by one requirement.
///
/// `theoretical` and `practical` are the raw ratios (practical may be
/// `+inf` when nothing is left after reservations); the `display_*` fields
/// are the same values clamped for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationResult {
    /// Bytes needed by the workload
    pub needed_bytes: f64,
    /// Raw device capacity in bytes
    pub capacity_bytes: f64,
    /// Capacity left after reserved memory and driver overhead
    pub available_bytes: f64,
    /// Bytes assumed lost to fragmentation
    pub fragmentation_bytes: f64,
    /// `needed / capacity`
    pub theoretical: f64,
    /// `(needed + fragmentation) / available`
    pub practical: f64,
    /// `theoretical` clamped to [0, 10]
    pub display_theoretical: f64,
    /// `practical` clamped to [0, 10]
    pub display_practical: f64,
    /// `practical × 100` clamped to [0, 1000]
    pub utilization_percentage: f64,
    /// `practical > 1`
    pub is_over_capacity: bool,
    /// Band of `practical`
    pub band: EfficiencyBand,
}

impl UtilizationResult {
    /// Whether the requirement fits on the device.
    pub fn fits(&self) -> bool {
        !self.is_over_capacity
    }

    /// Bytes still free after the requirement and fragmentation.
    pub fn headroom_bytes(&self) -> f64 {
        (self.available_bytes - self.needed_bytes - self.fragmentation_bytes).max(0.0)
    }
}

/// Percentage-only result shape kept for older consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyUtilization {
    /// Utilization percentage (0-1000)
    pub utilization: f64,
    /// Whether the requirement exceeds the device
    pub over_capacity: bool,
    /// Band label
    pub efficiency: String,
}

impl From<&UtilizationResult> for LegacyUtilization {
    fn from(result: &UtilizationResult) -> Self {
        Self {
            utilization: result.utilization_percentage,
            over_capacity: result.is_over_capacity,
            efficiency: result.band.to_string(),
        }
    }
}

/// Deterministic min / expected / max utilization band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtilizationRange {
    /// Best case (least loaded device)
    pub min: f64,
    /// Expected per-device utilization
    pub expected: f64,
    /// Worst case (most loaded device)
    pub max: f64,
}

impl UtilizationRange {
    /// Band of width `spread` around `expected`, floored at zero.
    pub fn around(expected: f64, spread: f64) -> Self {
        Self {
            min: (expected * (1.0 - spread)).max(0.0),
            expected,
            max: expected * (1.0 + spread),
        }
    }

    /// Whether `value` lies inside the band.
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}
