//! Overheads applied when turning raw capacity into usable capacity.

use crate::error::{require_fraction, require_non_negative, Result};
use crate::units::BYTES_PER_GB;
use serde::{Deserialize, Serialize};

/// Immutable overhead model for a single calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtilizationConfig {
    /// Fraction of needed memory lost to allocator fragmentation
    pub fragmentation_factor: f64,
    /// Memory held back by the OS / display / runtime, in GB
    pub system_reserved_gb: f64,
    /// CUDA/ROCm context and driver overhead, in GB
    pub driver_overhead_gb: f64,
    /// Fraction of capacity kept free as a safety margin
    pub safety_margin: f64,
    /// Fraction of aggregate capacity lost to inter-device communication buffers
    pub communication_overhead: f64,
}

impl Default for UtilizationConfig {
    fn default() -> Self {
        Self {
            fragmentation_factor: 0.10,
            system_reserved_gb: 0.5,
            driver_overhead_gb: 0.3,
            safety_margin: 0.10,
            communication_overhead: 0.05,
        }
    }
}

impl UtilizationConfig {
    /// Config with no overheads at all.
    pub fn zero() -> Self {
        Self {
            fragmentation_factor: 0.0,
            system_reserved_gb: 0.0,
            driver_overhead_gb: 0.0,
            safety_margin: 0.0,
            communication_overhead: 0.0,
        }
    }

    /// Set fragmentation factor
    pub fn with_fragmentation_factor(mut self, factor: f64) -> Self {
        self.fragmentation_factor = factor;
        self
    }

    /// Set reserved system memory
    pub fn with_system_reserved_gb(mut self, gb: f64) -> Self {
        self.system_reserved_gb = gb;
        self
    }

    /// Set driver overhead
    pub fn with_driver_overhead_gb(mut self, gb: f64) -> Self {
        self.driver_overhead_gb = gb;
        self
    }

    /// Set safety margin
    pub fn with_safety_margin(mut self, margin: f64) -> Self {
        self.safety_margin = margin;
        self
    }

    /// Set communication overhead fraction
    pub fn with_communication_overhead(mut self, fraction: f64) -> Self {
        self.communication_overhead = fraction;
        self
    }

    /// Reserved plus driver overhead, in GB.
    pub fn reserved_gb(&self) -> f64 {
        self.system_reserved_gb + self.driver_overhead_gb
    }

    /// Reserved plus driver overhead, in bytes.
    pub fn reserved_bytes(&self) -> f64 {
        self.reserved_gb() * BYTES_PER_GB
    }

    /// Check every field is in range.
    pub fn validate(&self) -> Result<()> {
        require_fraction("fragmentation_factor", self.fragmentation_factor)?;
        require_non_negative("system_reserved_gb", self.system_reserved_gb)?;
        require_non_negative("driver_overhead_gb", self.driver_overhead_gb)?;
        require_fraction("safety_margin", self.safety_margin)?;
        require_fraction("communication_overhead", self.communication_overhead)?;
        Ok(())
    }
}
