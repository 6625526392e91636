//! Accelerator device profiles.

use super::sample::BenchmarkSample;
use crate::error::{require_non_negative, require_positive, Error, Result};
use crate::units::BYTES_PER_GB;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hardware generation family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Architecture {
    Blackwell,
    Hopper,
    AdaLovelace,
    Ampere,
    Turing,
    Cdna3,
    Cdna2,
    Rdna3,
    AppleSilicon,
    #[default]
    Other,
}

impl Architecture {
    /// Rating bonus for memory subsystem generation.
    pub fn memory_bonus(&self) -> f64 {
        match self {
            Self::Blackwell | Self::Hopper | Self::Cdna3 => 5.0,
            Self::AdaLovelace | Self::Cdna2 | Self::AppleSilicon => 3.0,
            Self::Ampere | Self::Rdna3 => 2.0,
            Self::Turing | Self::Other => 0.0,
        }
    }

    /// Rating bonus for power-management features.
    pub fn power_bonus(&self) -> f64 {
        match self {
            Self::AppleSilicon => 8.0,
            Self::Blackwell | Self::Hopper | Self::AdaLovelace => 5.0,
            Self::Ampere | Self::Cdna3 => 3.0,
            Self::Cdna2 | Self::Rdna3 | Self::Turing | Self::Other => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blackwell => "blackwell",
            Self::Hopper => "hopper",
            Self::AdaLovelace => "ada_lovelace",
            Self::Ampere => "ampere",
            Self::Turing => "turing",
            Self::Cdna3 => "cdna3",
            Self::Cdna2 => "cdna2",
            Self::Rdna3 => "rdna3",
            Self::AppleSilicon => "apple_silicon",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Market availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    InStock,
    Limited,
    OutOfStock,
    #[default]
    Unknown,
}

impl Availability {
    /// Cost-score adjustment.
    pub fn cost_adjustment(&self) -> f64 {
        match self {
            Self::InStock => 5.0,
            Self::Limited => -5.0,
            Self::OutOfStock => -15.0,
            Self::Unknown => 0.0,
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InStock => "in stock",
            Self::Limited => "limited",
            Self::OutOfStock => "out of stock",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Datasheet numbers of one device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceSpecs {
    /// Device memory in GB
    pub memory_gb: f64,
    /// Peak memory bandwidth in GB/s
    pub memory_bandwidth_gbps: f64,
    /// Dense FP16 tensor throughput in TFLOPS
    pub fp16_tflops: f64,
    /// Board power in watts
    pub tdp_watts: f64,
    /// Street price in USD (0 when unknown)
    #[serde(default)]
    pub price_usd: f64,
}

/// One accelerator as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Stable identifier, e.g. `rtx-4090`
    pub id: String,
    /// Display name
    pub name: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub architecture: Architecture,
    pub specs: DeviceSpecs,
    #[serde(default)]
    pub availability: Availability,
    /// Samples attached by the catalog loader
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub benchmarks: Vec<BenchmarkSample>,
}

impl DeviceProfile {
    /// Create a profile with no benchmarks.
    pub fn new(id: impl Into<String>, name: impl Into<String>, specs: DeviceSpecs) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            vendor: String::new(),
            architecture: Architecture::Other,
            specs,
            availability: Availability::Unknown,
            benchmarks: Vec::new(),
        }
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    pub fn with_architecture(mut self, architecture: Architecture) -> Self {
        self.architecture = architecture;
        self
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    pub fn with_benchmarks(mut self, benchmarks: Vec<BenchmarkSample>) -> Self {
        self.benchmarks = benchmarks;
        self
    }

    /// Capacity in bytes.
    pub fn capacity_bytes(&self) -> f64 {
        self.specs.memory_gb * BYTES_PER_GB
    }

    /// Check the datasheet numbers are usable.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::invalid("id", "device id must not be empty"));
        }
        require_positive("memory_gb", self.specs.memory_gb)?;
        require_positive("memory_bandwidth_gbps", self.specs.memory_bandwidth_gbps)?;
        require_positive("fp16_tflops", self.specs.fp16_tflops)?;
        require_positive("tdp_watts", self.specs.tdp_watts)?;
        require_non_negative("price_usd", self.specs.price_usd)?;
        Ok(())
    }
}
