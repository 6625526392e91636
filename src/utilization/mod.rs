//! Memory utilization of a device by a requirement.
//!
//! # Components
//!
//! - [`calculator`] - theoretical vs practical utilization, safety-margin analysis
//! - [`multi_device`] - scaling across several identical devices
//! - [`allocation`] - first-fit allocation / fragmentation simulator
//! - [`fragmentation`] - fragmentation prediction from allocation history
//!
//! Practical utilization is `(needed + needed × fragmentation_factor) /
//! (capacity − reserved − driver_overhead)`; its band is
//! excellent at 70-85%, good at 50-95%, fair at 30-100%, poor otherwise.

pub mod allocation;
pub mod calculator;
pub mod config;
pub mod fragmentation;
pub mod multi_device;
pub mod result;

pub use allocation::{
    AllocationCategory, AllocationReport, AllocationRequest, AllocationSimulator,
    FailedAllocation, Placement,
};
pub use calculator::{
    advisory_score, calculate_utilization, calculate_with_safety_margin, SafetyMarginAnalysis,
    UtilizationCalculator,
};
pub use config::UtilizationConfig;
pub use fragmentation::{
    predict_fragmentation, AllocationHistory, DeallocationPattern, FragmentationPrediction,
    FragmentationRisk,
};
pub use multi_device::{
    calculate_multi_device_efficiency, load_balancing_efficiency, minimum_fitting_devices,
    optimal_device_count, MultiDeviceResult,
};
pub use result::{EfficiencyBand, LegacyUtilization, UtilizationRange, UtilizationResult};

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod tests;
