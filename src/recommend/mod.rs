//! Device recommendations for a memory requirement.
//!
//! Every catalog device is validated, rated for the workload and checked
//! for fit, on one device or on the fewest identical devices that hold the
//! requirement. The efficiency score starts from `rating / 100`:
//!
//! - single device, excellent band: `+0.10`
//! - single device, good band: `+0.05`
//! - single device at all: `+0.05`
//! - each device beyond the first: `−0.05`
//!
//! Devices whose total cost exceeds the budget are excluded, never returned.

mod config;
mod engine;
mod rationale;
mod types;

pub use config::RecommendationConfig;
pub use engine::{
    efficiency_score, RecommendationEngine, EXCELLENT_FIT_BONUS, EXTRA_DEVICE_PENALTY,
    GOOD_FIT_BONUS, SINGLE_DEVICE_BONUS,
};
pub use types::{ExcludedDevice, Recommendation, RecommendationReport, RecommendationRequest};

#[cfg(test)]
mod proptests;
