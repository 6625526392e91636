//! Workload-aware efficiency rating.
//!
//! Each device gets four 0-100 sub-scores:
//!
//! - compute: `0.40 × throughput + 0.35 × tflops + 0.25 × bandwidth`
//! - memory: `0.60 × memory efficiency + 0.40 × bandwidth` plus a generation bonus
//! - power: `0.70 × power efficiency + 0.30 × thermal` plus a power-management bonus
//! - cost: `0.60 × throughput per dollar + 0.40 × capacity per dollar` plus
//!   price-bracket and availability adjustments
//!
//! every term relative to a reference and capped at 100. The overall rating
//! is their weighted sum under the workload's [`RatingWeights`].

mod comparison;
mod config;
mod score;
mod system;
mod weights;

pub use comparison::{compare_ratings, DeviceComparison, DimensionDeltas, LeadMagnitude};
pub use config::RatingConfig;
pub use score::{Dimension, EfficiencyRating, ScoreFactor, SubScore};
pub use system::{
    EfficiencyRatingSystem, COMPUTE_BASE_CONFIDENCE, COST_BASE_CONFIDENCE,
    MEMORY_BASE_CONFIDENCE, POWER_BASE_CONFIDENCE,
};
pub use weights::{RatingWeights, WeightPresets, WEIGHT_SUM_TOLERANCE};

#[cfg(test)]
mod proptests;
