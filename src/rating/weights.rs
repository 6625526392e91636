//! Workload-specific weights of the four rating dimensions.

use crate::error::{Error, Result};
use crate::workload::Workload;
use serde::{Deserialize, Serialize};

/// Allowed deviation of a weight sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Weights of compute, memory, power and cost in the overall rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingWeights {
    pub compute: f64,
    pub memory: f64,
    pub power: f64,
    pub cost: f64,
}

impl RatingWeights {
    /// Inference favours compute and power efficiency.
    pub const INFERENCE: Self = Self { compute: 0.35, memory: 0.20, power: 0.25, cost: 0.20 };
    /// Training favours memory.
    pub const TRAINING: Self = Self { compute: 0.25, memory: 0.40, power: 0.15, cost: 0.20 };
    pub const MIXED: Self = Self { compute: 0.30, memory: 0.30, power: 0.20, cost: 0.20 };

    /// Built-in preset for a workload.
    pub fn preset(workload: Workload) -> Self {
        match workload {
            Workload::Inference => Self::INFERENCE,
            Workload::Training => Self::TRAINING,
            Workload::Mixed => Self::MIXED,
        }
    }

    pub fn sum(&self) -> f64 {
        self.compute + self.memory + self.power + self.cost
    }

    /// Weights must be non-negative and sum to 1 ±0.01.
    pub fn validate(&self) -> Result<()> {
        for (name, w) in [
            ("compute", self.compute),
            ("memory", self.memory),
            ("power", self.power),
            ("cost", self.cost),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(Error::Config(format!("weight '{name}' must be >= 0, got {w}")));
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(Error::Config(format!("rating weights sum to {sum:.3}, expected 1.0")));
        }
        Ok(())
    }
}

/// Weight presets per workload, overridable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightPresets {
    pub inference: RatingWeights,
    pub training: RatingWeights,
    pub mixed: RatingWeights,
}

impl Default for WeightPresets {
    fn default() -> Self {
        Self {
            inference: RatingWeights::INFERENCE,
            training: RatingWeights::TRAINING,
            mixed: RatingWeights::MIXED,
        }
    }
}

impl WeightPresets {
    pub fn for_workload(&self, workload: Workload) -> RatingWeights {
        match workload {
            Workload::Inference => self.inference,
            Workload::Training => self.training,
            Workload::Mixed => self.mixed,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for workload in Workload::ALL {
            self.for_workload(workload)
                .validate()
                .map_err(|e| Error::Config(format!("{workload} weights: {e}")))?;
        }
        Ok(())
    }
}
