//! Rating result types.

use crate::workload::Workload;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four rated dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Compute,
    Memory,
    Power,
    Cost,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [Self::Compute, Self::Memory, Self::Power, Self::Cost];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compute => "compute",
            Self::Memory => "memory",
            Self::Power => "power",
            Self::Cost => "cost",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An input to a sub-score and how many points it contributed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreFactor {
    pub name: String,
    /// Raw input value
    pub value: f64,
    /// Points added to the sub-score
    pub contribution: f64,
}

impl ScoreFactor {
    pub fn new(name: impl Into<String>, value: f64, contribution: f64) -> Self {
        Self { name: name.into(), value, contribution }
    }
}

/// Score of one dimension, 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubScore {
    pub score: f64,
    /// Weight of this dimension in the overall rating
    pub weight: f64,
    pub confidence: f64,
    pub factors: Vec<ScoreFactor>,
}

impl SubScore {
    /// Points this dimension adds to the overall rating.
    pub fn weighted(&self) -> f64 {
        self.score * self.weight
    }
}

/// Workload-specific efficiency rating of a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyRating {
    pub device_id: String,
    pub device_name: String,
    pub workload: Workload,
    /// Weighted sum of the sub-scores, 0-100
    pub overall: f64,
    pub compute: SubScore,
    pub memory: SubScore,
    pub power: SubScore,
    pub cost: SubScore,
    /// Lowest sub-score confidence
    pub confidence: f64,
}

impl EfficiencyRating {
    pub fn sub_score(&self, dimension: Dimension) -> &SubScore {
        match dimension {
            Dimension::Compute => &self.compute,
            Dimension::Memory => &self.memory,
            Dimension::Power => &self.power,
            Dimension::Cost => &self.cost,
        }
    }

    /// Dimension with the highest score.
    pub fn strongest(&self) -> Dimension {
        let mut best = Dimension::Compute;
        for dimension in Dimension::ALL {
            if self.sub_score(dimension).score > self.sub_score(best).score {
                best = dimension;
            }
        }
        best
    }
}
