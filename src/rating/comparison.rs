//! Pairwise comparison of two ratings.

use super::score::{Dimension, EfficiencyRating};
use crate::workload::Workload;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dimension deltas at or above this are called out in the rationale.
const NOTABLE_DIMENSION_DELTA: f64 = 5.0;

/// Size of the overall-score lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadMagnitude {
    /// Under half a point
    Even,
    /// Under 5 points
    Slight,
    /// Under 15 points
    Clear,
    Significant,
}

impl LeadMagnitude {
    pub fn from_delta(delta: f64) -> Self {
        let delta = delta.abs();
        if delta < 0.5 {
            Self::Even
        } else if delta < 5.0 {
            Self::Slight
        } else if delta < 15.0 {
            Self::Clear
        } else {
            Self::Significant
        }
    }
}

impl fmt::Display for LeadMagnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Even => "even",
            Self::Slight => "slight",
            Self::Clear => "clear",
            Self::Significant => "significant",
        };
        f.write_str(s)
    }
}

/// Per-dimension `a − b` score differences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionDeltas {
    pub compute: f64,
    pub memory: f64,
    pub power: f64,
    pub cost: f64,
}

impl DimensionDeltas {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Compute => self.compute,
            Dimension::Memory => self.memory,
            Dimension::Power => self.power,
            Dimension::Cost => self.cost,
        }
    }
}

/// Outcome of comparing device `a` against device `b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceComparison {
    pub device_a: String,
    pub device_b: String,
    pub workload: Workload,
    pub overall_a: f64,
    pub overall_b: f64,
    /// `overall_a − overall_b`
    pub overall_delta: f64,
    pub deltas: DimensionDeltas,
    /// Device with the higher overall score, `None` when even
    pub leader: Option<String>,
    pub magnitude: LeadMagnitude,
    pub rationale: Vec<String>,
}

/// Compare two ratings of the same workload.
pub fn compare_ratings(a: &EfficiencyRating, b: &EfficiencyRating) -> DeviceComparison {
    let deltas = DimensionDeltas {
        compute: a.compute.score - b.compute.score,
        memory: a.memory.score - b.memory.score,
        power: a.power.score - b.power.score,
        cost: a.cost.score - b.cost.score,
    };
    let overall_delta = a.overall - b.overall;
    let magnitude = LeadMagnitude::from_delta(overall_delta);

    let (leader, trailer) = if overall_delta >= 0.0 { (a, b) } else { (b, a) };
    let mut rationale = Vec::new();
    let leader_id = if magnitude == LeadMagnitude::Even {
        rationale.push(format!(
            "{} and {} are evenly matched for {} ({:.1} vs {:.1})",
            a.device_name, b.device_name, a.workload, a.overall, b.overall
        ));
        None
    } else {
        rationale.push(format!(
            "{} has a {} lead over {} for {}: {:.1} vs {:.1}",
            leader.device_name,
            magnitude,
            trailer.device_name,
            a.workload,
            leader.overall,
            trailer.overall
        ));
        Some(leader.device_id.clone())
    };

    for dimension in Dimension::ALL {
        let delta = deltas.get(dimension);
        if delta.abs() >= NOTABLE_DIMENSION_DELTA {
            let (stronger, weaker) = if delta > 0.0 { (a, b) } else { (b, a) };
            rationale.push(format!(
                "{} is stronger on {} ({:.1} vs {:.1})",
                stronger.device_name,
                dimension,
                stronger.sub_score(dimension).score,
                weaker.sub_score(dimension).score
            ));
        }
    }

    if a.confidence < 0.5 || b.confidence < 0.5 {
        rationale.push("Low rating confidence: benchmark data is sparse for at least one device".to_string());
    }

    DeviceComparison {
        device_a: a.device_id.clone(),
        device_b: b.device_id.clone(),
        workload: a.workload,
        overall_a: a.overall,
        overall_b: b.overall,
        overall_delta,
        deltas,
        leader: leader_id,
        magnitude,
        rationale,
    }
}
