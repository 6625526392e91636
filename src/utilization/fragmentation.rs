//! Fragmentation prediction from allocation history.

use crate::error::{require_non_negative, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expected fragmentation with no risk factors present.
pub const BASELINE_FRAGMENTATION: f64 = 0.05;
/// Upper bound on the prediction.
pub const MAX_FRAGMENTATION: f64 = 0.25;
/// Increment when size standard deviation exceeds half the mean.
pub const SIZE_VARIANCE_INCREMENT: f64 = 0.08;
/// Increment when peak memory exceeds 80% of capacity.
pub const PEAK_RATIO_INCREMENT: f64 = 0.05;
/// Increment for random (non-LIFO/FIFO) deallocation.
pub const RANDOM_DEALLOCATION_INCREMENT: f64 = 0.06;

/// How allocations are released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeallocationPattern {
    /// Released in (reverse) allocation order
    #[default]
    Sequential,
    /// Released in arbitrary order
    Random,
}

impl std::str::FromStr for DeallocationPattern {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" | "lifo" | "fifo" => Ok(Self::Sequential),
            "random" => Ok(Self::Random),
            _ => Err(format!("Unknown deallocation pattern: {s}. Use: sequential, random")),
        }
    }
}

/// Observed allocation behaviour.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AllocationHistory {
    /// Distinct allocation sizes in bytes
    pub allocation_sizes: Vec<f64>,
    /// How often each size occurs (uniform if empty or mismatched)
    #[serde(default)]
    pub frequencies: Vec<f64>,
    /// Release order
    #[serde(default)]
    pub deallocation_pattern: DeallocationPattern,
    /// Peak memory in use as a fraction of capacity
    pub peak_memory_ratio: f64,
}

/// Risk level of the prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentationRisk {
    Low,
    Medium,
    High,
}

impl FragmentationRisk {
    /// High at >= 0.15, medium at >= 0.08.
    pub fn from_expected(expected: f64) -> Self {
        if expected >= 0.15 {
            Self::High
        } else if expected >= 0.08 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for FragmentationRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(s)
    }
}

/// Predicted fragmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentationPrediction {
    /// Expected fraction of memory lost, in [0.05, 0.25]
    pub expected_fragmentation: f64,
    /// Confidence in [0.1, 1]
    pub confidence: f64,
    /// Risk level
    pub risk: FragmentationRisk,
    /// Coefficient of variation of allocation sizes
    pub size_cv: f64,
    /// Mitigations, present when risk is medium or high
    pub suggestions: Vec<String>,
}

/// Predict fragmentation from an allocation history.
pub fn predict_fragmentation(history: &AllocationHistory) -> Result<FragmentationPrediction> {
    for &size in &history.allocation_sizes {
        require_non_negative("allocation_sizes", size)?;
    }
    for &freq in &history.frequencies {
        require_non_negative("frequencies", freq)?;
    }
    let peak = require_non_negative("peak_memory_ratio", history.peak_memory_ratio)?;
    if peak > 1.5 {
        return Err(Error::invalid("peak_memory_ratio", format!("must be <= 1.5, got {peak}")));
    }

    let (mean, std_dev) = weighted_mean_std(&history.allocation_sizes, &history.frequencies);
    let cv = if mean > 0.0 { std_dev / mean } else { 0.0 };

    let high_variance = mean > 0.0 && std_dev > 0.5 * mean;
    let high_peak = peak > 0.8;
    let random = history.deallocation_pattern == DeallocationPattern::Random;

    let mut expected = BASELINE_FRAGMENTATION;
    if high_variance {
        expected += SIZE_VARIANCE_INCREMENT;
    }
    if high_peak {
        expected += PEAK_RATIO_INCREMENT;
    }
    if random {
        expected += RANDOM_DEALLOCATION_INCREMENT;
    }
    let expected = expected.min(MAX_FRAGMENTATION);

    let n = history.allocation_sizes.len() as f64;
    let sample_confidence = 0.3 + 0.7 * (n / 50.0).min(1.0);
    let dispersion_penalty = if cv > 1.0 {
        0.7
    } else if cv > 0.5 {
        0.85
    } else {
        1.0
    };
    let confidence = (sample_confidence * dispersion_penalty).clamp(0.1, 1.0);

    let risk = FragmentationRisk::from_expected(expected);
    let mut suggestions = Vec::new();
    if risk >= FragmentationRisk::Medium {
        suggestions.push(
            "Pre-allocate persistent buffers (weights, KV cache) before transient workspaces"
                .to_string(),
        );
        if high_variance {
            suggestions.push(
                "Pool allocations into size classes to absorb widely varying tensor sizes"
                    .to_string(),
            );
        }
        if random {
            suggestions.push(
                "Release temporaries in reverse allocation order or use an arena per step"
                    .to_string(),
            );
        }
        if high_peak {
            suggestions.push(format!(
                "Peak usage is {:.0}% of capacity: keep it below 80% to leave room for coalescing",
                peak * 100.0
            ));
        }
    }

    Ok(FragmentationPrediction {
        expected_fragmentation: expected,
        confidence,
        risk,
        size_cv: cv,
        suggestions,
    })
}

fn weighted_mean_std(values: &[f64], weights: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let uniform;
    let weights = if weights.len() == values.len() && weights.iter().sum::<f64>() > 0.0 {
        weights
    } else {
        uniform = vec![1.0; values.len()];
        &uniform
    };

    let total: f64 = weights.iter().sum();
    let mean = values.iter().zip(weights).map(|(v, w)| v * w).sum::<f64>() / total;
    let variance =
        values.iter().zip(weights).map(|(v, w)| w * (v - mean).powi(2)).sum::<f64>() / total;
    (mean, variance.sqrt())
}
