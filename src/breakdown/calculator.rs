//! Labeled memory breakdowns.

use super::normalize::normalize_percentages;
use crate::error::{require_non_negative, require_positive, Error, Result};
use crate::requirement::MemoryRequirement;
use serde::{Deserialize, Serialize};

/// Label of the free-memory bucket in a capacity breakdown.
pub const AVAILABLE_LABEL: &str = "Available";
/// Label of the placeholder bucket used when no breakdown can be computed.
pub const UNAVAILABLE_LABEL: &str = "Unavailable";

const FALLBACK_PALETTE: &[&str] = &["#0EA5E9", "#A855F7", "#14B8A6", "#F43F5E", "#84CC16", "#64748B"];

/// One labeled slice of a breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub label: String,
    pub bytes: f64,
    /// Share in percent, two decimals
    pub percentage: f64,
    /// Hex color for charts
    pub color: String,
    pub description: String,
}

/// Labeled breakdown whose percentages sum to 100.00.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryBreakdown {
    pub entries: Vec<BreakdownEntry>,
    /// Total the percentages are relative to
    pub total_bytes: f64,
}

impl MemoryBreakdown {
    /// Sum of entry percentages.
    pub fn percentage_sum(&self) -> f64 {
        self.entries.iter().map(|e| e.percentage).sum()
    }

    /// Sum of entry byte counts.
    pub fn byte_sum(&self) -> f64 {
        self.entries.iter().map(|e| e.bytes).sum()
    }

    /// Look up an entry by label.
    pub fn entry(&self, label: &str) -> Option<&BreakdownEntry> {
        self.entries.iter().find(|e| e.label == label)
    }
}

/// Capacity split of one device for the capacity breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityUsage {
    /// Raw device capacity
    pub capacity_bytes: f64,
    /// Memory in use, overheads included
    pub used_bytes: f64,
    /// Framework and driver overhead within `used_bytes`
    pub overhead_bytes: f64,
    /// Fragmentation within `used_bytes`
    pub fragmentation_bytes: f64,
    /// Safety margin within `used_bytes`
    pub safety_bytes: f64,
}

/// Chart color for a known label, or a palette color by position.
pub fn color_for(label: &str, index: usize) -> String {
    let color = match label {
        "Model Weights" => "#3B82F6",
        "Activations" => "#10B981",
        "Gradients" => "#F59E0B",
        "Optimizer State" => "#EF4444",
        "Base Requirement" => "#6366F1",
        "Framework Overhead" => "#8B5CF6",
        "Fragmentation" => "#F97316",
        "Safety Margin" => "#EAB308",
        "Total" => "#3B82F6",
        AVAILABLE_LABEL => "#22C55E",
        UNAVAILABLE_LABEL => "#9CA3AF",
        _ => FALLBACK_PALETTE[index % FALLBACK_PALETTE.len()],
    };
    color.to_string()
}

pub(crate) fn description_for(label: &str) -> &'static str {
    match label {
        "Model Weights" => "Parameters at the chosen precision",
        "Activations" => "Activations, KV cache and temporary workspace",
        "Gradients" => "One gradient per trainable parameter",
        "Optimizer State" => "Optimizer moments and master weights",
        "Base Requirement" => "Memory the workload itself needs",
        "Framework Overhead" => "Runtime, CUDA context and driver allocations",
        "Fragmentation" => "Memory lost between allocations",
        "Safety Margin" => "Headroom held back against spikes",
        "Total" => "Total requirement without a component split",
        AVAILABLE_LABEL => "Free device memory",
        UNAVAILABLE_LABEL => "Breakdown could not be computed",
        _ => "",
    }
}

/// Builds [`MemoryBreakdown`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryBreakdownCalculator;

impl MemoryBreakdownCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Breakdown of named components relative to their sum.
    ///
    /// Every label must be non-empty and every value a finite non-negative
    /// number with a positive total.
    pub fn from_components<S: AsRef<str>>(&self, components: &[(S, f64)]) -> Result<MemoryBreakdown> {
        for (label, bytes) in components {
            if label.as_ref().trim().is_empty() {
                return Err(Error::invalid("label", "every component needs a label"));
            }
            require_non_negative("bytes", *bytes)?;
        }
        let values: Vec<f64> = components.iter().map(|(_, b)| *b).collect();
        let percentages = normalize_percentages(&values)?;

        let entries = components
            .iter()
            .zip(percentages)
            .enumerate()
            .map(|(i, ((label, bytes), percentage))| {
                let label = label.as_ref();
                BreakdownEntry {
                    label: label.to_string(),
                    bytes: *bytes,
                    percentage,
                    color: color_for(label, i),
                    description: description_for(label).to_string(),
                }
            })
            .collect();

        Ok(MemoryBreakdown { entries, total_bytes: values.iter().sum() })
    }

    /// Breakdown of a requirement's non-zero components, or a single
    /// `Total` entry when it has no decomposition.
    pub fn from_requirement(&self, requirement: &MemoryRequirement) -> Result<MemoryBreakdown> {
        let Some(components) = requirement.components else {
            require_positive("total_bytes", requirement.total_bytes)?;
            return self.from_components(&[("Total", requirement.total_bytes)]);
        };
        let nonzero: Vec<(&str, f64)> =
            components.labeled().into_iter().filter(|(_, bytes)| *bytes > 0.0).collect();
        self.from_components(&nonzero)
    }

    /// Breakdown of a device's capacity into the base requirement, overhead
    /// buckets and free memory.
    ///
    /// The base requirement is what remains of `used` after overhead,
    /// fragmentation and safety. The `Available` bucket is always present;
    /// other zero-valued buckets are omitted.
    pub fn capacity_breakdown(&self, usage: &CapacityUsage) -> Result<MemoryBreakdown> {
        let capacity = require_positive("capacity_bytes", usage.capacity_bytes)?;
        let used = require_non_negative("used_bytes", usage.used_bytes)?;
        let overhead = require_non_negative("overhead_bytes", usage.overhead_bytes)?;
        let fragmentation = require_non_negative("fragmentation_bytes", usage.fragmentation_bytes)?;
        let safety = require_non_negative("safety_bytes", usage.safety_bytes)?;

        let base = (used - overhead - fragmentation - safety).max(0.0);
        let available = (capacity - used).max(0.0);

        let buckets = [
            ("Base Requirement", base),
            ("Framework Overhead", overhead),
            ("Fragmentation", fragmentation),
            ("Safety Margin", safety),
        ];
        let mut components: Vec<(&str, f64)> =
            buckets.into_iter().filter(|(_, bytes)| *bytes > 0.0).collect();
        components.push((AVAILABLE_LABEL, available));

        let mut breakdown = self.from_components(&components)?;
        breakdown.total_bytes = breakdown.total_bytes.max(capacity);
        Ok(breakdown)
    }
}
