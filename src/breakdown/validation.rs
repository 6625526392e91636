//! Breakdown sanity checks.
//!
//! Negative values and missing labels are hard errors. Percentage and byte
//! sums outside tolerance are warnings next to an otherwise valid result.

use super::calculator::MemoryBreakdown;
use serde::{Deserialize, Serialize};

/// Allowed deviation of the percentage sum from 100.
pub const PERCENTAGE_SUM_TOLERANCE: f64 = 0.1;
/// Allowed relative deviation of the byte sum from the expected total.
pub const BYTE_SUM_TOLERANCE: f64 = 0.01;

/// Outcome of [`validate_breakdown`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BreakdownValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Check a breakdown, optionally against the total it should add up to.
pub fn validate_breakdown(breakdown: &MemoryBreakdown, expected_total: Option<f64>) -> BreakdownValidation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if breakdown.entries.is_empty() {
        errors.push("breakdown has no entries".to_string());
    }

    for (i, entry) in breakdown.entries.iter().enumerate() {
        if entry.label.trim().is_empty() {
            errors.push(format!("entry {i} has no label"));
        }
        if !entry.bytes.is_finite() || entry.bytes < 0.0 {
            errors.push(format!("entry '{}' has invalid bytes {}", entry.label, entry.bytes));
        }
        if !entry.percentage.is_finite() || entry.percentage < 0.0 {
            errors.push(format!("entry '{}' has invalid percentage {}", entry.label, entry.percentage));
        }
    }

    if !breakdown.entries.is_empty() {
        let pct_sum = breakdown.percentage_sum();
        if (pct_sum - 100.0).abs() > PERCENTAGE_SUM_TOLERANCE {
            warnings.push(format!("percentages sum to {pct_sum:.2}, expected 100.00"));
        }
    }

    if let Some(expected) = expected_total.filter(|t| t.is_finite() && *t > 0.0) {
        let byte_sum = breakdown.byte_sum();
        let deviation = (byte_sum - expected).abs() / expected;
        if deviation > BYTE_SUM_TOLERANCE {
            warnings.push(format!(
                "byte sum {byte_sum:.0} differs from expected {expected:.0} by {:.2}%",
                deviation * 100.0
            ));
        }
    }

    BreakdownValidation { is_valid: errors.is_empty(), errors, warnings }
}
