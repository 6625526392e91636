//! Percentage normalization that sums to exactly 100.00.

use crate::error::{require_non_negative, Error, Result};
use std::cmp::Ordering;

/// Hundredths of a percent in a whole.
const TOTAL_CENTS: i64 = 10_000;

/// Turn non-negative values into two-decimal percentages summing to 100.00.
///
/// Shares are rounded to hundredths. The rounding residual is then spread one
/// hundredth at a time over the entries in descending order of magnitude,
/// and whatever is left after one pass goes to the largest entry. Zero-valued
/// entries stay at exactly 0.
pub fn normalize_percentages(values: &[f64]) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(Error::invalid("values", "at least one component is required"));
    }
    for &value in values {
        require_non_negative("values", value)?;
    }
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return Err(Error::invalid("values", "components must have a positive sum"));
    }

    let mut cents: Vec<i64> = values
        .iter()
        .map(|v| (v / total * TOTAL_CENTS as f64).round() as i64)
        .collect();

    let mut order: Vec<usize> = (0..values.len()).filter(|&i| values[i] > 0.0).collect();
    order.sort_by(|&a, &b| values[b].partial_cmp(&values[a]).unwrap_or(Ordering::Equal));

    let mut residual = TOTAL_CENTS - cents.iter().sum::<i64>();
    for &idx in &order {
        if residual == 0 {
            break;
        }
        let step = residual.signum();
        if cents[idx] + step < 0 {
            continue;
        }
        cents[idx] += step;
        residual -= step;
    }
    if residual != 0 {
        if let Some(&largest) = order.first() {
            cents[largest] += residual;
        }
    }

    Ok(cents.into_iter().map(|c| c as f64 / 100.0).collect())
}
