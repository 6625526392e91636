//! Byte, gigabyte and percentage conversions.
//!
//! All sizes use binary units (1 GB = 1024³ bytes). Conversions reject
//! negative or non-finite inputs; [`percentage`] returns `0.0` for a zero
//! denominator instead of failing.

use crate::error::{require_non_negative, Result};

/// Bytes per kilobyte.
pub const BYTES_PER_KB: f64 = 1024.0;
/// Bytes per megabyte.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
/// Bytes per gigabyte.
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Convert bytes to gigabytes.
pub fn bytes_to_gb(bytes: f64) -> Result<f64> {
    Ok(require_non_negative("bytes", bytes)? / BYTES_PER_GB)
}

/// Convert gigabytes to bytes.
pub fn gb_to_bytes(gb: f64) -> Result<f64> {
    Ok(require_non_negative("gb", gb)? * BYTES_PER_GB)
}

/// Convert bytes to megabytes.
pub fn bytes_to_mb(bytes: f64) -> Result<f64> {
    Ok(require_non_negative("bytes", bytes)? / BYTES_PER_MB)
}

/// Convert megabytes to bytes.
pub fn mb_to_bytes(mb: f64) -> Result<f64> {
    Ok(require_non_negative("mb", mb)? * BYTES_PER_MB)
}

/// `part / whole × 100`, or `0.0` when `whole` is zero.
pub fn percentage(part: f64, whole: f64) -> Result<f64> {
    let part = require_non_negative("part", part)?;
    let whole = require_non_negative("whole", whole)?;
    if whole == 0.0 {
        return Ok(0.0);
    }
    Ok(part / whole * 100.0)
}

/// Format a byte count as a human-readable string (`"1.50 GB"`).
pub fn format_bytes(bytes: f64) -> Result<String> {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];
    let mut size = require_non_negative("bytes", bytes)?;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    Ok(format!("{:.2} {}", size, UNITS[unit_idx]))
}

/// Format gigabytes with a fixed number of decimals (`"24.0 GB"`).
pub fn format_gb(gb: f64, decimals: usize) -> Result<String> {
    let gb = require_non_negative("gb", gb)?;
    Ok(format!("{gb:.decimals$} GB"))
}

/// Format a percentage value (`"66.67%"`).
pub fn format_percentage(value: f64, decimals: usize) -> Result<String> {
    let value = require_non_negative("percentage", value)?;
    Ok(format!("{value:.decimals$}%"))
}

/// Round to `decimals` decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
