//! Validity-flagged results.

use serde::{Deserialize, Serialize};

/// A hard problem that makes a result unusable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("{field} is not finite: {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} out of range: {value} (expected {min} to {max})")]
    OutOfRange { field: &'static str, value: f64, min: f64, max: f64 },

    #[error("{field} is empty")]
    Empty { field: &'static str },

    #[error("inconsistent result: {0}")]
    Inconsistent(String),
}

/// Errors and warnings collected while checking a result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Findings {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Findings {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn error(&mut self, issue: ValidationIssue) {
        self.errors.push(issue.to_string());
    }

    pub(crate) fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// `value` must be finite and within `[min, max]`.
    pub(crate) fn check_range(&mut self, field: &'static str, value: f64, min: f64, max: f64) {
        if !value.is_finite() {
            self.error(ValidationIssue::NonFinite { field, value });
        } else if value < min || value > max {
            self.error(ValidationIssue::OutOfRange { field, value, min, max });
        }
    }

    /// `value` must be finite and non-negative.
    pub(crate) fn check_non_negative(&mut self, field: &'static str, value: f64) {
        self.check_range(field, value, 0.0, f64::MAX);
    }

    /// Merge another set of findings, prefixing each message.
    pub(crate) fn absorb(&mut self, prefix: &str, other: Findings) {
        self.errors.extend(other.errors.into_iter().map(|e| format!("{prefix}: {e}")));
        self.warnings.extend(other.warnings.into_iter().map(|w| format!("{prefix}: {w}")));
    }
}

/// A result together with its validity.
///
/// `is_fallback` marks a placeholder substituted for a result that failed
/// validation; `errors` then explains what was wrong with the original. A
/// result that is invalid but still the real computation, with the offending
/// parts removed, has `is_valid` false and `is_fallback` false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validated<T> {
    pub value: T,
    pub is_valid: bool,
    pub is_fallback: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl<T> Validated<T> {
    /// The original value with its findings.
    pub fn checked(value: T, findings: Findings) -> Self {
        Self {
            value,
            is_valid: findings.is_valid(),
            is_fallback: false,
            errors: findings.errors,
            warnings: findings.warnings,
        }
    }

    /// A placeholder standing in for a result with `findings`.
    pub fn fallback(value: T, findings: Findings) -> Self {
        Self {
            value,
            is_valid: false,
            is_fallback: true,
            errors: findings.errors,
            warnings: findings.warnings,
        }
    }

    /// The real result after the parts named in `findings` were removed.
    pub fn invalid(value: T, findings: Findings) -> Self {
        Self {
            value,
            is_valid: false,
            is_fallback: false,
            errors: findings.errors,
            warnings: findings.warnings,
        }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}
