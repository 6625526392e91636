//! Error types with actionable diagnostics.
//!
//! Raw inputs (byte counts, capacities, fractions) are rejected with
//! [`Error::InvalidArgument`] and never silently coerced. Derived or display
//! quantities are clamped by the calculators instead.

use thiserror::Error;

/// Result type alias for dimensionar operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the sizing engine, catalog loader and CLI.
#[derive(Error, Debug)]
pub enum Error {
    /// A raw input was negative, non-finite or otherwise out of range.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// A device id was not present in the catalog.
    #[error("Unknown device: {0}\n  → Run `dimensionar rate` to list catalog device ids")]
    UnknownDevice(String),

    /// The device/benchmark catalog failed load-time validation.
    #[error("Invalid catalog: {0}\n  → Fix the catalog entry and reload")]
    Catalog(String),

    /// The engine configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create an invalid-argument error.
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument { name, reason: reason.into() }
    }

    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Create an IO error for a failed read of `path`.
    pub fn read(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::io(format!("reading {}", path.display()), source)
    }

    /// Check if this error is caused by user input and can be corrected.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. }
                | Self::UnknownDevice(_)
                | Self::Catalog(_)
                | Self::Config(_)
        )
    }

    /// Get the error code for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "E001",
            Self::UnknownDevice(_) => "E010",
            Self::Catalog(_) => "E020",
            Self::Config(_) => "E030",
            Self::Io { .. } => "E050",
            Self::Serialization(_) => "E051",
        }
    }
}

/// Reject negative or non-finite raw inputs.
pub fn require_non_negative(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::invalid(name, format!("must be finite, got {value}")));
    }
    if value < 0.0 {
        return Err(Error::invalid(name, format!("must be >= 0, got {value}")));
    }
    Ok(value)
}

/// Reject zero, negative or non-finite raw inputs.
pub fn require_positive(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::invalid(name, format!("must be a finite value > 0, got {value}")));
    }
    Ok(value)
}

/// Reject values outside `[0, 1)`.
pub fn require_fraction(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() || !(0.0..1.0).contains(&value) {
        return Err(Error::invalid(name, format!("must be in [0, 1), got {value}")));
    }
    Ok(value)
}
