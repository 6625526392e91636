//! Memory breakdowns into labeled, percentage-normalized components.

pub(crate) mod calculator;
mod normalize;
mod validation;

pub use calculator::{
    color_for, BreakdownEntry, CapacityUsage, MemoryBreakdown, MemoryBreakdownCalculator,
    AVAILABLE_LABEL, UNAVAILABLE_LABEL,
};
pub use normalize::normalize_percentages;
pub use validation::{
    validate_breakdown, BreakdownValidation, BYTE_SUM_TOLERANCE, PERCENTAGE_SUM_TOLERANCE,
};

#[cfg(test)]
mod proptests;
