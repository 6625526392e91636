//! Result validation and fallback placeholders.
//!
//! Every checked result comes back as a [`Validated`] with an explicit
//! validity flag and error/warning lists. A result that fails is replaced
//! by a [`FallbackProvider`] placeholder (zeroed utilization, a single
//! "Unavailable" breakdown bucket, minimum-confidence rating or prediction)
//! so callers always receive a well-formed value. A recommendation report is
//! never replaced: invalid entries are dropped and the rest is returned as
//! invalid but not a fallback.

mod fallback;
mod validated;
mod validator;

pub use fallback::FallbackProvider;
pub use validated::{Findings, Validated, ValidationIssue};
pub use validator::ResultValidator;

#[cfg(test)]
mod tests;
