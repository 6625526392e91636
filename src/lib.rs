//! Accelerator memory sizing, efficiency rating and hardware recommendation
//! for LLM workloads.
//!
//! This crate provides:
//! - Memory utilization with fragmentation, reservations and safety margins
//! - Multi-device scaling and fragmentation prediction
//! - Memory breakdowns that always sum to 100%
//! - Benchmark normalization and performance prediction
//! - Four-dimension device efficiency ratings and comparisons
//! - Budget-aware device recommendations with validated results
//!
//! All sizes use binary units (1 GB = 1024³ bytes).
//!
//! # Example
//!
//! ```no_run
//! use dimensionar::{recommend_for_model, DeviceCatalog, ModelSpec, Workload};
//!
//! let catalog = DeviceCatalog::builtin()?;
//! let validated = recommend_for_model(&catalog, &ModelSpec::new(13.0), Workload::Inference, Some(10_000.0))?;
//! for warning in &validated.warnings {
//!     eprintln!("warning: {warning}");
//! }
//! if let Some(top) = validated.value.top() {
//!     println!("{} x{}", top.device_name, top.device_count);
//! }
//! # Ok::<(), dimensionar::Error>(())
//! ```

pub mod benchmark;
pub mod breakdown;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod rating;
pub mod recommend;
pub mod requirement;
pub mod units;
pub mod utilization;
pub mod validate;
pub mod workload;

pub use benchmark::{BenchmarkProcessor, PerformancePrediction, TargetParams};
pub use breakdown::{MemoryBreakdown, MemoryBreakdownCalculator};
pub use catalog::{DeviceCatalog, DeviceProfile, DeviceSpecs};
pub use config::{load_config, EngineConfig};
pub use error::{Error, Result};
pub use rating::{EfficiencyRating, EfficiencyRatingSystem, RatingWeights};
pub use recommend::{Recommendation, RecommendationEngine, RecommendationReport, RecommendationRequest};
pub use requirement::{MemoryRequirement, ModelSpec};
pub use utilization::{calculate_utilization, UtilizationConfig, UtilizationResult};
pub use validate::{ResultValidator, Validated};
pub use workload::{Precision, Workload};

/// Recommend devices from `catalog` for a model, with default settings.
///
/// The report comes back as [`ResultValidator::validate_report`] left it:
/// recommendations that failed validation are moved to `excluded` and the
/// validity flags, errors and warnings are kept for the caller.
pub fn recommend_for_model(
    catalog: &DeviceCatalog,
    model: &ModelSpec,
    workload: Workload,
    budget_usd: Option<f64>,
) -> Result<Validated<RecommendationReport>> {
    let mut request = RecommendationRequest::for_model(model, workload)?;
    if let Some(budget) = budget_usd {
        request = request.with_budget(budget);
    }
    let report = RecommendationEngine::with_defaults(catalog).recommend(&request)?;
    Ok(ResultValidator::new().validate_report(report))
}
