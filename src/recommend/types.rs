//! Recommendation request and result types.

use crate::benchmark::{PerformancePrediction, TargetParams};
use crate::error::{require_non_negative, Error, Result};
use crate::rating::EfficiencyRating;
use crate::requirement::{MemoryRequirement, ModelSpec};
use crate::utilization::{MultiDeviceResult, UtilizationResult};
use crate::workload::Workload;
use serde::{Deserialize, Serialize};

/// What to recommend devices for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub requirement: MemoryRequirement,
    pub workload: Workload,
    /// Ceiling on the total cost of the devices, USD
    pub budget_usd: Option<f64>,
    /// Configuration performance is predicted for
    pub target: TargetParams,
    /// Overrides the configured result limit
    pub max_results: Option<usize>,
}

impl RecommendationRequest {
    pub fn new(requirement: MemoryRequirement, workload: Workload) -> Self {
        Self {
            requirement,
            workload,
            budget_usd: None,
            target: TargetParams::default(),
            max_results: None,
        }
    }

    /// Estimate the requirement from a model and predict for the same model.
    pub fn for_model(model: &ModelSpec, workload: Workload) -> Result<Self> {
        let requirement = MemoryRequirement::estimate(model, workload)?;
        Ok(Self::new(requirement, workload).with_target(TargetParams::from(model)))
    }

    pub fn with_budget(mut self, budget_usd: f64) -> Self {
        self.budget_usd = Some(budget_usd);
        self
    }

    pub fn with_target(mut self, target: TargetParams) -> Self {
        self.target = target;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn validate(&self) -> Result<()> {
        require_non_negative("total_bytes", self.requirement.total_bytes)?;
        if let Some(budget) = self.budget_usd {
            require_non_negative("budget_usd", budget)?;
        }
        if self.max_results == Some(0) {
            return Err(Error::invalid("max_results", "must be >= 1"));
        }
        self.target.validate()
    }
}

/// One evaluated device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub device_id: String,
    pub device_name: String,
    /// Devices needed to hold the requirement
    pub device_count: u32,
    /// Whether the requirement fits within the device limit
    pub suitable: bool,
    /// Single-device utilization
    pub utilization: UtilizationResult,
    /// Present when more than one device is needed
    pub multi_device: Option<MultiDeviceResult>,
    pub rating: EfficiencyRating,
    pub prediction: PerformancePrediction,
    /// Rating / 100 adjusted for fit
    pub efficiency_score: f64,
    /// `price × device_count`, 0 when the price is unknown
    pub total_cost_usd: f64,
    pub rationale: Vec<String>,
}

/// A device left out of the recommendations, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedDevice {
    pub device_id: String,
    pub reason: String,
}

impl ExcludedDevice {
    pub fn new(device_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { device_id: device_id.into(), reason: reason.into() }
    }
}

/// Ranked recommendations for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationReport {
    /// Suitable devices first, then by efficiency score
    pub recommendations: Vec<Recommendation>,
    /// Best suitable device
    pub top_pick: Option<String>,
    /// Suitable devices before truncation
    pub compatible_count: usize,
    pub evaluated_count: usize,
    pub excluded: Vec<ExcludedDevice>,
}

impl RecommendationReport {
    /// The recommendation named by `top_pick`.
    pub fn top(&self) -> Option<&Recommendation> {
        let id = self.top_pick.as_deref()?;
        self.recommendations.iter().find(|r| r.device_id == id)
    }

    pub fn suitable(&self) -> impl Iterator<Item = &Recommendation> {
        self.recommendations.iter().filter(|r| r.suitable)
    }
}
