//! Per-device evaluation and ranking.

use super::config::RecommendationConfig;
use super::rationale;
use super::types::{ExcludedDevice, Recommendation, RecommendationReport, RecommendationRequest};
use crate::benchmark::BenchmarkProcessor;
use crate::catalog::{DeviceCatalog, DeviceProfile};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::rating::{EfficiencyRating, EfficiencyRatingSystem};
use crate::units::BYTES_PER_GB;
use crate::utilization::{
    calculate_utilization, minimum_fitting_devices, EfficiencyBand, MultiDeviceResult,
    UtilizationConfig, UtilizationResult,
};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::cmp::Ordering;

/// Bonus for a single device in the excellent utilization band.
pub const EXCELLENT_FIT_BONUS: f64 = 0.10;
/// Bonus for a single device in the good utilization band.
pub const GOOD_FIT_BONUS: f64 = 0.05;
/// Bonus for fitting on one device.
pub const SINGLE_DEVICE_BONUS: f64 = 0.05;
/// Penalty per device beyond the first.
pub const EXTRA_DEVICE_PENALTY: f64 = 0.05;

/// How many devices a requirement needs.
struct Fit {
    device_count: u32,
    multi_device: Option<MultiDeviceResult>,
    suitable: bool,
}

/// `rating / 100`, adjusted for how well the requirement fits.
pub fn efficiency_score(
    rating: &EfficiencyRating,
    utilization: &UtilizationResult,
    device_count: u32,
    suitable: bool,
) -> f64 {
    let mut score = rating.overall / 100.0;
    if suitable && device_count == 1 {
        score += match utilization.band {
            EfficiencyBand::Excellent => EXCELLENT_FIT_BONUS,
            EfficiencyBand::Good => GOOD_FIT_BONUS,
            _ => 0.0,
        };
        score += SINGLE_DEVICE_BONUS;
    } else if device_count > 1 {
        score -= EXTRA_DEVICE_PENALTY * f64::from(device_count - 1);
    }
    score.max(0.0)
}

/// Suitable first, then efficiency score descending, then device id.
fn rank(recommendations: &mut [Recommendation]) {
    recommendations.sort_by(|a, b| {
        b.suitable
            .cmp(&a.suitable)
            .then_with(|| {
                b.efficiency_score
                    .partial_cmp(&a.efficiency_score)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.device_id.cmp(&b.device_id))
    });
}

/// Recommends devices from a catalog for a memory requirement.
///
/// Holds no per-request state; one engine can serve any number of requests.
#[derive(Debug, Clone)]
pub struct RecommendationEngine<'a> {
    catalog: &'a DeviceCatalog,
    utilization: UtilizationConfig,
    rating: EfficiencyRatingSystem,
    benchmarks: BenchmarkProcessor<'a>,
    config: RecommendationConfig,
}

impl<'a> RecommendationEngine<'a> {
    pub fn new(catalog: &'a DeviceCatalog, config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            catalog,
            utilization: config.utilization,
            rating: EfficiencyRatingSystem::new(config.rating)?,
            benchmarks: BenchmarkProcessor::new(catalog, config.benchmark)?,
            config: config.recommendation,
        })
    }

    pub fn with_defaults(catalog: &'a DeviceCatalog) -> Self {
        Self {
            catalog,
            utilization: UtilizationConfig::default(),
            rating: EfficiencyRatingSystem::default(),
            benchmarks: BenchmarkProcessor::with_defaults(catalog),
            config: RecommendationConfig::default(),
        }
    }

    /// Evaluate benchmark freshness against a fixed instant.
    pub fn at(mut self, reference_time: DateTime<Utc>) -> Self {
        self.benchmarks = self.benchmarks.at(reference_time);
        self
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    pub fn rating_system(&self) -> &EfficiencyRatingSystem {
        &self.rating
    }

    /// Recommend from every device in the catalog.
    pub fn recommend(&self, request: &RecommendationRequest) -> Result<RecommendationReport> {
        self.recommend_from(self.catalog.devices(), request)
    }

    /// Recommend from an explicit device list.
    pub fn recommend_from(
        &self,
        devices: &[DeviceProfile],
        request: &RecommendationRequest,
    ) -> Result<RecommendationReport> {
        request.validate()?;

        let outcomes: Vec<std::result::Result<Recommendation, ExcludedDevice>> =
            devices.par_iter().map(|device| self.evaluate(device, request)).collect();

        let mut recommendations = Vec::new();
        let mut excluded = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(recommendation) => recommendations.push(recommendation),
                Err(exclusion) => excluded.push(exclusion),
            }
        }

        rank(&mut recommendations);
        excluded.sort_by(|a, b| a.device_id.cmp(&b.device_id));

        let compatible_count = recommendations.iter().filter(|r| r.suitable).count();
        let top_pick = recommendations
            .first()
            .filter(|r| r.suitable)
            .map(|r| r.device_id.clone());
        recommendations.truncate(request.max_results.unwrap_or(self.config.max_results));

        tracing::info!(
            evaluated = devices.len(),
            compatible = compatible_count,
            excluded = excluded.len(),
            top_pick = top_pick.as_deref().unwrap_or("none"),
            "recommendations assembled"
        );

        Ok(RecommendationReport {
            recommendations,
            top_pick,
            compatible_count,
            evaluated_count: devices.len(),
            excluded,
        })
    }

    /// Evaluate one device, or explain why it is left out.
    pub fn evaluate(
        &self,
        device: &DeviceProfile,
        request: &RecommendationRequest,
    ) -> std::result::Result<Recommendation, ExcludedDevice> {
        let exclude = |reason: String| {
            tracing::debug!(device = %device.id, %reason, "device excluded");
            ExcludedDevice::new(device.id.clone(), reason)
        };

        if let Err(e) = device.validate() {
            tracing::warn!(device = %device.id, error = %e, "invalid device profile");
            return Err(exclude(format!("invalid device profile: {e}")));
        }

        let rating = self.rating.rate(device, request.workload).map_err(|e| exclude(e.to_string()))?;
        if rating.confidence < self.config.min_confidence {
            return Err(exclude(format!(
                "rating confidence {:.2} below minimum {:.2}",
                rating.confidence, self.config.min_confidence
            )));
        }

        let utilization =
            calculate_utilization(request.requirement.total_bytes, device.capacity_bytes(), &self.utilization)
                .map_err(|e| exclude(e.to_string()))?;
        let fit = self.fit(&utilization).map_err(|e| exclude(e.to_string()))?;

        let price = device.specs.price_usd;
        let total_cost_usd = price * f64::from(fit.device_count);
        if let Some(budget) = request.budget_usd {
            if price <= 0.0 {
                return Err(exclude("price unknown, cannot check against budget".to_string()));
            }
            if total_cost_usd > budget {
                return Err(exclude(format!(
                    "total cost ${total_cost_usd:.0} for {} device(s) exceeds budget ${budget:.0}",
                    fit.device_count
                )));
            }
        }

        let prediction = self
            .benchmarks
            .predict_performance(&device.id, &request.target)
            .map_err(|e| exclude(e.to_string()))?;

        let efficiency_score = efficiency_score(&rating, &utilization, fit.device_count, fit.suitable);
        let rationale = vec![
            rationale::suitability(
                fit.suitable,
                fit.device_count,
                fit.multi_device.as_ref(),
                self.config.max_devices,
            ),
            rationale::utilization(&utilization, fit.multi_device.as_ref()),
            rationale::performance(&prediction, fit.device_count),
            rationale::cost(&prediction, price, total_cost_usd),
            rationale::strength(&rating),
        ];

        tracing::debug!(
            device = %device.id,
            devices = fit.device_count,
            suitable = fit.suitable,
            efficiency_score,
            "device evaluated"
        );

        Ok(Recommendation {
            device_id: device.id.clone(),
            device_name: device.name.clone(),
            device_count: fit.device_count,
            suitable: fit.suitable,
            utilization,
            multi_device: fit.multi_device,
            rating,
            prediction,
            efficiency_score,
            total_cost_usd,
            rationale,
        })
    }

    /// One device when it fits, otherwise the fewest identical devices that
    /// hold the need plus fragmentation in their post-reservation memory.
    fn fit(&self, utilization: &UtilizationResult) -> Result<Fit> {
        if utilization.fits() {
            return Ok(Fit { device_count: 1, multi_device: None, suitable: true });
        }
        let unsuitable = Fit { device_count: self.config.max_devices, multi_device: None, suitable: false };

        let per_device_gb = utilization.available_bytes / BYTES_PER_GB;
        if per_device_gb <= 0.0 {
            return Ok(unsuitable);
        }
        let needed_gb = (utilization.needed_bytes + utilization.fragmentation_bytes) / BYTES_PER_GB;
        let fit = match minimum_fitting_devices(needed_gb, per_device_gb, self.config.max_devices, &self.utilization)? {
            Some(multi) => Fit { device_count: multi.device_count, multi_device: Some(multi), suitable: true },
            None => unsuitable,
        };
        Ok(fit)
    }
}
