//! Consistency checks over assembled results.

use super::fallback::FallbackProvider;
use super::validated::{Findings, Validated, ValidationIssue};
use crate::benchmark::{PerformancePrediction, PredictionMethod};
use crate::breakdown::{validate_breakdown, MemoryBreakdown};
use crate::rating::{Dimension, EfficiencyRating, WEIGHT_SUM_TOLERANCE};
use crate::recommend::{ExcludedDevice, Recommendation, RecommendationReport};
use crate::utilization::{EfficiencyBand, UtilizationResult};
use rayon::prelude::*;

const LOW_CONFIDENCE: f64 = 0.5;
const SCORE_TOLERANCE: f64 = 1e-6;

/// Checks results before they reach callers and swaps in placeholders for
/// the ones that fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultValidator;

impl ResultValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_utilization(&self, result: &UtilizationResult) -> Findings {
        let mut findings = Findings::default();
        findings.check_non_negative("needed_bytes", result.needed_bytes);
        findings.check_range("capacity_bytes", result.capacity_bytes, f64::MIN_POSITIVE, f64::MAX);
        findings.check_non_negative("available_bytes", result.available_bytes);
        findings.check_non_negative("fragmentation_bytes", result.fragmentation_bytes);
        findings.check_non_negative("theoretical", result.theoretical);
        findings.check_range("display_theoretical", result.display_theoretical, 0.0, 10.0);
        findings.check_range("display_practical", result.display_practical, 0.0, 10.0);
        findings.check_range("utilization_percentage", result.utilization_percentage, 0.0, 1000.0);

        if result.capacity_bytes > 0.0 && result.theoretical.is_finite() {
            let expected = result.needed_bytes / result.capacity_bytes;
            if (result.theoretical - expected).abs() > 1e-9 * expected.max(1.0) {
                findings.error(ValidationIssue::Inconsistent(format!(
                    "theoretical {} differs from needed / capacity {expected}",
                    result.theoretical
                )));
            }
        }

        let practical = result.practical;
        if practical.is_nan() || practical < 0.0 {
            findings.error(ValidationIssue::OutOfRange { field: "practical", value: practical, min: 0.0, max: f64::INFINITY });
        } else if practical.is_infinite() {
            if result.available_bytes > 0.0 {
                findings.error(ValidationIssue::NonFinite { field: "practical", value: practical });
            } else {
                findings.warn("no usable memory left after reservations");
            }
        }

        if result.is_over_capacity != (practical > 1.0) {
            findings.error(ValidationIssue::Inconsistent(format!(
                "over-capacity flag {} does not match practical {practical}",
                result.is_over_capacity
            )));
        }
        if result.band != EfficiencyBand::from_practical(practical) {
            findings.error(ValidationIssue::Inconsistent(format!(
                "band {} does not match practical {practical}",
                result.band
            )));
        }

        if result.is_over_capacity && result.available_bytes > 0.0 {
            findings.warn(format!("requirement exceeds usable capacity ({:.0}%)", result.utilization_percentage));
        } else if practical > 0.95 && practical <= 1.0 {
            findings.warn("less than 5% headroom after fragmentation");
        }
        findings
    }

    pub fn validate_breakdown(&self, breakdown: &MemoryBreakdown, expected_total: Option<f64>) -> Findings {
        let check = validate_breakdown(breakdown, expected_total);
        Findings { errors: check.errors, warnings: check.warnings }
    }

    pub fn validate_rating(&self, rating: &EfficiencyRating) -> Findings {
        let mut findings = Findings::default();
        if rating.device_id.trim().is_empty() {
            findings.error(ValidationIssue::Empty { field: "device_id" });
        }
        findings.check_range("overall", rating.overall, 0.0, 100.0);
        findings.check_range("confidence", rating.confidence, 0.0, 1.0);

        let mut weight_sum = 0.0;
        let mut weighted = 0.0;
        let mut min_confidence = f64::INFINITY;
        for dimension in Dimension::ALL {
            let sub = rating.sub_score(dimension);
            findings.check_range(dimension.as_str(), sub.score, 0.0, 100.0);
            findings.check_range("weight", sub.weight, 0.0, 1.0);
            findings.check_range("sub-score confidence", sub.confidence, 0.0, 1.0);
            weight_sum += sub.weight;
            weighted += sub.weighted();
            min_confidence = min_confidence.min(sub.confidence);
        }

        if (weight_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            findings.error(ValidationIssue::Inconsistent(format!("weights sum to {weight_sum:.3}")));
        }
        if weighted.is_finite() && (rating.overall - weighted.clamp(0.0, 100.0)).abs() > SCORE_TOLERANCE {
            findings.error(ValidationIssue::Inconsistent(format!(
                "overall {:.3} differs from weighted sub-scores {weighted:.3}",
                rating.overall
            )));
        }
        if rating.confidence > min_confidence + SCORE_TOLERANCE {
            findings.error(ValidationIssue::Inconsistent(format!(
                "confidence {:.3} exceeds lowest sub-score confidence {min_confidence:.3}",
                rating.confidence
            )));
        }
        if rating.confidence < LOW_CONFIDENCE {
            findings.warn(format!("low rating confidence {:.2}", rating.confidence));
        }
        findings
    }

    pub fn validate_prediction(&self, prediction: &PerformancePrediction) -> Findings {
        let mut findings = Findings::default();
        findings.check_non_negative("throughput_tokens_per_sec", prediction.throughput_tokens_per_sec);
        findings.check_range("memory_efficiency", prediction.memory_efficiency, 0.0, 100.0);
        findings.check_non_negative("power_efficiency", prediction.power_efficiency);
        findings.check_range("confidence", prediction.confidence, 0.0, 1.0);
        findings.check_range("match_score", prediction.match_score, 0.0, 1.0);

        if prediction.method == PredictionMethod::SpecificationBased && prediction.limitations.is_empty() {
            findings.error(ValidationIssue::Empty { field: "limitations" });
        }
        if prediction.confidence < LOW_CONFIDENCE {
            findings.warn(format!("low prediction confidence {:.2}", prediction.confidence));
        }
        findings
    }

    pub fn validate_recommendation(&self, recommendation: &Recommendation) -> Findings {
        let mut findings = Findings::default();
        findings.absorb("utilization", self.validate_utilization(&recommendation.utilization));
        findings.absorb("rating", self.validate_rating(&recommendation.rating));
        findings.absorb("prediction", self.validate_prediction(&recommendation.prediction));

        if recommendation.device_count == 0 {
            findings.error(ValidationIssue::OutOfRange {
                field: "device_count",
                value: 0.0,
                min: 1.0,
                max: f64::INFINITY,
            });
        }
        findings.check_non_negative("efficiency_score", recommendation.efficiency_score);
        findings.check_non_negative("total_cost_usd", recommendation.total_cost_usd);

        if recommendation.rating.device_id != recommendation.device_id {
            findings.error(ValidationIssue::Inconsistent(format!(
                "rating belongs to '{}'",
                recommendation.rating.device_id
            )));
        }
        if let Some(multi) = &recommendation.multi_device {
            if multi.device_count != recommendation.device_count {
                findings.error(ValidationIssue::Inconsistent(format!(
                    "multi-device result covers {} devices, recommendation {}",
                    multi.device_count, recommendation.device_count
                )));
            }
        }
        if recommendation.suitable
            && recommendation.device_count == 1
            && recommendation.utilization.is_over_capacity
        {
            findings.error(ValidationIssue::Inconsistent(
                "marked suitable on one device while over capacity".to_string(),
            ));
        }
        if recommendation.rationale.is_empty() {
            findings.warn("recommendation has no rationale");
        }
        findings
    }

    /// Check every recommendation in parallel and move the invalid ones to
    /// the excluded list.
    pub fn validate_report(&self, report: RecommendationReport) -> Validated<RecommendationReport> {
        let per_recommendation: Vec<Findings> = report
            .recommendations
            .par_iter()
            .map(|r| self.validate_recommendation(r))
            .collect();

        let mut summary = Findings::default();
        let mut kept = Vec::with_capacity(report.recommendations.len());
        let mut excluded = report.excluded;
        let mut dropped_suitable = 0;

        for (recommendation, findings) in report.recommendations.into_iter().zip(per_recommendation) {
            if findings.is_valid() {
                summary.absorb(&recommendation.device_id, findings);
                kept.push(recommendation);
                continue;
            }
            tracing::warn!(
                device = %recommendation.device_id,
                errors = ?findings.errors,
                "recommendation failed validation, dropped"
            );
            excluded.push(ExcludedDevice::new(
                recommendation.device_id.clone(),
                format!("failed validation: {}", findings.errors.join("; ")),
            ));
            if recommendation.suitable {
                dropped_suitable += 1;
            }
            summary.absorb(&recommendation.device_id, findings);
        }
        excluded.sort_by(|a, b| a.device_id.cmp(&b.device_id));

        let dropped = !summary.is_valid();
        let top_pick = kept.first().filter(|r| r.suitable).map(|r| r.device_id.clone());
        if !dropped && top_pick != report.top_pick {
            summary.error(ValidationIssue::Inconsistent(format!(
                "top pick {:?} is not the first suitable recommendation",
                report.top_pick
            )));
        }

        let value = RecommendationReport {
            recommendations: kept,
            top_pick,
            compatible_count: report.compatible_count.saturating_sub(dropped_suitable),
            evaluated_count: report.evaluated_count,
            excluded,
        };
        if summary.is_valid() {
            Validated::checked(value, summary)
        } else {
            Validated::invalid(value, summary)
        }
    }

    pub fn validate_or_fallback_utilization(&self, result: UtilizationResult) -> Validated<UtilizationResult> {
        let findings = self.validate_utilization(&result);
        if findings.is_valid() {
            return Validated::checked(result, findings);
        }
        tracing::warn!(errors = ?findings.errors, "utilization failed validation, using fallback");
        Validated::fallback(FallbackProvider::utilization(result.needed_bytes, result.capacity_bytes), findings)
    }

    pub fn validate_or_fallback_breakdown(
        &self,
        breakdown: MemoryBreakdown,
        expected_total: Option<f64>,
    ) -> Validated<MemoryBreakdown> {
        let findings = self.validate_breakdown(&breakdown, expected_total);
        if findings.is_valid() {
            return Validated::checked(breakdown, findings);
        }
        tracing::warn!(errors = ?findings.errors, "breakdown failed validation, using fallback");
        let total = expected_total.unwrap_or(breakdown.total_bytes);
        Validated::fallback(FallbackProvider::breakdown(total), findings)
    }

    pub fn validate_or_fallback_rating(&self, rating: EfficiencyRating) -> Validated<EfficiencyRating> {
        let findings = self.validate_rating(&rating);
        if findings.is_valid() {
            return Validated::checked(rating, findings);
        }
        tracing::warn!(device = %rating.device_id, errors = ?findings.errors, "rating failed validation, using fallback");
        Validated::fallback(
            FallbackProvider::rating(&rating.device_id, &rating.device_name, rating.workload),
            findings,
        )
    }

    pub fn validate_or_fallback_prediction(
        &self,
        prediction: PerformancePrediction,
    ) -> Validated<PerformancePrediction> {
        let findings = self.validate_prediction(&prediction);
        if findings.is_valid() {
            return Validated::checked(prediction, findings);
        }
        tracing::warn!(
            device = %prediction.device_id,
            errors = ?findings.errors,
            "prediction failed validation, using fallback"
        );
        Validated::fallback(FallbackProvider::prediction(&prediction.device_id, &prediction.target), findings)
    }
}
