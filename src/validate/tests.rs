//! Tests for validate module

use super::*;
use crate::benchmark::{BenchmarkProcessor, PredictionMethod, TargetParams, MIN_CONFIDENCE};
use crate::breakdown::{MemoryBreakdownCalculator, UNAVAILABLE_LABEL};
use crate::catalog::{DeviceCatalog, DeviceProfile, DeviceSpecs};
use crate::rating::EfficiencyRatingSystem;
use crate::recommend::{RecommendationEngine, RecommendationRequest};
use crate::requirement::MemoryRequirement;
use crate::units::BYTES_PER_GB;
use crate::utilization::{calculate_utilization, EfficiencyBand, UtilizationConfig};
use crate::workload::Workload;
use approx::assert_relative_eq;

fn device(id: &str, memory_gb: f64, price_usd: f64) -> DeviceProfile {
    DeviceProfile::new(
        id,
        id.to_uppercase(),
        DeviceSpecs {
            memory_gb,
            memory_bandwidth_gbps: 900.0,
            fp16_tflops: 120.0,
            tdp_watts: 300.0,
            price_usd,
        },
    )
}

fn catalog() -> DeviceCatalog {
    DeviceCatalog::from_parts(
        vec![device("a", 24.0, 1500.0), device("b", 48.0, 5000.0), device("c", 80.0, 12000.0)],
        Vec::new(),
    )
    .unwrap()
}

// =============================================================================
// Utilization
// =============================================================================

#[test]
fn test_valid_utilization_passes() {
    let result =
        calculate_utilization(16.0 * BYTES_PER_GB, 24.0 * BYTES_PER_GB, &UtilizationConfig::default()).unwrap();
    let validated = ResultValidator::new().validate_or_fallback_utilization(result.clone());
    assert!(validated.is_valid);
    assert!(!validated.is_fallback);
    assert!(validated.errors.is_empty());
    assert!(validated.warnings.is_empty());
    assert_eq!(validated.value, result);
}

#[test]
fn test_no_usable_memory_is_a_warning() {
    let result = calculate_utilization(BYTES_PER_GB, 0.5 * BYTES_PER_GB, &UtilizationConfig::default()).unwrap();
    let findings = ResultValidator::new().validate_utilization(&result);
    assert!(findings.is_valid());
    assert_eq!(findings.warnings.len(), 1);
    assert!(findings.warnings[0].contains("no usable memory"));
}

#[test]
fn test_tight_fit_warns() {
    let result = calculate_utilization(97.0, 100.0, &UtilizationConfig::zero()).unwrap();
    let findings = ResultValidator::new().validate_utilization(&result);
    assert!(findings.is_valid());
    assert!(findings.warnings[0].contains("headroom"));
}

#[test]
fn test_inconsistent_band_falls_back() {
    let mut result = calculate_utilization(30.0, 20.0, &UtilizationConfig::zero()).unwrap();
    result.band = EfficiencyBand::Excellent;

    let validated = ResultValidator::new().validate_or_fallback_utilization(result);
    assert!(!validated.is_valid);
    assert!(validated.is_fallback);
    assert!(validated.errors.iter().any(|e| e.contains("band")));
    assert_eq!(validated.value.band, EfficiencyBand::Poor);
    assert_eq!(validated.value.practical, 0.0);
    assert_eq!(validated.value.needed_bytes, 30.0);
    assert!(!validated.value.is_over_capacity);
}

#[test]
fn test_non_finite_values_rejected() {
    let mut result = calculate_utilization(10.0, 20.0, &UtilizationConfig::zero()).unwrap();
    result.theoretical = f64::NAN;
    result.practical = -1.0;
    let findings = ResultValidator::new().validate_utilization(&result);
    assert!(!findings.is_valid());
    assert!(findings.errors.iter().any(|e| e.contains("theoretical is not finite")));
    assert!(findings.errors.iter().any(|e| e.contains("practical out of range")));
}

// =============================================================================
// Breakdown
// =============================================================================

#[test]
fn test_breakdown_fallback_is_single_unavailable_bucket() {
    let calculator = MemoryBreakdownCalculator::new();
    let mut breakdown = calculator.from_components(&[("Model Weights", 60.0), ("Activations", 40.0)]).unwrap();
    let validator = ResultValidator::new();
    assert!(validator.validate_or_fallback_breakdown(breakdown.clone(), Some(100.0)).is_valid);

    breakdown.entries[1].bytes = -5.0;
    let validated = validator.validate_or_fallback_breakdown(breakdown, Some(100.0));
    assert!(validated.is_fallback);
    assert_eq!(validated.value.entries.len(), 1);
    let entry = &validated.value.entries[0];
    assert_eq!(entry.label, UNAVAILABLE_LABEL);
    assert_eq!(entry.percentage, 100.0);
    assert_eq!(entry.bytes, 100.0);
    assert!(validator.validate_breakdown(&validated.value, Some(100.0)).is_valid());
}

#[test]
fn test_breakdown_tolerance_breach_stays_valid() {
    let breakdown = MemoryBreakdownCalculator::new().from_components(&[("Total", 100.0)]).unwrap();
    let validated = ResultValidator::new().validate_or_fallback_breakdown(breakdown, Some(150.0));
    assert!(validated.is_valid);
    assert!(!validated.is_fallback);
    assert_eq!(validated.warnings.len(), 1);
}

// =============================================================================
// Rating and prediction
// =============================================================================

#[test]
fn test_rating_checks() {
    let catalog = catalog();
    let rating = EfficiencyRatingSystem::default()
        .rate(catalog.device("a").unwrap(), Workload::Training)
        .unwrap();
    let validator = ResultValidator::new();

    let findings = validator.validate_rating(&rating);
    assert!(findings.is_valid());
    // No benchmarks, so confidence is reduced
    assert!(findings.warnings.iter().any(|w| w.contains("low rating confidence")));

    let mut tampered = rating.clone();
    tampered.overall += 10.0;
    let validated = validator.validate_or_fallback_rating(tampered);
    assert!(validated.is_fallback);
    assert!(validated.errors.iter().any(|e| e.contains("weighted sub-scores")));
    assert_eq!(validated.value.overall, 0.0);
    assert_eq!(validated.value.device_id, "a");
    assert_eq!(validated.value.workload, Workload::Training);
    assert_relative_eq!(validated.value.confidence, MIN_CONFIDENCE);
    assert!(validator.validate_rating(&validated.value).is_valid());
}

#[test]
fn test_prediction_checks() {
    let catalog = catalog();
    let processor = BenchmarkProcessor::with_defaults(&catalog);
    let prediction = processor.predict_performance("a", &TargetParams::default()).unwrap();
    let validator = ResultValidator::new();
    assert!(validator.validate_prediction(&prediction).is_valid());

    let mut broken = prediction;
    broken.limitations.clear();
    broken.throughput_tokens_per_sec = f64::INFINITY;
    let validated = validator.validate_or_fallback_prediction(broken);
    assert!(validated.is_fallback);
    assert_eq!(validated.errors.len(), 2);
    assert_eq!(validated.value.method, PredictionMethod::SpecificationBased);
    assert_eq!(validated.value.throughput_tokens_per_sec, 0.0);
    assert!(!validated.value.limitations.is_empty());
}

// =============================================================================
// Reports
// =============================================================================

fn report() -> crate::recommend::RecommendationReport {
    let catalog = catalog();
    let engine = RecommendationEngine::with_defaults(&catalog);
    let request = RecommendationRequest::new(MemoryRequirement::from_gb(16.0).unwrap(), Workload::Inference);
    engine.recommend(&request).unwrap()
}

#[test]
fn test_valid_report_passes_unchanged() {
    let report = report();
    let validated = ResultValidator::new().validate_report(report.clone());
    assert!(validated.is_valid);
    assert!(!validated.is_fallback);
    assert_eq!(validated.value, report);
}

#[test]
fn test_invalid_recommendation_moved_to_excluded() {
    let mut report = report();
    let first = report.recommendations[0].device_id.clone();
    report.recommendations[0].efficiency_score = f64::NAN;

    let validated = ResultValidator::new().validate_report(report.clone());
    assert!(!validated.is_valid);
    // the remaining recommendations are real results, not placeholders
    assert!(!validated.is_fallback);
    assert_eq!(validated.value.recommendations.len(), report.recommendations.len() - 1);
    assert_eq!(validated.value.compatible_count, report.compatible_count - 1);
    assert_ne!(validated.value.top_pick.as_deref(), Some(first.as_str()));
    assert_eq!(validated.value.top_pick, Some(validated.value.recommendations[0].device_id.clone()));

    let excluded = validated.value.excluded.iter().find(|e| e.device_id == first).unwrap();
    assert!(excluded.reason.starts_with("failed validation"));
    assert!(validated.errors[0].starts_with(&first));
}

#[test]
fn test_wrong_top_pick_is_reported() {
    let mut report = report();
    report.top_pick = Some("nonexistent".to_string());
    let validated = ResultValidator::new().validate_report(report);
    assert!(!validated.is_valid);
    assert!(!validated.is_fallback);
    assert!(validated.errors[0].contains("top pick"));
    assert_eq!(validated.value.top_pick, Some(validated.value.recommendations[0].device_id.clone()));
}

#[test]
fn test_invalid_keeps_value_without_fallback_flag() {
    let mut findings = Findings::default();
    findings.error(ValidationIssue::Inconsistent("dropped one entry".to_string()));
    findings.warn("low confidence");

    let validated = Validated::invalid(vec![1, 2], findings);
    assert!(!validated.is_valid);
    assert!(!validated.is_fallback);
    assert_eq!(validated.value, vec![1, 2]);
    assert_eq!(validated.errors.len(), 1);
    assert_eq!(validated.warnings, vec!["low confidence".to_string()]);
}
