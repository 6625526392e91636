//! Tests for utilization module

use super::*;
use crate::units::BYTES_PER_GB;
use approx::assert_relative_eq;

fn gb(v: f64) -> f64 {
    v * BYTES_PER_GB
}

// =============================================================================
// Single-device utilization
// =============================================================================

#[test]
fn test_practical_accounts_for_overheads() {
    let result = calculate_utilization(gb(16.0), gb(24.0), &UtilizationConfig::default()).unwrap();

    assert_relative_eq!(result.theoretical, 16.0 / 24.0);
    // (16 × 1.1) / (24 − 0.8)
    assert_relative_eq!(result.practical, 17.6 / 23.2, epsilon = 1e-12);
    assert_relative_eq!(result.utilization_percentage, 1760.0 / 23.2, epsilon = 1e-9);
    assert_eq!(result.band, EfficiencyBand::Excellent);
    assert!(!result.is_over_capacity);
    assert!(result.fits());
}

#[test]
fn test_zero_overhead_practical_equals_theoretical() {
    let result = calculate_utilization(gb(12.0), gb(24.0), &UtilizationConfig::zero()).unwrap();
    assert_relative_eq!(result.practical, result.theoretical);
    assert_eq!(result.band, EfficiencyBand::Good);
}

#[test]
fn test_over_capacity() {
    let result = calculate_utilization(gb(30.0), gb(24.0), &UtilizationConfig::default()).unwrap();
    assert!(result.is_over_capacity);
    assert_eq!(result.band, EfficiencyBand::Poor);
    assert_relative_eq!(result.theoretical, 1.25);
    assert_eq!(result.headroom_bytes(), 0.0);
}

#[test]
fn test_reserved_exceeds_capacity_gives_infinite_practical() {
    let result = calculate_utilization(gb(0.1), gb(0.5), &UtilizationConfig::default()).unwrap();
    assert_eq!(result.available_bytes, 0.0);
    assert!(result.practical.is_infinite());
    assert_eq!(result.display_practical, 10.0);
    assert_eq!(result.utilization_percentage, 1000.0);
    assert!(result.is_over_capacity);
    assert_eq!(result.band, EfficiencyBand::Poor);
}

#[test]
fn test_display_values_clamped() {
    let result = calculate_utilization(gb(500.0), gb(24.0), &UtilizationConfig::zero()).unwrap();
    assert!(result.theoretical > 10.0);
    assert_eq!(result.display_theoretical, 10.0);
    assert_eq!(result.display_practical, 10.0);
    assert_eq!(result.utilization_percentage, 1000.0);
}

#[test]
fn test_zero_need() {
    let result = calculate_utilization(0.0, gb(24.0), &UtilizationConfig::default()).unwrap();
    assert_eq!(result.theoretical, 0.0);
    assert_eq!(result.practical, 0.0);
    assert_eq!(result.band, EfficiencyBand::Poor);
}

#[test]
fn test_invalid_inputs_rejected() {
    let config = UtilizationConfig::default();
    assert!(calculate_utilization(-1.0, gb(24.0), &config).is_err());
    assert!(calculate_utilization(gb(1.0), 0.0, &config).is_err());
    assert!(calculate_utilization(gb(1.0), -5.0, &config).is_err());
    assert!(calculate_utilization(f64::NAN, gb(24.0), &config).is_err());
    assert!(calculate_utilization(gb(1.0), f64::INFINITY, &config).is_err());
}

#[test]
fn test_invalid_config_rejected() {
    let config = UtilizationConfig::default().with_fragmentation_factor(-0.1);
    assert!(calculate_utilization(gb(1.0), gb(24.0), &config).is_err());
    assert!(UtilizationCalculator::new(config).is_err());
}

#[test]
fn test_calculator_gb_matches_bytes() {
    let calc = UtilizationCalculator::default();
    let a = calc.calculate_gb(16.0, 24.0).unwrap();
    let b = calc.calculate(gb(16.0), gb(24.0)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_legacy_adapter() {
    let result = calculate_utilization(gb(16.0), gb(24.0), &UtilizationConfig::default()).unwrap();
    let legacy = LegacyUtilization::from(&result);
    assert_relative_eq!(legacy.utilization, result.utilization_percentage);
    assert!(!legacy.over_capacity);
    assert_eq!(legacy.efficiency, "excellent");
}

// =============================================================================
// Band boundaries
// =============================================================================

#[test]
fn test_band_boundaries() {
    let cases = [
        (0.0, EfficiencyBand::Poor),
        (0.2999, EfficiencyBand::Poor),
        (0.30, EfficiencyBand::Fair),
        (0.4999, EfficiencyBand::Fair),
        (0.50, EfficiencyBand::Good),
        (0.6999, EfficiencyBand::Good),
        (0.70, EfficiencyBand::Excellent),
        (0.85, EfficiencyBand::Excellent),
        (0.8501, EfficiencyBand::Good),
        (0.95, EfficiencyBand::Good),
        (0.9501, EfficiencyBand::Fair),
        (1.00, EfficiencyBand::Fair),
        (1.0001, EfficiencyBand::Poor),
        (-0.1, EfficiencyBand::Poor),
        (f64::NAN, EfficiencyBand::Poor),
        (f64::INFINITY, EfficiencyBand::Poor),
    ];
    for (practical, expected) in cases {
        assert_eq!(EfficiencyBand::from_practical(practical), expected, "practical={practical}");
    }
}

// =============================================================================
// Safety margin
// =============================================================================

#[test]
fn test_safety_margin_sweet_spot() {
    let analysis = calculate_with_safety_margin(16.0, 24.0, &UtilizationConfig::default()).unwrap();
    assert_relative_eq!(analysis.safety_gb, 2.4, epsilon = 1e-12);
    assert_relative_eq!(analysis.available_gb, 20.8, epsilon = 1e-12);
    assert_relative_eq!(analysis.utilization, 17.6 / 20.8, epsilon = 1e-12);
    assert_eq!(analysis.band, EfficiencyBand::Excellent);
    assert_eq!(analysis.score, 100.0);
    assert!(analysis.fits);
    assert!(analysis.recommendations.is_empty());
}

#[test]
fn test_safety_margin_underused_recommends_smaller() {
    let analysis = calculate_with_safety_margin(4.0, 80.0, &UtilizationConfig::default()).unwrap();
    assert!(analysis.utilization < 0.5);
    assert_eq!(analysis.score, 0.0);
    assert!(analysis.recommendations.iter().any(|r| r.contains("smaller device")));
}

#[test]
fn test_safety_margin_tight_recommends_larger() {
    let analysis = calculate_with_safety_margin(70.0, 80.0, &UtilizationConfig::default()).unwrap();
    assert!(!analysis.fits);
    assert!(analysis.recommendations.iter().any(|r| r.contains("larger device")));
    assert!(analysis.recommendations.iter().any(|r| r.contains("exceeds safe capacity")));
    assert!(analysis.score > 0.0 && analysis.score < 10.0);
}

#[test]
fn test_advisory_score_shape() {
    assert_eq!(advisory_score(0.775), 100.0);
    assert_relative_eq!(advisory_score(0.5), 60.0, epsilon = 1e-9);
    assert_relative_eq!(advisory_score(0.95), 60.0, epsilon = 1e-9);
    assert_eq!(advisory_score(0.1), 0.0);
    assert_eq!(advisory_score(1.2), 0.0);
    assert_eq!(advisory_score(f64::INFINITY), 0.0);
}

// =============================================================================
// Multi-device
// =============================================================================

#[test]
fn test_multi_device_two_devices() {
    let result = calculate_multi_device_efficiency(48.0, 24.0, 2, &UtilizationConfig::default()).unwrap();

    assert_relative_eq!(result.load_balancing_efficiency, 0.95);
    assert!(result.communication_overhead_gb > 0.0);
    assert!(result.scaling_factor < 2.0);
    assert_relative_eq!(result.communication_overhead_gb, 2.4, epsilon = 1e-12);
    assert_relative_eq!(result.effective_capacity_gb, 45.6, epsilon = 1e-12);
    assert_relative_eq!(result.scaling_factor, 45.6 * 0.95 / 24.0, epsilon = 1e-12);
    assert!(!result.fits);
    assert_eq!(result.optimal_device_count, 2);
}

#[test]
fn test_multi_device_uncertainty_band() {
    let result = calculate_multi_device_efficiency(48.0, 24.0, 2, &UtilizationConfig::default()).unwrap();
    let band = result.per_device_utilization;
    assert_relative_eq!(band.expected, 48.0 / 45.6, epsilon = 1e-12);
    assert!(band.min < band.expected && band.expected < band.max);
    assert_relative_eq!(band.max - band.expected, band.expected * 0.05, epsilon = 1e-12);

    let single = calculate_multi_device_efficiency(12.0, 24.0, 1, &UtilizationConfig::default()).unwrap();
    assert_eq!(single.per_device_utilization.min, single.per_device_utilization.max);
}

#[test]
fn test_load_balancing_steps() {
    let cases = [(1, 1.0), (2, 0.95), (3, 0.90), (4, 0.90), (5, 0.85), (8, 0.85), (9, 0.80), (64, 0.80)];
    for (count, expected) in cases {
        assert_relative_eq!(load_balancing_efficiency(count), expected);
    }
}

#[test]
fn test_optimal_device_count_consolidates_under_heavy_overhead() {
    let heavy = UtilizationConfig::default().with_communication_overhead(0.15);
    assert_eq!(optimal_device_count(200.0, 24.0, &heavy), 8);
    assert_eq!(optimal_device_count(200.0, 24.0, &UtilizationConfig::default()), 9);

    let extreme = UtilizationConfig::default().with_communication_overhead(0.3);
    assert_eq!(optimal_device_count(40.0, 24.0, &extreme), 2);
    assert_eq!(optimal_device_count(60.0, 24.0, &extreme), 2);
}

#[test]
fn test_minimum_fitting_devices() {
    let config = UtilizationConfig::default();
    let result = minimum_fitting_devices(40.0, 24.0, 8, &config).unwrap().unwrap();
    assert_eq!(result.device_count, 2);
    assert!(result.fits);

    assert!(minimum_fitting_devices(1000.0, 24.0, 4, &config).unwrap().is_none());
}

#[test]
fn test_multi_device_rejects_zero_devices() {
    assert!(calculate_multi_device_efficiency(48.0, 24.0, 0, &UtilizationConfig::default()).is_err());
    assert!(calculate_multi_device_efficiency(48.0, 0.0, 2, &UtilizationConfig::default()).is_err());
}

// =============================================================================
// Allocation simulator
// =============================================================================

#[test]
fn test_allocation_priority_order_and_failure() {
    let requests = vec![
        AllocationRequest::new("a", 300, AllocationCategory::Weights).with_alignment(1).with_priority(1),
        AllocationRequest::new("b", 200, AllocationCategory::Workspace)
            .with_alignment(1)
            .with_priority(5)
            .transient(),
        AllocationRequest::new("c", 400, AllocationCategory::KvCache).with_alignment(1).with_priority(3),
        AllocationRequest::new("d", 200, AllocationCategory::Activations).with_alignment(1),
    ];

    let report = AllocationSimulator::new(1000).unwrap().simulate(&requests);

    let ids: Vec<_> = report.placements.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c", "a"]);
    assert_eq!(report.placements[0].offset, 0);
    assert_eq!(report.placements[1].offset, 200);
    assert_eq!(report.placements[2].offset, 600);

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].id, "d");
    assert!(!report.all_succeeded());
    assert_eq!(report.succeeded(), 3);

    // a single release: the peak is the final state
    assert_relative_eq!(report.peak_fragmentation_ratio, report.fragmentation_ratio);
    // transient "b" leaves a 200-byte hole at the front, 100 bytes free at the end
    assert_eq!(report.total_free_bytes, 300);
    assert_eq!(report.largest_free_block, 200);
    assert_relative_eq!(report.fragmentation_ratio, 1.0 - 200.0 / 300.0);
    assert_eq!(report.bytes_by_category.get(&AllocationCategory::Workspace), None);
    assert_eq!(report.bytes_by_category[&AllocationCategory::KvCache], 400);
}

#[test]
fn test_allocation_alignment_waste() {
    let requests = vec![AllocationRequest::new("x", 100, AllocationCategory::Other).with_alignment(256)];
    let report = AllocationSimulator::new(4096).unwrap().simulate(&requests);
    assert_eq!(report.placements[0].aligned_bytes, 256);
    assert_eq!(report.wasted_bytes, 156);
    assert_eq!(report.peak_allocated_bytes, 256);
}

#[test]
fn test_allocation_released_neighbours_coalesce() {
    let requests = vec![
        AllocationRequest::new("t1", 300, AllocationCategory::Workspace).with_alignment(1).with_priority(9).transient(),
        AllocationRequest::new("t2", 300, AllocationCategory::Workspace).with_alignment(1).with_priority(8).transient(),
        AllocationRequest::new("p", 400, AllocationCategory::Weights).with_alignment(1).with_priority(1),
    ];
    let report = AllocationSimulator::new(1000).unwrap().simulate(&requests);
    assert!(report.all_succeeded());
    assert_eq!(report.largest_free_block, 600);
    assert_eq!(report.fragmentation_ratio, 0.0);
}

#[test]
fn test_allocation_peak_fragmentation_during_release() {
    let requests = vec![
        AllocationRequest::new("p1", 100, AllocationCategory::Weights).with_alignment(1),
        AllocationRequest::new("t1", 100, AllocationCategory::Activations).with_alignment(1).transient(),
        AllocationRequest::new("p2", 100, AllocationCategory::Weights).with_alignment(1),
        AllocationRequest::new("t2", 100, AllocationCategory::Workspace).with_alignment(1).transient(),
    ];
    let report = AllocationSimulator::new(1000).unwrap().simulate(&requests);
    assert!(report.all_succeeded());

    // after "t1": a 100-byte hole and the 600-byte tail
    assert_relative_eq!(report.peak_fragmentation_ratio, 1.0 - 600.0 / 700.0);
    // "t2" then merges into the tail
    assert_eq!(report.largest_free_block, 700);
    assert_relative_eq!(report.fragmentation_ratio, 1.0 - 700.0 / 800.0);
    assert!(report.peak_fragmentation_ratio > report.fragmentation_ratio);
}

#[test]
fn test_allocation_peak_fragmentation_zero_without_transients() {
    let requests = vec![
        AllocationRequest::new("w", 300, AllocationCategory::Weights).with_alignment(1),
        AllocationRequest::new("kv", 200, AllocationCategory::KvCache).with_alignment(1),
    ];
    let report = AllocationSimulator::new(1000).unwrap().simulate(&requests);
    assert_eq!(report.peak_fragmentation_ratio, 0.0);
    assert_eq!(report.fragmentation_ratio, 0.0);
}

#[test]
fn test_allocation_equal_priority_keeps_input_order() {
    let requests = vec![
        AllocationRequest::new("first", 10, AllocationCategory::Other).with_alignment(1),
        AllocationRequest::new("second", 10, AllocationCategory::Other).with_alignment(1),
    ];
    let report = AllocationSimulator::new(100).unwrap().simulate(&requests);
    assert_eq!(report.placements[0].id, "first");
    assert_eq!(report.placements[1].offset, 10);
}

#[test]
fn test_allocation_zero_capacity_rejected() {
    assert!(AllocationSimulator::new(0).is_err());
}

// =============================================================================
// Fragmentation predictor
// =============================================================================

#[test]
fn test_fragmentation_baseline() {
    let history = AllocationHistory {
        allocation_sizes: vec![100.0; 10],
        frequencies: vec![],
        deallocation_pattern: DeallocationPattern::Sequential,
        peak_memory_ratio: 0.5,
    };
    let prediction = predict_fragmentation(&history).unwrap();
    assert_relative_eq!(prediction.expected_fragmentation, 0.05);
    assert_eq!(prediction.risk, FragmentationRisk::Low);
    assert!(prediction.suggestions.is_empty());
    assert_relative_eq!(prediction.confidence, 0.3 + 0.7 * 0.2, epsilon = 1e-12);
}

#[test]
fn test_fragmentation_all_risk_factors() {
    let history = AllocationHistory {
        allocation_sizes: vec![10.0, 1000.0],
        frequencies: vec![1.0, 1.0],
        deallocation_pattern: DeallocationPattern::Random,
        peak_memory_ratio: 0.9,
    };
    let prediction = predict_fragmentation(&history).unwrap();
    assert_relative_eq!(prediction.expected_fragmentation, 0.24, epsilon = 1e-12);
    assert!(prediction.expected_fragmentation <= 0.25);
    assert_eq!(prediction.risk, FragmentationRisk::High);
    assert_eq!(prediction.suggestions.len(), 4);
}

#[test]
fn test_fragmentation_medium_risk_from_random_release() {
    let history = AllocationHistory {
        allocation_sizes: vec![100.0, 110.0],
        frequencies: vec![],
        deallocation_pattern: DeallocationPattern::Random,
        peak_memory_ratio: 0.4,
    };
    let prediction = predict_fragmentation(&history).unwrap();
    assert_relative_eq!(prediction.expected_fragmentation, 0.11, epsilon = 1e-12);
    assert_eq!(prediction.risk, FragmentationRisk::Medium);
    assert!(!prediction.suggestions.is_empty());
}

#[test]
fn test_fragmentation_confidence_trends() {
    let uniform = |n: usize| AllocationHistory {
        allocation_sizes: vec![64.0; n],
        peak_memory_ratio: 0.5,
        ..Default::default()
    };
    let few = predict_fragmentation(&uniform(5)).unwrap().confidence;
    let many = predict_fragmentation(&uniform(100)).unwrap().confidence;
    assert!(many > few);

    let dispersed = AllocationHistory {
        allocation_sizes: (0..100).map(|i| if i % 10 == 0 { 10_000.0 } else { 1.0 }).collect(),
        peak_memory_ratio: 0.5,
        ..Default::default()
    };
    let dispersed_conf = predict_fragmentation(&dispersed).unwrap().confidence;
    assert!(dispersed_conf < many);
}

#[test]
fn test_fragmentation_rejects_negative_sizes() {
    let history = AllocationHistory {
        allocation_sizes: vec![-1.0],
        peak_memory_ratio: 0.5,
        ..Default::default()
    };
    assert!(predict_fragmentation(&history).is_err());
}

#[test]
fn test_fragmentation_empty_history_is_baseline() {
    let prediction = predict_fragmentation(&AllocationHistory::default()).unwrap();
    assert_relative_eq!(prediction.expected_fragmentation, fragmentation::BASELINE_FRAGMENTATION);
    assert!(prediction.confidence >= 0.1);
}
