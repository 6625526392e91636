//! Property-based tests for utilization

use super::*;
use crate::units::BYTES_PER_GB;
use proptest::prelude::*;

fn arb_config() -> impl Strategy<Value = UtilizationConfig> {
    (0.0f64..0.5, 0.0f64..2.0, 0.0f64..1.0, 0.0f64..0.3, 0.0f64..0.2).prop_map(
        |(ff, reserved, driver, safety, comm)| {
            UtilizationConfig::default()
                .with_fragmentation_factor(ff)
                .with_system_reserved_gb(reserved)
                .with_driver_overhead_gb(driver)
                .with_safety_margin(safety)
                .with_communication_overhead(comm)
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_theoretical_is_exact_ratio(needed in 0.0f64..200.0, capacity in 1.0f64..200.0) {
        let result = calculate_utilization(
            needed * BYTES_PER_GB,
            capacity * BYTES_PER_GB,
            &UtilizationConfig::default(),
        ).unwrap();
        let expected = needed / capacity;
        prop_assert!((result.theoretical - expected).abs() <= 1e-12 * expected.max(1.0));
    }

    #[test]
    fn prop_practical_at_least_theoretical(
        needed in 0.0f64..200.0,
        capacity in 1.0f64..200.0,
        config in arb_config(),
    ) {
        let result = calculate_utilization(needed * BYTES_PER_GB, capacity * BYTES_PER_GB, &config).unwrap();
        prop_assert!(result.practical >= result.theoretical - 1e-12);
    }

    #[test]
    fn prop_practical_monotone_in_fragmentation(
        needed in 1.0f64..100.0,
        capacity in 10.0f64..200.0,
        low in 0.0f64..0.45,
        delta in 0.0f64..0.5,
    ) {
        let high = (low + delta).min(0.99);
        let a = calculate_utilization(
            needed * BYTES_PER_GB,
            capacity * BYTES_PER_GB,
            &UtilizationConfig::default().with_fragmentation_factor(low),
        ).unwrap();
        let b = calculate_utilization(
            needed * BYTES_PER_GB,
            capacity * BYTES_PER_GB,
            &UtilizationConfig::default().with_fragmentation_factor(high),
        ).unwrap();
        prop_assert!(b.practical >= a.practical);
    }

    #[test]
    fn prop_practical_monotone_in_need(
        needed in 0.0f64..100.0,
        extra in 0.0f64..100.0,
        capacity in 10.0f64..200.0,
        config in arb_config(),
    ) {
        let a = calculate_utilization(needed * BYTES_PER_GB, capacity * BYTES_PER_GB, &config).unwrap();
        let b = calculate_utilization((needed + extra) * BYTES_PER_GB, capacity * BYTES_PER_GB, &config).unwrap();
        prop_assert!(b.practical >= a.practical);
        prop_assert!(b.theoretical >= a.theoretical);
    }

    #[test]
    fn prop_display_values_bounded(needed in 0.0f64..10_000.0, capacity in 0.1f64..200.0, config in arb_config()) {
        let result = calculate_utilization(needed * BYTES_PER_GB, capacity * BYTES_PER_GB, &config).unwrap();
        prop_assert!((0.0..=10.0).contains(&result.display_practical));
        prop_assert!((0.0..=10.0).contains(&result.display_theoretical));
        prop_assert!((0.0..=1000.0).contains(&result.utilization_percentage));
        prop_assert_eq!(result.is_over_capacity, result.practical > 1.0);
    }

    #[test]
    fn prop_advisory_score_bounded(u in -1.0f64..5.0) {
        let score = advisory_score(u);
        prop_assert!((0.0..=100.0).contains(&score));
    }

    #[test]
    fn prop_scaling_below_device_count(count in 1u32..32, per_device in 8.0f64..192.0, config in arb_config()) {
        let result = calculate_multi_device_efficiency(per_device, per_device, count, &config).unwrap();
        prop_assert!(result.scaling_factor <= f64::from(count) + 1e-9);
        prop_assert!(result.usable_capacity_gb <= result.total_capacity_gb + 1e-9);
        prop_assert!(result.per_device_utilization.min <= result.per_device_utilization.max);
    }

    #[test]
    fn prop_load_balancing_non_increasing(count in 1u32..64) {
        prop_assert!(load_balancing_efficiency(count + 1) <= load_balancing_efficiency(count));
    }

    #[test]
    fn prop_optimal_count_at_least_one(needed in 0.0f64..2000.0, per_device in 1.0f64..192.0, config in arb_config()) {
        let count = optimal_device_count(needed, per_device, &config);
        prop_assert!(count >= 1);
        let base = ((needed / per_device).ceil() as u32).max(1);
        prop_assert!(count == base || count + 1 == base);
    }

    #[test]
    fn prop_simulator_never_overcommits(
        sizes in proptest::collection::vec((1u64..4096, 0u32..4, any::<bool>()), 0..40),
        capacity in 1024u64..65_536,
    ) {
        let requests: Vec<_> = sizes
            .iter()
            .enumerate()
            .map(|(i, &(size, priority, transient))| {
                let req = AllocationRequest::new(format!("r{i}"), size, AllocationCategory::Other)
                    .with_priority(priority);
                if transient { req.transient() } else { req }
            })
            .collect();
        let report = AllocationSimulator::new(capacity).unwrap().simulate(&requests);

        prop_assert_eq!(report.succeeded() + report.failed.len(), requests.len());
        prop_assert!(report.peak_allocated_bytes <= capacity);
        prop_assert!((0.0..1.0).contains(&report.fragmentation_ratio));
        prop_assert!(report.peak_fragmentation_ratio < 1.0);
        prop_assert!(report.peak_fragmentation_ratio >= report.fragmentation_ratio);
        prop_assert!(report.largest_free_block <= report.total_free_bytes);

        let persistent: u64 = report.bytes_by_category.values().sum();
        prop_assert_eq!(persistent + report.total_free_bytes, capacity);
    }

    #[test]
    fn prop_fragmentation_prediction_bounded(
        sizes in proptest::collection::vec(0.0f64..1e9, 0..100),
        peak in 0.0f64..1.5,
        random in any::<bool>(),
    ) {
        let history = AllocationHistory {
            allocation_sizes: sizes,
            frequencies: vec![],
            deallocation_pattern: if random { DeallocationPattern::Random } else { DeallocationPattern::Sequential },
            peak_memory_ratio: peak,
        };
        let prediction = predict_fragmentation(&history).unwrap();
        prop_assert!((0.05..=0.25).contains(&prediction.expected_fragmentation));
        prop_assert!((0.1..=1.0).contains(&prediction.confidence));
    }
}
