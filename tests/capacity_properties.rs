//! Property tests across the sizing pipeline

use dimensionar::breakdown::{MemoryBreakdownCalculator, PERCENTAGE_SUM_TOLERANCE};
use dimensionar::units::BYTES_PER_GB;
use dimensionar::utilization::minimum_fitting_devices;
use dimensionar::{calculate_utilization, MemoryRequirement, ModelSpec, Precision, ResultValidator, UtilizationConfig, Workload};
use proptest::prelude::*;

fn precision() -> impl Strategy<Value = Precision> {
    prop_oneof![
        Just(Precision::Fp32),
        Just(Precision::Fp16),
        Just(Precision::Bf16),
        Just(Precision::Int8),
        Just(Precision::Int4),
    ]
}

fn workload() -> impl Strategy<Value = Workload> {
    prop_oneof![Just(Workload::Inference), Just(Workload::Training), Just(Workload::Mixed)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_estimated_breakdown_sums_to_100(
        params in 0.1f64..200.0,
        precision in precision(),
        workload in workload(),
        batch in 1u32..16,
    ) {
        let model = ModelSpec::new(params).with_precision(precision).with_batch_size(batch);
        let requirement = MemoryRequirement::estimate(&model, workload).unwrap();
        let breakdown = MemoryBreakdownCalculator::new().from_requirement(&requirement).unwrap();

        prop_assert!((breakdown.percentage_sum() - 100.0).abs() <= PERCENTAGE_SUM_TOLERANCE);
        let findings = ResultValidator::new().validate_breakdown(&breakdown, Some(requirement.total_bytes));
        prop_assert!(findings.is_valid(), "{:?}", findings.errors);
    }

    #[test]
    fn prop_training_needs_at_least_inference(params in 0.1f64..200.0, precision in precision()) {
        let model = ModelSpec::new(params).with_precision(precision);
        let inference = MemoryRequirement::estimate(&model, Workload::Inference).unwrap();
        let training = MemoryRequirement::estimate(&model, Workload::Training).unwrap();
        prop_assert!(training.total_bytes >= inference.total_bytes);
    }

    #[test]
    fn prop_utilization_results_validate(needed_gb in 0.0f64..500.0, capacity_gb in 1.0f64..256.0) {
        let result = calculate_utilization(
            needed_gb * BYTES_PER_GB,
            capacity_gb * BYTES_PER_GB,
            &UtilizationConfig::default(),
        )
        .unwrap();
        let findings = ResultValidator::new().validate_utilization(&result);
        prop_assert!(findings.is_valid(), "{:?}", findings.errors);
        prop_assert!(result.practical >= result.theoretical);
    }

    #[test]
    fn prop_fitting_device_count_holds_need(needed_gb in 1.0f64..600.0, per_device_gb in 8.0f64..192.0) {
        let config = UtilizationConfig::default();
        if let Some(result) = minimum_fitting_devices(needed_gb, per_device_gb, 8, &config).unwrap() {
            prop_assert!(result.fits);
            prop_assert!(result.usable_capacity_gb >= needed_gb);
            if result.device_count > 1 {
                let fewer = dimensionar::utilization::calculate_multi_device_efficiency(
                    needed_gb,
                    per_device_gb,
                    result.device_count - 1,
                    &config,
                )
                .unwrap();
                prop_assert!(!fewer.fits);
            }
        }
    }
}
