//! Property-based tests for efficiency rating

use super::tests::sample;
use super::*;
use crate::catalog::{DeviceProfile, DeviceSpecs};
use crate::workload::Workload;
use proptest::prelude::*;

fn device(memory: f64, bandwidth: f64, tflops: f64, tdp: f64, price: f64, throughput: f64) -> DeviceProfile {
    DeviceProfile::new(
        "d",
        "Device",
        DeviceSpecs {
            memory_gb: memory,
            memory_bandwidth_gbps: bandwidth,
            fp16_tflops: tflops,
            tdp_watts: tdp,
            price_usd: price,
        },
    )
    .with_benchmarks(vec![sample("d", 7.0, throughput)])
}

fn workload() -> impl Strategy<Value = Workload> {
    prop_oneof![Just(Workload::Inference), Just(Workload::Training), Just(Workload::Mixed)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_scores_bounded(
        memory in 1.0f64..256.0,
        bandwidth in 50.0f64..8000.0,
        tflops in 1.0f64..2000.0,
        tdp in 50.0f64..1200.0,
        price in 0.0f64..50_000.0,
        throughput in 0.0f64..1000.0,
        workload in workload(),
    ) {
        let system = EfficiencyRatingSystem::default();
        let rating = system.rate(&device(memory, bandwidth, tflops, tdp, price, throughput), workload).unwrap();
        prop_assert!((0.0..=100.0).contains(&rating.overall));
        for dimension in Dimension::ALL {
            let sub = rating.sub_score(dimension);
            prop_assert!((0.0..=100.0).contains(&sub.score));
            prop_assert!(sub.confidence > 0.0 && sub.confidence <= 1.0);
            prop_assert!(rating.confidence <= sub.confidence);
        }
        let weighted: f64 = Dimension::ALL.iter().map(|d| rating.sub_score(*d).weighted()).sum();
        prop_assert!((rating.overall - weighted).abs() < 1e-9);
    }

    #[test]
    fn prop_bandwidth_never_lowers_compute(
        bandwidth in 50.0f64..4000.0,
        extra in 0.0f64..4000.0,
        throughput in 1.0f64..500.0,
    ) {
        let system = EfficiencyRatingSystem::default();
        let slow = system.rate(&device(24.0, bandwidth, 100.0, 300.0, 2000.0, throughput), Workload::Inference).unwrap();
        let fast = system.rate(&device(24.0, bandwidth + extra, 100.0, 300.0, 2000.0, throughput), Workload::Inference).unwrap();
        prop_assert!(fast.compute.score >= slow.compute.score);
        prop_assert!(fast.memory.score >= slow.memory.score);
    }

    #[test]
    fn prop_comparison_antisymmetric(
        t_a in 1.0f64..500.0,
        t_b in 1.0f64..500.0,
        workload in workload(),
    ) {
        let system = EfficiencyRatingSystem::default();
        let mut a = device(24.0, 900.0, 80.0, 350.0, 2000.0, t_a);
        a.id = "a".to_string();
        let mut b = device(48.0, 1800.0, 180.0, 300.0, 7000.0, t_b);
        b.id = "b".to_string();
        let ab = system.compare(&a, &b, workload).unwrap();
        let ba = system.compare(&b, &a, workload).unwrap();
        prop_assert!((ab.overall_delta + ba.overall_delta).abs() < 1e-9);
        prop_assert_eq!(ab.magnitude, ba.magnitude);
        prop_assert_eq!(ab.leader, ba.leader);
    }
}
