//! Property-based tests for benchmark processing

use super::tests::{catalog, now, sample};
use super::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_throughput_non_increasing_in_size(a in 0.5f64..200.0, b in 0.5f64..200.0) {
        let catalog = catalog();
        let processor = BenchmarkProcessor::with_defaults(&catalog).at(now());
        let (small, large) = if a <= b { (a, b) } else { (b, a) };
        let p_small = processor.predict_performance("gpu-a", &TargetParams::new(small)).unwrap();
        let p_large = processor.predict_performance("gpu-a", &TargetParams::new(large)).unwrap();
        prop_assert!(p_small.throughput_tokens_per_sec >= p_large.throughput_tokens_per_sec);
    }

    #[test]
    fn prop_prediction_confidence_bounded(
        params in 0.5f64..200.0,
        batch in 1u32..64,
        seq in 128u32..32_768,
    ) {
        let catalog = catalog();
        let processor = BenchmarkProcessor::with_defaults(&catalog).at(now());
        let target = TargetParams::new(params).with_batch_size(batch).with_sequence_length(seq);
        for device in ["gpu-a", "gpu-empty", "unknown"] {
            let p = processor.predict_performance(device, &target).unwrap();
            prop_assert!((0.0..=1.0).contains(&p.confidence));
            prop_assert!(p.throughput_tokens_per_sec >= 0.0);
            prop_assert!((0.0..=100.0).contains(&p.memory_efficiency));
            if p.is_fallback() {
                prop_assert!(p.confidence < 0.5);
                prop_assert!(!p.limitations.is_empty());
            }
        }
    }

    #[test]
    fn prop_normalized_score_bounded(throughput in 0.0f64..1e5, pe in 0.0f64..10.0, mem in 0.0f64..100.0) {
        let catalog = catalog();
        let processor = BenchmarkProcessor::with_defaults(&catalog).at(now());
        let mut s = sample("gpu-a", "t", 7.0, throughput);
        s.power_efficiency = pe;
        s.memory_efficiency = mem;
        let n = processor.normalize([&s]);
        prop_assert!((0.0..=MAX_NORMALIZED_SCORE).contains(&n[0].normalized_score));
        prop_assert!(n[0].confidence_interval.lower >= 0.0);
        prop_assert!(n[0].confidence_interval.upper <= MAX_NORMALIZED_SCORE);
    }

    #[test]
    fn prop_match_score_in_unit_interval(size in 0.1f64..500.0, batch in 1u32..512, seq in 1u32..65_536) {
        let s = sample("x", "t", 7.0, 1.0);
        let target = TargetParams::new(size).with_batch_size(batch).with_sequence_length(seq);
        let score = match_score(&s.conditions, &target);
        prop_assert!(score > 0.0 && score <= 1.0);
    }
}
