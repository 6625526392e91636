//! Property-based tests for breakdown normalization

use super::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn prop_percentages_sum_to_exactly_100(
        values in proptest::collection::vec(0.0f64..1e12, 1..12),
        extra in 1.0f64..1e12,
    ) {
        let mut values = values;
        values.push(extra);
        let pcts = normalize_percentages(&values).unwrap();

        let sum: f64 = pcts.iter().sum();
        prop_assert!((sum - 100.0).abs() <= 0.001, "sum was {}", sum);
        prop_assert!(pcts.iter().all(|p| *p >= 0.0));
        prop_assert_eq!(pcts.len(), values.len());
    }

    #[test]
    fn prop_percentages_have_two_decimals(values in proptest::collection::vec(1.0f64..1e9, 1..10)) {
        let pcts = normalize_percentages(&values).unwrap();
        for p in pcts {
            let cents = p * 100.0;
            prop_assert!((cents - cents.round()).abs() < 1e-6);
        }
    }

    #[test]
    fn prop_breakdown_validates(values in proptest::collection::vec(1.0f64..1e10, 1..8)) {
        let components: Vec<(String, f64)> =
            values.iter().enumerate().map(|(i, v)| (format!("part-{i}"), *v)).collect();
        let breakdown = MemoryBreakdownCalculator::new().from_components(&components).unwrap();
        let total: f64 = values.iter().sum();
        let validation = validate_breakdown(&breakdown, Some(total));
        prop_assert!(validation.is_valid);
        prop_assert!(validation.warnings.is_empty());
    }
}
