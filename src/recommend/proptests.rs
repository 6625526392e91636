//! Property-based tests for recommendations

use super::tests::{catalog, now};
use super::*;
use crate::requirement::MemoryRequirement;
use crate::workload::Workload;
use proptest::prelude::*;

fn workload() -> impl Strategy<Value = Workload> {
    prop_oneof![Just(Workload::Inference), Just(Workload::Training), Just(Workload::Mixed)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_budget_never_exceeded(
        need_gb in 0.0f64..600.0,
        budget in 0.0f64..60_000.0,
        workload in workload(),
    ) {
        let catalog = catalog();
        let engine = RecommendationEngine::with_defaults(&catalog).at(now());
        let request = RecommendationRequest::new(MemoryRequirement::from_gb(need_gb).unwrap(), workload)
            .with_budget(budget);
        let report = engine.recommend(&request).unwrap();
        for r in &report.recommendations {
            prop_assert!(r.total_cost_usd <= budget);
        }
        prop_assert_eq!(report.recommendations.len() + report.excluded.len(), catalog.len());
    }

    #[test]
    fn prop_top_pick_has_highest_suitable_score(need_gb in 0.0f64..600.0, workload in workload()) {
        let catalog = catalog();
        let engine = RecommendationEngine::with_defaults(&catalog).at(now());
        let request = RecommendationRequest::new(MemoryRequirement::from_gb(need_gb).unwrap(), workload);
        let report = engine.recommend(&request).unwrap();

        prop_assert_eq!(report.compatible_count, report.suitable().count());
        match report.top() {
            Some(top) => {
                prop_assert!(top.suitable);
                for r in report.suitable() {
                    prop_assert!(top.efficiency_score >= r.efficiency_score);
                }
            }
            None => prop_assert_eq!(report.compatible_count, 0),
        }
        for r in &report.recommendations {
            prop_assert!(r.efficiency_score >= 0.0);
            prop_assert!(r.device_count >= 1 && r.device_count <= engine.config().max_devices);
        }
    }
}
