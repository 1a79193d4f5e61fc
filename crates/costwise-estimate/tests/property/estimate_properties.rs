use chrono::Duration;
use costwise_core::{
    Amount, Category, EstimatorConfig, HousingType, LifestyleTier, ObservationWindow, PersonaInput,
    TransportMode,
};
use costwise_estimate::{CategoryAggregator, EstimationEngine, WeightedSample};
use proptest::prelude::*;
use test_fixtures::{as_of, point, VecPort};

fn arb_sample() -> impl Strategy<Value = WeightedSample> {
    (
        0i64..50_000_000,
        prop_oneof![Just(0.3f64), Just(0.5), Just(1.0), Just(2.0)],
        0i64..400,
    )
        .prop_map(|(minor, weight, days_ago)| WeightedSample {
            amount: Amount::from_minor(minor),
            weight,
            recorded_at: as_of() - Duration::days(days_ago),
        })
}

fn arb_persona() -> impl Strategy<Value = PersonaInput> {
    (
        prop::sample::select(HousingType::ALL.to_vec()),
        prop::sample::select(LifestyleTier::ALL.to_vec()),
        prop::sample::select(TransportMode::ALL.to_vec()),
    )
        .prop_map(|(h, l, t)| PersonaInput::new(h, l, t))
}

const SUB_CATEGORIES: &[(&str, &str)] = &[
    ("housing", "studio_rent"),
    ("housing", "1br_rent"),
    ("housing", "villa_rent"),
    ("utilities", "internet"),
    ("utilities", "utilities_villa"),
    ("groceries", "groceries_basic"),
    ("groceries", "groceries_premium"),
    ("dining", "fine_dining"),
    ("dining", "casual_dining"),
    ("entertainment", "cinema"),
    ("transport", "metro_pass"),
    ("transport", "fuel"),
    ("transport", "rideshare_fare"),
];

proptest! {
    #[test]
    fn range_brackets_point_and_confidence_is_bounded(
        samples in prop::collection::vec(arb_sample(), 0..60),
    ) {
        let agg = CategoryAggregator::default();
        let est = agg.summarize(Category::new("housing"), &samples, as_of());
        prop_assert!(est.low <= est.point, "low {} > point {}", est.low, est.point);
        prop_assert!(est.point <= est.high, "point {} > high {}", est.point, est.high);
        prop_assert!((0.0..=1.0).contains(&est.confidence.value()));
        prop_assert_eq!(est.sample_size, samples.len());
    }

    #[test]
    fn adding_same_valued_samples_never_lowers_confidence(
        minor in 0i64..10_000_000,
        base in 0usize..30,
        extra in 1usize..30,
        days_ago in 0i64..200,
    ) {
        let agg = CategoryAggregator::default();
        let make = |n: usize| -> Vec<WeightedSample> {
            (0..n)
                .map(|_| WeightedSample {
                    amount: Amount::from_minor(minor),
                    weight: 1.0,
                    recorded_at: as_of() - Duration::days(days_ago),
                })
                .collect()
        };
        let before = agg.summarize(Category::new("groceries"), &make(base), as_of());
        let after = agg.summarize(Category::new("groceries"), &make(base + extra), as_of());
        prop_assert!(after.confidence >= before.confidence);
        if base > 0 {
            prop_assert_eq!(after.point, before.point);
        }
    }

    #[test]
    fn older_data_never_raises_confidence(
        n in 1usize..40,
        age in 0i64..300,
        more in 0i64..300,
    ) {
        let agg = CategoryAggregator::default();
        let policy = agg.policy();
        let younger = policy.score(n, Some(age as f64));
        let older = policy.score(n, Some((age + more) as f64));
        prop_assert!(older <= younger);
    }

    #[test]
    fn totals_equal_sum_of_category_bounds(
        rows in prop::collection::vec(
            (0usize..13, 0i64..2_000_000, 0i64..200),
            0..80,
        ),
        persona in arb_persona(),
    ) {
        let points = rows
            .iter()
            .enumerate()
            .map(|(i, &(sub, minor, days_ago))| {
                let (category, sub_category) = SUB_CATEGORIES[sub];
                let mut p = point(&format!("p-{i}"), "Dubai", category, sub_category, 0, days_ago);
                p.amount = Amount::from_minor(minor);
                p
            })
            .collect();
        let port = VecPort::new(points);
        let engine = EstimationEngine::new(&port, EstimatorConfig::default()).unwrap();
        let result = engine
            .estimate("Dubai", &persona, ObservationWindow::trailing_days(as_of(), 365))
            .unwrap();

        let low: i64 = result.categories.iter().map(|c| c.low.minor()).sum();
        let high: i64 = result.categories.iter().map(|c| c.high.minor()).sum();
        prop_assert_eq!(result.total_low.minor(), low);
        prop_assert_eq!(result.total_high.minor(), high);
        prop_assert!((0.0..=1.0).contains(&result.overall_confidence.value()));
        for c in &result.categories {
            prop_assert!(c.low <= c.point && c.point <= c.high);
            if c.sample_size == 0 {
                prop_assert_eq!(c.confidence.value(), 0.0);
                prop_assert_eq!(c.point, Amount::ZERO);
            }
        }
    }
}
