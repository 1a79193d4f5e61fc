use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use costwise_core::config::{CategoryRule, CategoryVariant, PersonaCategoryMap, SubCategoryFilter};
use costwise_core::errors::{DataAccessError, ErrorKind, EstimationError};
use costwise_core::models::PersonaDimension;
use costwise_core::{
    Amount, Category, EstimatorConfig, HousingType, LifestyleTier, ObservationWindow, PersonaInput,
    TransportMode,
};
use costwise_estimate::{CancellationToken, EstimationEngine};
use costwise_storage::InMemoryCostStore;
use test_fixtures::{as_of, golden_points, CountingPort, FailingPort, SlowPort, VecPort};

fn golden_store() -> InMemoryCostStore {
    let store = InMemoryCostStore::new();
    store.insert_bulk(golden_points(), as_of()).unwrap();
    store
}

fn one_bed_standard_public() -> PersonaInput {
    PersonaInput::new(HousingType::OneBedroom, LifestyleTier::Standard, TransportMode::Public)
}

fn window() -> ObservationWindow {
    ObservationWindow::trailing_months(as_of(), 6)
}

// ── Reference scenario ────────────────────────────────────────────────────

#[test]
fn dubai_one_bedroom_rent_uses_median_and_interquartile_range() {
    let store = golden_store();
    let engine = EstimationEngine::new(&store, EstimatorConfig::default()).unwrap();

    let result = engine
        .estimate("Dubai", &one_bed_standard_public(), window())
        .unwrap();

    let rent = result.category("housing").unwrap();
    assert_eq!(rent.sample_size, 5);
    assert_eq!(rent.point, Amount::from_major(3100));
    assert_eq!(rent.low, Amount::from_major(3050));
    assert_eq!(rent.high, Amount::from_major(3200));
    assert!(
        rent.confidence.value() >= 0.7,
        "five fresh samples should be high confidence, got {}",
        rent.confidence
    );
}

#[test]
fn categories_follow_persona_map_order() {
    let store = golden_store();
    let engine = EstimationEngine::new(&store, EstimatorConfig::default()).unwrap();
    let result = engine
        .estimate("Dubai", &one_bed_standard_public(), window())
        .unwrap();

    let names: Vec<&str> = result.categories.iter().map(|c| c.category.as_str()).collect();
    assert_eq!(
        names,
        vec!["housing", "utilities", "groceries", "dining", "entertainment", "transport"]
    );
}

#[test]
fn totals_are_exact_sums_of_category_bounds() {
    let store = golden_store();
    let engine = EstimationEngine::new(&store, EstimatorConfig::default()).unwrap();
    let result = engine
        .estimate("dubai", &one_bed_standard_public(), window())
        .unwrap();

    let low: i64 = result.categories.iter().map(|c| c.low.minor()).sum();
    let high: i64 = result.categories.iter().map(|c| c.high.minor()).sum();
    assert_eq!(result.total_low.minor(), low);
    assert_eq!(result.total_high.minor(), high);
    assert!(result.total_low <= result.total_high);
    assert_eq!(result.region, "Dubai", "region should use the allow-list spelling");
}

#[test]
fn transport_uses_only_public_transit_sub_categories() {
    let store = golden_store();
    let engine = EstimationEngine::new(&store, EstimatorConfig::default()).unwrap();
    let result = engine
        .estimate("Dubai", &one_bed_standard_public(), window())
        .unwrap();

    // metro 350, metro 350, bus 300; fuel and rideshare are excluded.
    let transport = result.category("transport").unwrap();
    assert_eq!(transport.sample_size, 3);
    assert_eq!(transport.point, Amount::from_major(350));
}

#[test]
fn repeated_estimates_are_identical() {
    let store = golden_store();
    let engine = EstimationEngine::new(&store, EstimatorConfig::default()).unwrap();
    let first = engine
        .estimate("Dubai", &one_bed_standard_public(), window())
        .unwrap();
    let second = engine
        .estimate("Dubai", &one_bed_standard_public(), window())
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn category_without_data_is_reported_with_zeros() {
    let store = golden_store();
    let engine = EstimationEngine::new(&store, EstimatorConfig::default()).unwrap();
    let result = engine
        .estimate("Dubai", &one_bed_standard_public(), window())
        .unwrap();

    let entertainment = result.category("entertainment").unwrap();
    assert_eq!(entertainment.low, Amount::ZERO);
    assert_eq!(entertainment.point, Amount::ZERO);
    assert_eq!(entertainment.high, Amount::ZERO);
    assert_eq!(entertainment.confidence.value(), 0.0);
    assert_eq!(
        result.categories_without_data().collect::<Vec<_>>(),
        vec![&Category::new("entertainment")]
    );
}

#[test]
fn narrow_window_drops_old_samples() {
    let store = golden_store();
    let engine = EstimationEngine::new(&store, EstimatorConfig::default()).unwrap();
    let result = engine
        .estimate(
            "Dubai",
            &one_bed_standard_public(),
            ObservationWindow::trailing_days(as_of(), 30),
        )
        .unwrap();

    // Dining samples are 60 and 65 days old.
    assert!(!result.category("dining").unwrap().has_data());
    // One metro pass sample is 31 days old.
    assert_eq!(result.category("transport").unwrap().sample_size, 2);
}

#[test]
fn overall_confidence_is_persona_weighted() {
    let store = golden_store();
    let engine = EstimationEngine::new(&store, EstimatorConfig::default()).unwrap();
    let persona = one_bed_standard_public();
    let result = engine.estimate("Dubai", &persona, window()).unwrap();
    let resolved = engine.resolver().resolve(&persona);

    let weighted: f64 = resolved
        .plans
        .iter()
        .zip(&result.categories)
        .map(|(plan, est)| plan.weight * est.confidence.value())
        .sum();
    let expected = weighted / resolved.total_weight();
    assert!((result.overall_confidence.value() - expected).abs() < 1e-12);

    let simple_mean: f64 = result
        .categories
        .iter()
        .map(|c| c.confidence.value())
        .sum::<f64>()
        / result.categories.len() as f64;
    assert!((result.overall_confidence.value() - simple_mean).abs() > 1e-6);
}

#[test]
fn persona_irrelevant_category_does_not_dilute_confidence() {
    let mut config = EstimatorConfig::default();
    let mut map = PersonaCategoryMap::default();
    map.categories.push(CategoryRule {
        category: Category::new("car_insurance"),
        weight: 0.5,
        keyed_by: Some(PersonaDimension::Transport),
        sub_categories: Vec::new(),
        variants: [(
            "car".to_string(),
            CategoryVariant {
                sub_categories: vec![SubCategoryFilter::new("comprehensive", 1.0)],
                weight: None,
            },
        )]
        .into_iter()
        .collect(),
    });
    config.persona_category_map = map;

    let store = golden_store();
    let with_rule = EstimationEngine::new(&store, config).unwrap();
    let without_rule = EstimationEngine::new(&store, EstimatorConfig::default()).unwrap();

    let a = with_rule
        .estimate("Dubai", &one_bed_standard_public(), window())
        .unwrap();
    let b = without_rule
        .estimate("Dubai", &one_bed_standard_public(), window())
        .unwrap();
    assert!(a.category("car_insurance").is_none());
    assert_eq!(a.overall_confidence, b.overall_confidence);
}

// ── Validation happens before any I/O ─────────────────────────────────────

#[test]
fn unrecognized_housing_fails_without_port_calls() {
    let port = CountingPort::new(VecPort::new(golden_points()));
    let engine = EstimationEngine::new(&port, EstimatorConfig::default()).unwrap();

    let err = engine
        .estimate_raw("Dubai", "castle", "standard", "public", window())
        .unwrap_err();
    assert!(matches!(
        err,
        EstimationError::InvalidPersona { ref field, ref value } if field == "housing" && value == "castle"
    ));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(port.total_calls(), 0);
}

#[test]
fn unsupported_region_fails_without_port_calls() {
    let port = CountingPort::new(VecPort::new(golden_points()));
    let engine = EstimationEngine::new(&port, EstimatorConfig::default()).unwrap();

    let err = engine
        .estimate("Mars", &one_bed_standard_public(), window())
        .unwrap_err();
    assert!(matches!(err, EstimationError::RegionNotSupported { ref region } if region == "Mars"));
    assert_eq!(port.total_calls(), 0);

    let err = engine
        .estimate_raw("Mars", "castle", "standard", "public", window())
        .unwrap_err();
    assert!(matches!(err, EstimationError::RegionNotSupported { .. }));
    assert_eq!(port.total_calls(), 0);
}

#[test]
fn raw_estimate_matches_typed_estimate() {
    let store = golden_store();
    let engine = EstimationEngine::new(&store, EstimatorConfig::default()).unwrap();
    let raw = engine
        .estimate_raw("Dubai", "1BR", "standard", "public", window())
        .unwrap();
    let typed = engine
        .estimate("Dubai", &one_bed_standard_public(), window())
        .unwrap();
    assert_eq!(raw, typed);
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let store = golden_store();
    let config = EstimatorConfig {
        fresh_days: 100,
        stale_days: 10,
        ..EstimatorConfig::default()
    };
    assert!(matches!(
        EstimationEngine::new(&store, config),
        Err(EstimationError::Config(_))
    ));
}

// ── Failure and cancellation ──────────────────────────────────────────────

#[test]
fn data_access_failure_aborts_whole_estimate() {
    let port = FailingPort::always(
        VecPort::new(golden_points()),
        Some("groceries"),
        DataAccessError::Backend {
            message: "disk I/O error".into(),
        },
    );
    let engine = EstimationEngine::new(&port, EstimatorConfig::default()).unwrap();

    let err = engine
        .estimate("Dubai", &one_bed_standard_public(), window())
        .unwrap_err();
    assert!(
        matches!(err, EstimationError::DataAccess(DataAccessError::Backend { .. })),
        "expected the backend failure, got {err:?}"
    );
    assert_eq!(err.kind(), ErrorKind::ServiceImpaired);
}

#[test]
fn timeout_is_not_retried_by_the_engine() {
    let port = CountingPort::new(FailingPort::scripted(
        VecPort::new(golden_points()),
        Some("housing"),
        vec![DataAccessError::Timeout { elapsed_ms: 3000 }],
    ));
    let engine = EstimationEngine::new(&port, EstimatorConfig::default()).unwrap();

    let err = engine
        .estimate("Dubai", &one_bed_standard_public(), window())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RetryLater);
    assert!(port.query_count() <= 6, "engine must issue at most one query per category");
}

#[test]
fn pre_cancelled_request_issues_no_queries() {
    let port = CountingPort::new(VecPort::new(golden_points()));
    let engine = EstimationEngine::new(&port, EstimatorConfig::default()).unwrap();
    let token = CancellationToken::new();
    token.cancel();

    let err = engine
        .estimate_with_cancel("Dubai", &one_bed_standard_public(), window(), &token)
        .unwrap_err();
    assert!(matches!(err, EstimationError::Cancelled));
    assert_eq!(port.query_count(), 0);
}

#[test]
fn cancellation_during_fan_out_returns_cancelled() {
    let port = Arc::new(SlowPort {
        inner: VecPort::new(golden_points()),
        delay: Duration::from_millis(100),
    });
    let token = CancellationToken::new();

    let canceller = {
        let token = token.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            token.cancel();
        })
    };

    let engine = EstimationEngine::new(&port, EstimatorConfig::default()).unwrap();
    let result = engine.estimate_with_cancel("Dubai", &one_bed_standard_public(), window(), &token);
    canceller.join().unwrap();

    assert!(matches!(result, Err(EstimationError::Cancelled)));
}

#[test]
fn cancellation_interrupts_in_flight_queries() {
    let port = Arc::new(SlowPort {
        inner: VecPort::new(golden_points()),
        delay: Duration::from_secs(10),
    });
    let token = CancellationToken::new();

    let canceller = {
        let token = token.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            token.cancel();
        })
    };

    let engine = EstimationEngine::new(&port, EstimatorConfig::default()).unwrap();
    let started = Instant::now();
    let result = engine.estimate_with_cancel("Dubai", &one_bed_standard_public(), window(), &token);
    canceller.join().unwrap();

    assert!(matches!(result, Err(EstimationError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn lookback_past_the_calendar_range_is_unbounded() {
    let store = golden_store();
    let engine = EstimationEngine::new(&store, EstimatorConfig::default()).unwrap();

    let huge = engine
        .estimate(
            "Dubai",
            &one_bed_standard_public(),
            ObservationWindow::trailing_days(as_of(), u32::MAX),
        )
        .unwrap();
    let unbounded = engine
        .estimate("Dubai", &one_bed_standard_public(), ObservationWindow::unbounded(as_of()))
        .unwrap();

    assert_eq!(huge.categories, unbounded.categories);
    assert_eq!(huge.total_high, unbounded.total_high);
}

#[test]
fn extreme_amounts_saturate_totals_without_panicking() {
    let mut rent = test_fixtures::point("huge-rent", "Dubai", "housing", "1br_rent", 0, 2);
    rent.amount = Amount::from_minor(i64::MAX - 10);
    let mut metro = test_fixtures::point("huge-metro", "Dubai", "transport", "metro_pass", 0, 2);
    metro.amount = Amount::from_minor(i64::MAX - 10);
    let port = VecPort::new(vec![rent, metro]);

    let engine = EstimationEngine::new(&port, EstimatorConfig::default()).unwrap();
    let result = engine.estimate("Dubai", &one_bed_standard_public(), window()).unwrap();

    assert_eq!(result.total_low.minor(), i64::MAX);
    assert_eq!(result.total_high.minor(), i64::MAX);
}

#[test]
fn dedicated_worker_pool_matches_shared_pool() {
    let store = golden_store();
    let shared = EstimationEngine::new(&store, EstimatorConfig::default()).unwrap();
    let dedicated = EstimationEngine::new(
        &store,
        EstimatorConfig {
            worker_threads: 2,
            ..EstimatorConfig::default()
        },
    )
    .unwrap();

    let persona = PersonaInput::new(HousingType::Villa, LifestyleTier::Premium, TransportMode::Car);
    assert_eq!(
        shared.estimate("Dubai", &persona, window()).unwrap(),
        dedicated.estimate("Dubai", &persona, window()).unwrap()
    );
}

#[test]
fn engine_exposes_coverage_over_same_port() {
    let store = golden_store();
    let engine = EstimationEngine::new(&store, EstimatorConfig::default()).unwrap();
    let summary = engine.coverage("Dubai", as_of()).unwrap();
    assert_eq!(summary.region, "Dubai");
    assert_eq!(summary.categories.len(), 6);
}
