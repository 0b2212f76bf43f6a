//! Tests for configuration validation.
//!
//! Invalid options are rejected by `LimitSearch::new` before any oracle is
//! touched.

use std::time::Duration;

use hybrid_limit::{Config, ConfigError, ExclusionStatistic, LimitSearch, TestStatistic};

// =============================================================================
// TOYS
// =============================================================================

#[test]
fn zero_toys_rejected() {
    let err = LimitSearch::new(Config::new().toys(0)).unwrap_err();
    assert_eq!(err, ConfigError::NoToys(0));
}

#[test]
fn one_toy_valid() {
    let search = LimitSearch::new(Config::new().toys(1)).unwrap();
    assert_eq!(search.config().toys, 1);
}

// =============================================================================
// CONFIDENCE LEVEL
// =============================================================================

#[test]
fn confidence_level_bounds_rejected() {
    for cl in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
        let err = LimitSearch::new(Config::new().confidence_level(cl)).unwrap_err();
        assert!(matches!(err, ConfigError::ConfidenceLevel(_)), "cl = {}", cl);
    }
}

#[test]
fn confidence_level_sets_target() {
    let config = Config::new().confidence_level(0.68);
    assert!((config.cls_target() - 0.32).abs() < 1e-12);
}

// =============================================================================
// ACCURACIES
// =============================================================================

#[test]
fn cls_accuracy_must_be_positive() {
    let err = LimitSearch::new(Config::new().cls_accuracy(0.0)).unwrap_err();
    assert_eq!(
        err,
        ConfigError::Accuracy {
            name: "cls_accuracy",
            value: 0.0
        }
    );
}

#[test]
fn r_abs_accuracy_must_be_finite() {
    let err = LimitSearch::new(Config::new().r_abs_accuracy(f64::INFINITY)).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Accuracy {
            name: "r_abs_accuracy",
            ..
        }
    ));
}

#[test]
fn r_rel_accuracy_zero_is_allowed() {
    let search = LimitSearch::new(Config::new().r_rel_accuracy(0.0)).unwrap();
    assert_eq!(search.config().r_tolerance(100.0), 0.1);
}

#[test]
fn r_rel_accuracy_negative_rejected() {
    assert!(LimitSearch::new(Config::new().r_rel_accuracy(-0.1)).is_err());
}

#[test]
fn tolerance_takes_larger_of_abs_and_rel() {
    let config = Config::default();
    assert_eq!(config.r_tolerance(1.0), 0.1);
    assert!((config.r_tolerance(10.0) - 0.5).abs() < 1e-12);
}

// =============================================================================
// NAMED OPTIONS
// =============================================================================

#[test]
fn test_statistic_by_name() {
    let config = Config::new().test_statistic_named("TEV").unwrap();
    assert_eq!(config.test_statistic, TestStatistic::Tev);

    let err = Config::new().test_statistic_named("PL").unwrap_err();
    assert_eq!(err, ConfigError::UnknownTestStatistic("PL".to_string()));
    assert_eq!(
        err.to_string(),
        "test statistics should be one of 'LEP' or 'TEV', and not 'PL'"
    );
}

#[test]
fn builder_roundtrips_through_serde() {
    let config = Config::new()
        .toys(250)
        .statistic(ExclusionStatistic::ClsPlusB)
        .with_systematics(true)
        .time_budget(Duration::from_secs(30));
    let json = serde_json::to_string(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}
