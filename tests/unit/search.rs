//! End-to-end search behavior with deterministic oracles.

use std::time::Duration;

use hybrid_limit::testing::LinearOracle;
use hybrid_limit::{
    Config, ExclusionStatistic, LimitSearch, OracleError, ParameterPoint, RecordingObserver,
    SearchError, SearchPhase, Termination,
};

fn search(config: Config) -> LimitSearch {
    LimitSearch::new(config).unwrap()
}

// =============================================================================
// WORKED EXAMPLE
// =============================================================================

#[test]
fn linear_statistic_limit() {
    let mut oracle = LinearOracle::new(5.0);
    let result = search(Config::default())
        .run_unobserved(&mut oracle, ParameterPoint::new(0.0, 1.0), None)
        .unwrap();

    assert_eq!(result.limit, 4.75);
    assert_eq!(result.uncertainty, 0.25);
    assert_eq!(result.termination, Termination::DirectHit);
    assert_eq!(result.statistic, ExclusionStatistic::Cls);
    assert_eq!(result.confidence_level, 0.95);
    assert_eq!(result.toys, 9 * 500);
    assert_eq!(
        oracle.calls,
        vec![1.0, 2.0, 4.0, 8.0, 4.0, 6.0, 5.0, 4.5, 4.75]
    );
}

#[test]
fn cls_plus_b_drives_the_search() {
    let mut observer = RecordingObserver::default();
    let result = search(Config::default().statistic(ExclusionStatistic::ClsPlusB))
        .run(
            LinearOracle::new(5.0),
            ParameterPoint::new(0.0, 1.0),
            None,
            &mut observer,
        )
        .unwrap();

    assert_eq!(result.limit, 4.75);
    assert_eq!(result.statistic, ExclusionStatistic::ClsPlusB);
    assert!(observer
        .evaluations
        .iter()
        .all(|e| e.statistic == ExclusionStatistic::ClsPlusB));
}

// =============================================================================
// EXPANSION
// =============================================================================

#[test]
fn expansion_gives_up_at_twenty_times_start() {
    let mut oracle = LinearOracle::never_excluding();
    let err = search(Config::default())
        .run_unobserved(&mut oracle, ParameterPoint::new(0.0, 1.0), None)
        .unwrap_err();

    assert_eq!(oracle.calls, vec![1.0, 2.0, 4.0, 8.0, 16.0, 32.0]);
    match err {
        SearchError::Unbounded {
            r,
            value,
            statistic,
        } => {
            assert_eq!(r, 32.0);
            assert_eq!(value, 1.0);
            assert_eq!(statistic, ExclusionStatistic::Cls);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn unbounded_cls_plus_b_names_the_statistic() {
    let err = search(Config::default().statistic(ExclusionStatistic::ClsPlusB))
        .run_unobserved(
            LinearOracle::never_excluding(),
            ParameterPoint::new(0.0, 1.0),
            None,
        )
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot set higher limit: at r = 32 still get CLsplusb = 1"
    );
}

// =============================================================================
// FAILURES
// =============================================================================

#[test]
fn oracle_failure_stops_the_search() {
    let mut oracle = LinearOracle::new(5.0).failing_on(5);
    let mut observer = RecordingObserver::default();
    let err = search(Config::default())
        .run(&mut oracle, ParameterPoint::new(0.0, 1.0), None, &mut observer)
        .unwrap_err();

    // four expansion steps, then the first midpoint fails
    assert_eq!(oracle.calls.len(), 5);
    match &err {
        SearchError::OracleFailed { r, source } => {
            assert_eq!(*r, 4.0);
            assert!(matches!(source, OracleError::HypoTestFailed { .. }));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(observer.failure.as_deref(), Some("Hypotest failed at r = 4"));
    assert!(observer.limit.is_none());
}

#[test]
fn failure_during_expansion_is_fatal() {
    let mut oracle = LinearOracle::new(5.0).failing_on(2);
    let err = search(Config::default())
        .run_unobserved(&mut oracle, ParameterPoint::new(0.0, 1.0), None)
        .unwrap_err();
    assert!(matches!(err, SearchError::OracleFailed { r, .. } if r == 2.0));
    assert_eq!(oracle.calls, vec![1.0, 2.0]);
}

#[test]
fn exhausted_budget_stops_before_extra_toys() {
    // midpoint 6 reads 0 +/- 0.02, which is within 3 sigma of 0.05
    let mut oracle = LinearOracle::new(5.0).with_error(0.02);
    let err = search(Config::default().time_budget(Duration::ZERO))
        .run_unobserved(&mut oracle, ParameterPoint::new(0.0, 1.0), None)
        .unwrap_err();

    assert!(matches!(err, SearchError::TimeBudgetExceeded { r, .. } if r == 6.0));
    assert_eq!(oracle.calls, vec![1.0, 2.0, 4.0, 8.0, 4.0, 6.0]);
}

// =============================================================================
// BRACKET
// =============================================================================

#[test]
fn bracket_always_straddles_the_target() {
    let oracle = LinearOracle::new(5.0);
    let target = 0.05;
    let mut observer = RecordingObserver::default();
    search(Config::default().cls_accuracy(1e-4))
        .run(oracle.clone(), ParameterPoint::new(0.0, 3.0), None, &mut observer)
        .unwrap();

    assert!(!observer.brackets.is_empty());
    for state in &observer.brackets {
        assert!(state.r_min < state.r_max);
        assert!(oracle.value_at(state.r_min) >= target);
        assert!(oracle.value_at(state.r_max) <= target);
        assert!(state.cls_min.value >= target);
        assert!(state.cls_max.value <= target);
    }
    for pair in observer.brackets.windows(2) {
        assert!(pair[1].r_min >= pair[0].r_min);
        assert!(pair[1].r_max <= pair[0].r_max);
    }
}

#[test]
fn adaptive_sampling_adds_batches_near_target() {
    let mut observer = RecordingObserver::default();
    search(Config::default())
        .run(
            LinearOracle::new(5.0).with_error(0.02),
            ParameterPoint::new(0.0, 8.0),
            None,
            &mut observer,
        )
        .unwrap();

    // far from the target one batch is enough
    let first = observer.evaluations[1];
    assert_eq!(first.r, 4.0);
    assert_eq!(first.batches, 1);
    // a midpoint reading 0 +/- 0.02 needs more toys
    assert!(observer
        .evaluations
        .iter()
        .any(|e| e.r == 6.0 && e.batches > 1));
}

// =============================================================================
// INTERVAL REFINEMENT
// =============================================================================

#[test]
fn refined_interval_stays_inside_bracket() {
    let mut oracle = LinearOracle::new(5.0);
    let result = search(Config::default().compute_interval(true))
        .run_unobserved(&mut oracle, ParameterPoint::new(0.0, 1.0), None)
        .unwrap();

    let (low, high) = result.interval.unwrap();
    assert!(result.bracket.r_min <= low && low <= result.limit);
    assert!(result.limit <= high && high <= result.bracket.r_max);
    assert_eq!(result.uncertainty, 0.5 * (high - low));
    assert_eq!(result.batches, oracle.calls.len());
}

#[test]
fn no_refinement_without_direct_hit() {
    let mut observer = RecordingObserver::default();
    let result = search(Config::default().cls_accuracy(1e-9).compute_interval(true))
        .run(
            LinearOracle::new(7.0),
            ParameterPoint::new(0.0, 8.0),
            None,
            &mut observer,
        )
        .unwrap();

    assert_eq!(result.termination, Termination::BracketConverged);
    assert_eq!(result.interval, None);
    assert!(observer.preliminary.is_none());
    assert!(!observer.phases.contains(&SearchPhase::Refinement));
}
