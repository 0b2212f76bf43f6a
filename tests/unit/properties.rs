//! Property-based tests using proptest
//!
//! With an exact, strictly decreasing statistic the search must land on
//! the root of `1 - r/k = 1 - CL`, i.e. `r = k * CL`.

use hybrid_limit::testing::LinearOracle;
use hybrid_limit::{Config, LimitSearch, ParameterPoint, RecordingObserver, Termination};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The limit is within tolerance of the root and the bracket holds it.
    #[test]
    fn limit_matches_root(k in 1.0f64..50.0, cl in 0.8f64..0.99, u in 0.3f64..1.0) {
        let config = Config::default().confidence_level(cl);
        let search = LimitSearch::new(config.clone()).unwrap();
        let mut oracle = LinearOracle::new(k);
        let result = search
            .run_unobserved(&mut oracle, ParameterPoint::new(0.0, k * u), None)
            .unwrap();

        let root = k * cl;
        let slack = 1e-9 * k;
        prop_assert!(result.bracket.r_min <= root + slack);
        prop_assert!(root <= result.bracket.r_max + slack);

        let error = (result.limit - root).abs();
        match result.termination {
            // |1 - limit/k - (1 - cl)| <= cls_accuracy
            Termination::DirectHit => {
                prop_assert!(error <= config.cls_accuracy * k + slack, "error {}", error)
            }
            Termination::BracketConverged => {
                let tol = config.r_tolerance(result.bracket.r_max);
                prop_assert!(error <= 0.5 * tol + slack, "error {} tol {}", error, tol)
            }
        }
        prop_assert_eq!(result.batches, oracle.calls.len());
    }

    /// Brackets only ever shrink.
    #[test]
    fn brackets_are_nested(k in 1.0f64..50.0, cl in 0.8f64..0.99) {
        let search = LimitSearch::new(Config::default().confidence_level(cl)).unwrap();
        let mut observer = RecordingObserver::default();
        search
            .run(LinearOracle::new(k), ParameterPoint::new(0.0, k), None, &mut observer)
            .unwrap();

        for pair in observer.brackets.windows(2) {
            prop_assert!(pair[1].r_min >= pair[0].r_min);
            prop_assert!(pair[1].r_max <= pair[0].r_max);
            prop_assert!(pair[1].width() < pair[0].width());
        }
    }
}
