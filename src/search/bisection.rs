//! Bisection with error-aware midpoint evaluation.

use crate::adaptive::{AdaptiveEvaluator, Sampling};
use crate::config::Config;
use crate::observer::SearchObserver;
use crate::oracle::ConfidenceOracle;
use crate::result::{SearchError, Termination};
use crate::search::evaluation_failed;
use crate::types::{ConfidenceEstimate, SearchState};

/// Where bisection stopped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bisection {
    /// Final bracket.
    pub state: SearchState,
    /// Limit estimate.
    pub limit: f64,
    /// Estimate at the last midpoint.
    pub last: ConfidenceEstimate,
    /// Why the loop ended.
    pub termination: Termination,
}

impl Bisection {
    /// Half the width of the final bracket.
    pub fn uncertainty(&self) -> f64 {
        0.5 * self.state.width()
    }
}

/// Bisect `state` until a midpoint hits the target or the bracket is narrow.
///
/// Each midpoint is evaluated adaptively against `1 - confidence_level`. A
/// midpoint within `cls_accuracy` of the target is taken as the limit. Any
/// other midpoint replaces the edge whose estimate lies on the same side of
/// the target. The loop runs at least once and stops when the width is at
/// most `max(r_abs_accuracy, r_rel_accuracy * mid)`.
pub fn bisect<O, Obs>(
    evaluator: &mut AdaptiveEvaluator<O, Obs>,
    mut state: SearchState,
    config: &Config,
) -> Result<Bisection, SearchError>
where
    O: ConfidenceOracle,
    Obs: SearchObserver,
{
    let target = config.cls_target();

    loop {
        let mid = state.midpoint();
        let estimate = evaluator
            .evaluate(mid, Sampling::Adaptive { target })
            .map_err(|e| evaluation_failed(mid, e))?;

        if (estimate.value - target).abs() <= config.cls_accuracy {
            evaluator.observer_mut().on_direct_hit(mid, &estimate);
            return Ok(Bisection {
                state,
                limit: mid,
                last: estimate,
                termination: Termination::DirectHit,
            });
        }

        state = state.split(mid, estimate, target);
        evaluator.observer_mut().on_bracket(&state);

        if state.width() <= config.r_tolerance(mid) {
            return Ok(Bisection {
                state,
                limit: state.midpoint(),
                last: estimate,
                termination: Termination::BracketConverged,
            });
        }
    }
}
