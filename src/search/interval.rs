//! Interval refinement after a direct hit.
//!
//! Each bracket edge walks halfway toward the limit at a time until its
//! estimate matches the target within the statistic accuracy, or it gets
//! within half the `r` tolerance of the limit. The edges therefore stay
//! inside the bisection bracket and never cross the limit.

use crate::adaptive::{AdaptiveEvaluator, Sampling};
use crate::config::Config;
use crate::observer::SearchObserver;
use crate::oracle::ConfidenceOracle;
use crate::result::SearchError;
use crate::search::evaluation_failed;
use crate::types::{ConfidenceEstimate, SearchState};

/// Refine the bracket around `limit` into an interval `(low, high)`.
pub fn refine_interval<O, Obs>(
    evaluator: &mut AdaptiveEvaluator<O, Obs>,
    state: &SearchState,
    limit: f64,
    config: &Config,
) -> Result<(f64, f64), SearchError>
where
    O: ConfidenceOracle,
    Obs: SearchObserver,
{
    let half_tolerance = 0.5 * config.r_tolerance(limit);

    let low = walk_edge(
        evaluator,
        (state.r_min, state.cls_min),
        limit,
        config,
        |edge| edge < limit - half_tolerance,
    )?;
    let high = walk_edge(
        evaluator,
        (state.r_max, state.cls_max),
        limit,
        config,
        |edge| edge > limit + half_tolerance,
    )?;

    Ok((low, high))
}

fn walk_edge<O, Obs>(
    evaluator: &mut AdaptiveEvaluator<O, Obs>,
    (mut edge, mut estimate): (f64, ConfidenceEstimate),
    limit: f64,
    config: &Config,
    outside_bound: impl Fn(f64) -> bool,
) -> Result<f64, SearchError>
where
    O: ConfidenceOracle,
    Obs: SearchObserver,
{
    let target = config.cls_target();

    while outside_bound(edge) && (estimate.value - target).abs() >= config.cls_accuracy {
        let r = 0.5 * (edge + limit);
        estimate = evaluator
            .evaluate(r, Sampling::Adaptive { target })
            .map_err(|e| evaluation_failed(r, e))?;
        edge = r;
    }

    Ok(edge)
}
