//! Upper-bound expansion.
//!
//! Doubles the upper edge until the statistic there is clearly below the
//! target, so that `[0, r_max]` contains the limit. This relies on the
//! statistic being non-increasing in `r`, which is assumed, not checked.

use crate::adaptive::{AdaptiveEvaluator, Sampling};
use crate::constants::{MAX_EXPANSION_RATIO, SIGNIFICANCE_SIGMAS};
use crate::observer::SearchObserver;
use crate::oracle::ConfidenceOracle;
use crate::result::SearchError;
use crate::search::evaluation_failed;
use crate::types::{ParameterPoint, SearchState};

/// Find an upper bound with the statistic below `cls_target`.
///
/// Starts at `point.max` and doubles it after every point that still
/// overlaps the target within three standard errors. Gives up once the
/// trial value reaches [`MAX_EXPANSION_RATIO`] times the starting bound.
///
/// # Errors
///
/// [`SearchError::Unbounded`] when the ratio is reached, or any evaluation
/// error at the trial point.
pub fn expand_upper_bound<O, Obs>(
    evaluator: &mut AdaptiveEvaluator<O, Obs>,
    point: ParameterPoint,
    cls_target: f64,
) -> Result<SearchState, SearchError>
where
    O: ConfidenceOracle,
    Obs: SearchObserver,
{
    let initial = point.max;
    let mut point = point.at(initial);

    loop {
        let r = point.value;
        let estimate = evaluator
            .evaluate(r, Sampling::Single)
            .map_err(|e| evaluation_failed(r, e))?;

        if estimate.value == 0.0 || estimate.upper_band(SIGNIFICANCE_SIGMAS) < cls_target {
            return Ok(SearchState::new(r, estimate));
        }

        if r / initial >= MAX_EXPANSION_RATIO {
            return Err(SearchError::Unbounded {
                r,
                value: estimate.value,
                statistic: evaluator.statistic(),
            });
        }

        let doubled = point.max * 2.0;
        point = point.with_max(doubled).at(doubled);
    }
}
