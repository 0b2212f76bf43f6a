//! Upper-limit search driver.
//!
//! A search runs in up to three phases:
//!
//! 1. **Expansion**: double the upper bound until the statistic there is
//!    below `1 - CL` by three standard errors (or exactly zero).
//! 2. **Bisection**: halve `[0, r_max]`, evaluating each midpoint
//!    adaptively, until a midpoint matches the target within the statistic
//!    accuracy or the bracket is narrower than the `r` tolerance.
//! 3. **Refinement** (optional, direct hits only): walk both edges toward
//!    the limit to report an interval.
//!
//! Every phase assumes the statistic is non-increasing in `r`. If that
//! does not hold, the search still terminates but may return a wrong root.

mod bisection;
mod bracket;
mod interval;

pub use bisection::{bisect, Bisection};
pub use bracket::expand_upper_bound;
pub use interval::refine_interval;

use crate::adaptive::{AdaptiveEvaluator, EvaluationError};
use crate::config::{Config, ConfigError};
use crate::constants::HINT_SCALE;
use crate::observer::{SearchObserver, SearchPhase};
use crate::oracle::{ConfidenceOracle, OracleSettings};
use crate::result::{LimitResult, SearchError, Termination};
use crate::types::ParameterPoint;

/// Map an evaluation failure at `r` to a search error.
pub(crate) fn evaluation_failed(r: f64, error: EvaluationError) -> SearchError {
    match error {
        EvaluationError::Oracle(source) => SearchError::OracleFailed { r, source },
        EvaluationError::TimeBudgetExceeded { elapsed } => {
            SearchError::TimeBudgetExceeded { r, elapsed }
        }
    }
}

/// Upper-limit search with a validated configuration.
///
/// # Example
///
/// ```ignore
/// use hybrid_limit::{Config, CountingExperiment, LimitSearch, ParameterPoint, TracingObserver};
///
/// let search = LimitSearch::new(Config::default().toys(1000))?;
/// let oracle = CountingExperiment::new(1.0, 3.0, 3).with_seed(7);
/// let result = search.run(oracle, ParameterPoint::new(0.0, 20.0), None, TracingObserver)?;
/// println!("r < {} +/- {}", result.limit, result.uncertainty);
/// ```
#[derive(Debug, Clone)]
pub struct LimitSearch {
    config: Config,
}

impl LimitSearch {
    /// Validate `config` and build a search.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Find the upper limit on `r`.
    ///
    /// `point` gives the allowed range; its `max` is the first upper bound
    /// tried. A `hint` above `point.min` narrows that bound to
    /// `min(3 * hint, point.max)`.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Config`] if the oracle rejects the settings or the
    ///   range has no positive upper bound; no toys are thrown.
    /// - [`SearchError::OracleFailed`] as soon as any batch fails.
    /// - [`SearchError::Unbounded`] if expansion never crosses the target.
    /// - [`SearchError::TimeBudgetExceeded`] if the budget runs out.
    pub fn run<O, Obs>(
        &self,
        mut oracle: O,
        point: ParameterPoint,
        hint: Option<f64>,
        mut observer: Obs,
    ) -> Result<LimitResult, SearchError>
    where
        O: ConfidenceOracle,
        Obs: SearchObserver,
    {
        let prepared = self.initial_point(point, hint).and_then(|point| {
            let settings = OracleSettings::from_config(&self.config, oracle.is_extended());
            oracle.configure(&settings)?;
            Ok(point)
        });
        let point = match prepared {
            Ok(point) => point,
            Err(e) => {
                let error = SearchError::Config(e);
                observer.on_failure(&error);
                return Err(error);
            }
        };

        let mut evaluator = AdaptiveEvaluator::new(oracle, observer, &self.config);
        let outcome = self.search(&mut evaluator, point);
        if let Err(error) = &outcome {
            evaluator.observer_mut().on_failure(error);
        }
        outcome
    }

    /// [`run`](Self::run) without progress reporting.
    pub fn run_unobserved<O>(
        &self,
        oracle: O,
        point: ParameterPoint,
        hint: Option<f64>,
    ) -> Result<LimitResult, SearchError>
    where
        O: ConfidenceOracle,
    {
        self.run(oracle, point, hint, ())
    }

    fn initial_point(
        &self,
        point: ParameterPoint,
        hint: Option<f64>,
    ) -> Result<ParameterPoint, ConfigError> {
        let point = match hint {
            Some(hint) if hint > point.min => point.with_max((HINT_SCALE * hint).min(point.max)),
            _ => point,
        };
        if !(point.max.is_finite() && point.max > 0.0 && point.max >= point.min) {
            return Err(ConfigError::InvalidRange {
                min: point.min,
                max: point.max,
            });
        }
        Ok(point)
    }

    fn search<O, Obs>(
        &self,
        evaluator: &mut AdaptiveEvaluator<O, Obs>,
        point: ParameterPoint,
    ) -> Result<LimitResult, SearchError>
    where
        O: ConfidenceOracle,
        Obs: SearchObserver,
    {
        let config = &self.config;

        evaluator.observer_mut().on_phase(SearchPhase::Expansion);
        let state = expand_upper_bound(evaluator, point, config.cls_target())?;
        evaluator.observer_mut().on_bracket(&state);

        evaluator.observer_mut().on_phase(SearchPhase::Bisection);
        let found = bisect(evaluator, state, config)?;

        let mut result = LimitResult {
            limit: found.limit,
            uncertainty: found.uncertainty(),
            interval: None,
            confidence_level: config.confidence_level,
            statistic: config.statistic,
            termination: found.termination,
            bracket: found.state,
            batches: evaluator.state().batches(),
            toys: evaluator.state().toys(),
        };

        if config.compute_interval && found.termination == Termination::DirectHit {
            evaluator.observer_mut().on_preliminary(&result);
            evaluator.observer_mut().on_phase(SearchPhase::Refinement);

            let (low, high) = refine_interval(evaluator, &found.state, found.limit, config)?;
            result.interval = Some((low, high));
            result.uncertainty = 0.5 * (high - low);
            result.batches = evaluator.state().batches();
            result.toys = evaluator.state().toys();
        }

        evaluator.observer_mut().on_limit(&result);
        Ok(result)
    }
}
