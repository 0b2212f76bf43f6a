//! Adaptive evaluation of the exclusion statistic at a single point.
//!
//! One batch of toys is always thrown. In adaptive mode further batches are
//! merged into the result while the estimate cannot be told apart from the
//! target (closer than three standard errors) and its error is still above
//! the statistic accuracy. The first condition keeps bisection from acting
//! on noise; the second caps the cost at each point.

use std::time::Duration;

use thiserror::Error;

use crate::adaptive::SamplingState;
use crate::config::Config;
use crate::constants::SIGNIFICANCE_SIGMAS;
use crate::observer::{Evaluation, SearchObserver};
use crate::oracle::{ConfidenceOracle, HypoTestResult, OracleError};
use crate::types::{ConfidenceEstimate, ExclusionStatistic};

/// How many toys to spend on an evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sampling {
    /// A single batch.
    Single,
    /// Add batches until the estimate is clearly on one side of `target`
    /// or precise to the statistic accuracy.
    Adaptive {
        /// Value the estimate is compared against.
        target: f64,
    },
}

/// Error returned by an evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    /// The oracle failed; no estimate exists.
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// The time budget ran out before another batch was requested.
    #[error("time budget exceeded after {:.1}s", .elapsed.as_secs_f64())]
    TimeBudgetExceeded {
        /// Time spent in the search.
        elapsed: Duration,
    },
}

/// Wraps an oracle and decides how many batches each point needs.
pub struct AdaptiveEvaluator<O, Obs> {
    oracle: O,
    observer: Obs,
    statistic: ExclusionStatistic,
    cls_accuracy: f64,
    state: SamplingState,
}

impl<O, Obs> AdaptiveEvaluator<O, Obs>
where
    O: ConfidenceOracle,
    Obs: SearchObserver,
{
    /// Create an evaluator for one search.
    pub fn new(oracle: O, observer: Obs, config: &Config) -> Self {
        Self {
            oracle,
            observer,
            statistic: config.statistic,
            cls_accuracy: config.cls_accuracy,
            state: SamplingState::new(config.toys, config.time_budget),
        }
    }

    /// Estimate the exclusion statistic at `r`.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::Oracle`] as soon as any batch fails, and
    /// [`EvaluationError::TimeBudgetExceeded`] if more toys are needed after
    /// the budget is spent.
    pub fn evaluate(
        &mut self,
        r: f64,
        sampling: Sampling,
    ) -> Result<ConfidenceEstimate, EvaluationError> {
        let mut result = self.run_batch(r)?;
        let mut batches = 1;
        let mut estimate = self.read(r, &result, batches);

        if let Sampling::Adaptive { target } = sampling {
            while estimate.is_compatible_with(target, SIGNIFICANCE_SIGMAS)
                && estimate.error > self.cls_accuracy
            {
                if self.state.budget_exhausted() {
                    return Err(EvaluationError::TimeBudgetExceeded {
                        elapsed: self.state.elapsed(),
                    });
                }
                let more = self.run_batch(r)?;
                result = self.oracle.accumulate(result, more);
                batches += 1;
                estimate = self.read(r, &result, batches);
            }
        }

        Ok(estimate)
    }

    fn run_batch(&mut self, r: f64) -> Result<O::Output, OracleError> {
        self.state.record_batch();
        self.oracle.run_test(r)
    }

    fn read(&mut self, r: f64, result: &O::Output, batches: usize) -> ConfidenceEstimate {
        let estimate = result.exclusion(self.statistic);
        self.observer.on_evaluation(&Evaluation {
            r,
            statistic: self.statistic,
            estimate,
            cls: result.cls(),
            clb: result.clb(),
            cls_plus_b: result.cls_plus_b(),
            batches,
        });
        estimate
    }

    /// The observer receiving progress events.
    pub fn observer_mut(&mut self) -> &mut Obs {
        &mut self.observer
    }

    /// Batch counters for the search so far.
    pub fn state(&self) -> &SamplingState {
        &self.state
    }

    /// Exclusion quantity being read.
    pub fn statistic(&self) -> ExclusionStatistic {
        self.statistic
    }

    /// Release the oracle and observer.
    pub fn into_parts(self) -> (O, Obs) {
        (self.oracle, self.observer)
    }
}
