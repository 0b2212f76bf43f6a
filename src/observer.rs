//! Progress reporting for a limit search.
//!
//! The search calls a [`SearchObserver`] at fixed points: each toy batch
//! read, each bracket update, phase changes, and the final outcome. The
//! observer never influences control flow. `()` ignores everything;
//! [`TracingObserver`] writes the progress trace through `tracing`.

use crate::result::{LimitResult, SearchError};
use crate::types::{ConfidenceEstimate, ExclusionStatistic, SearchState};

/// Phase of the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// Doubling the upper bound until the statistic is below target.
    Expansion,
    /// Bisecting the bracket.
    Bisection,
    /// Refining the interval around a direct hit.
    Refinement,
}

/// One read of the oracle result at `r`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Parameter value.
    pub r: f64,
    /// Quantity the search uses.
    pub statistic: ExclusionStatistic,
    /// Value of that quantity.
    pub estimate: ConfidenceEstimate,
    /// CLs at this point.
    pub cls: ConfidenceEstimate,
    /// CLb at this point.
    pub clb: ConfidenceEstimate,
    /// CLs+b at this point.
    pub cls_plus_b: ConfidenceEstimate,
    /// Batches merged into the result so far.
    pub batches: usize,
}

/// Receives progress events from a search.
#[allow(unused_variables)]
pub trait SearchObserver {
    /// A phase starts.
    fn on_phase(&mut self, phase: SearchPhase) {}

    /// A (possibly merged) oracle result was read.
    fn on_evaluation(&mut self, evaluation: &Evaluation) {}

    /// The bisection bracket changed.
    fn on_bracket(&mut self, state: &SearchState) {}

    /// A midpoint matched the target within accuracy.
    fn on_direct_hit(&mut self, r: f64, estimate: &ConfidenceEstimate) {}

    /// Limit found, before interval refinement.
    fn on_preliminary(&mut self, result: &LimitResult) {}

    /// Final limit.
    fn on_limit(&mut self, result: &LimitResult) {}

    /// The search failed.
    fn on_failure(&mut self, error: &SearchError) {}
}

impl SearchObserver for () {}

impl<T: SearchObserver + ?Sized> SearchObserver for &mut T {
    fn on_phase(&mut self, phase: SearchPhase) {
        (**self).on_phase(phase)
    }

    fn on_evaluation(&mut self, evaluation: &Evaluation) {
        (**self).on_evaluation(evaluation)
    }

    fn on_bracket(&mut self, state: &SearchState) {
        (**self).on_bracket(state)
    }

    fn on_direct_hit(&mut self, r: f64, estimate: &ConfidenceEstimate) {
        (**self).on_direct_hit(r, estimate)
    }

    fn on_preliminary(&mut self, result: &LimitResult) {
        (**self).on_preliminary(result)
    }

    fn on_limit(&mut self, result: &LimitResult) {
        (**self).on_limit(result)
    }

    fn on_failure(&mut self, error: &SearchError) {
        (**self).on_failure(error)
    }
}

/// Writes the progress trace as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SearchObserver for TracingObserver {
    fn on_phase(&mut self, phase: SearchPhase) {
        match phase {
            SearchPhase::Expansion => tracing::info!("Search for upper limit to the limit"),
            SearchPhase::Bisection => tracing::info!("Now doing proper bracketing & bisection"),
            SearchPhase::Refinement => tracing::info!("Refining interval around the limit"),
        }
    }

    fn on_evaluation(&mut self, e: &Evaluation) {
        tracing::info!(
            "r = {}: {} = {} +/- {}",
            e.r,
            e.statistic,
            e.estimate.value,
            e.estimate.error
        );
        tracing::debug!(
            batches = e.batches,
            "r = {}: CLs = {}, CLb = {}, CLsplusb = {}",
            e.r,
            e.cls,
            e.clb,
            e.cls_plus_b
        );
    }

    fn on_bracket(&mut self, state: &SearchState) {
        tracing::debug!(
            r_min = state.r_min,
            r_max = state.r_max,
            "bracket [{}, {}]",
            state.r_min,
            state.r_max
        );
    }

    fn on_direct_hit(&mut self, r: f64, _estimate: &ConfidenceEstimate) {
        tracing::info!(r, "reached accuracy.");
    }

    fn on_preliminary(&mut self, result: &LimitResult) {
        tracing::info!(
            "Limit (before determining interval): r < {} +/- {} @ {}% CL",
            result.limit,
            result.uncertainty,
            result.confidence_level * 100.0
        );
    }

    fn on_limit(&mut self, result: &LimitResult) {
        tracing::info!(
            "Limit: r < {} +/- {} @ {}% CL",
            result.limit,
            result.uncertainty,
            result.confidence_level * 100.0
        );
    }

    fn on_failure(&mut self, error: &SearchError) {
        tracing::warn!("{}", error);
    }
}

/// Records every event, for inspection in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    /// Phases in the order they started.
    pub phases: Vec<SearchPhase>,
    /// Every oracle read.
    pub evaluations: Vec<Evaluation>,
    /// Every bracket, starting with the initial one.
    pub brackets: Vec<SearchState>,
    /// Limit reported before refinement, if any.
    pub preliminary: Option<LimitResult>,
    /// Final limit, if any.
    pub limit: Option<LimitResult>,
    /// Failure message, if any.
    pub failure: Option<String>,
}

impl SearchObserver for RecordingObserver {
    fn on_phase(&mut self, phase: SearchPhase) {
        self.phases.push(phase);
    }

    fn on_evaluation(&mut self, evaluation: &Evaluation) {
        self.evaluations.push(*evaluation);
    }

    fn on_bracket(&mut self, state: &SearchState) {
        self.brackets.push(*state);
    }

    fn on_preliminary(&mut self, result: &LimitResult) {
        self.preliminary = Some(result.clone());
    }

    fn on_limit(&mut self, result: &LimitResult) {
        self.limit = Some(result.clone());
    }

    fn on_failure(&mut self, error: &SearchError) {
        self.failure = Some(error.to_string());
    }
}
