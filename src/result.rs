//! Outcome of a limit search.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::oracle::OracleError;
use crate::types::{ExclusionStatistic, SearchState};

/// How bisection stopped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Termination {
    /// A midpoint matched the target within the statistic accuracy.
    DirectHit,
    /// The bracket shrank below the `r` tolerance.
    BracketConverged,
}

/// An upper limit on `r`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LimitResult {
    /// Upper limit on `r`.
    pub limit: f64,

    /// Half the width of the final bracket (or of the refined interval).
    pub uncertainty: f64,

    /// Refined interval, when interval refinement ran.
    pub interval: Option<(f64, f64)>,

    /// Confidence level of the limit.
    pub confidence_level: f64,

    /// Exclusion quantity the limit refers to.
    pub statistic: ExclusionStatistic,

    /// How bisection stopped.
    pub termination: Termination,

    /// Final bisection bracket, before refinement.
    pub bracket: SearchState,

    /// Oracle batches requested over the whole search.
    pub batches: usize,

    /// Toys thrown over the whole search, per hypothesis.
    pub toys: usize,
}

impl LimitResult {
    /// True if the limit came from a direct hit.
    pub fn is_direct_hit(&self) -> bool {
        self.termination == Termination::DirectHit
    }
}

/// Error returned by a limit search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The configuration was rejected before the search began.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The oracle could not produce a result.
    #[error("Hypotest failed at r = {r}")]
    OracleFailed {
        /// Point of the failed request.
        r: f64,
        /// Oracle error.
        #[source]
        source: OracleError,
    },

    /// Bracket expansion never crossed the threshold.
    #[error("Cannot set higher limit: at r = {r} still get {statistic} = {value}")]
    Unbounded {
        /// Last trial value.
        r: f64,
        /// Statistic observed there.
        value: f64,
        /// Quantity being tested.
        statistic: ExclusionStatistic,
    },

    /// The time budget ran out before more toys could be requested.
    #[error("time budget exceeded at r = {r} after {:.1}s", .elapsed.as_secs_f64())]
    TimeBudgetExceeded {
        /// Point being evaluated.
        r: f64,
        /// Time spent.
        elapsed: Duration,
    },
}
