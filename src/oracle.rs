//! Interface to the hypothesis-test engine that throws toys.
//!
//! The search treats the engine as an oracle: it asks for one batch of toys
//! at a given `r`, reads CLs or CLs+b from the result, and may ask the
//! oracle to fold a further batch into an existing result. Merging is the
//! oracle's business; results are never averaged by the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::types::{ConfidenceEstimate, ExclusionStatistic, TestStatistic};

/// Error returned when the oracle cannot produce a batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OracleError {
    /// The model could not be evaluated at the requested point.
    #[error("hypotest failed at r = {r}: {message}")]
    HypoTestFailed {
        /// Parameter value of the failed request.
        r: f64,
        /// Description from the oracle.
        message: String,
    },
}

/// Settings handed to the oracle once per search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OracleSettings {
    /// Toys per batch, per hypothesis.
    pub toys: usize,
    /// Randomize nuisance parameters in each toy.
    pub use_nuisance: bool,
    /// Test statistic flavor.
    pub test_statistic: TestStatistic,
    /// Whether toys fluctuate the total event count.
    pub extended: bool,
}

impl OracleSettings {
    /// Settings derived from a search configuration.
    pub fn from_config(config: &Config, extended: bool) -> Self {
        Self {
            toys: config.toys,
            use_nuisance: config.with_systematics,
            test_statistic: config.test_statistic,
            extended,
        }
    }
}

/// Result of one or more toy batches at a fixed `r`.
pub trait HypoTestResult {
    /// CLs = CLs+b / CLb with its error.
    fn cls(&self) -> ConfidenceEstimate;

    /// CLs+b with its error.
    fn cls_plus_b(&self) -> ConfidenceEstimate;

    /// CLb with its error.
    fn clb(&self) -> ConfidenceEstimate;

    /// Read the selected exclusion quantity.
    fn exclusion(&self, statistic: ExclusionStatistic) -> ConfidenceEstimate {
        match statistic {
            ExclusionStatistic::Cls => self.cls(),
            ExclusionStatistic::ClsPlusB => self.cls_plus_b(),
        }
    }
}

/// A Monte-Carlo hypothesis-test engine.
///
/// Calls may be slow. The oracle owns its random stream, so repeated calls
/// at the same `r` give new toys.
pub trait ConfidenceOracle {
    /// Result of a batch.
    type Output: HypoTestResult;

    /// Apply per-search settings. Called once before the first batch.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the settings cannot be honored, for
    /// instance systematics without a nuisance prior.
    fn configure(&mut self, settings: &OracleSettings) -> Result<(), ConfigError>;

    /// Throw one batch of toys at `r`.
    fn run_test(&mut self, r: f64) -> Result<Self::Output, OracleError>;

    /// Merge `additional` into `existing`.
    fn accumulate(&self, existing: Self::Output, additional: Self::Output) -> Self::Output;

    /// Whether the underlying counting model is extended.
    fn is_extended(&self) -> bool {
        true
    }
}

impl<O: ConfidenceOracle + ?Sized> ConfidenceOracle for &mut O {
    type Output = O::Output;

    fn configure(&mut self, settings: &OracleSettings) -> Result<(), ConfigError> {
        (**self).configure(settings)
    }

    fn run_test(&mut self, r: f64) -> Result<Self::Output, OracleError> {
        (**self).run_test(r)
    }

    fn accumulate(&self, existing: Self::Output, additional: Self::Output) -> Self::Output {
        (**self).accumulate(existing, additional)
    }

    fn is_extended(&self) -> bool {
        (**self).is_extended()
    }
}
