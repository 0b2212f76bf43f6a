//! Configuration for a hybrid CLs limit search.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ExclusionStatistic, TestStatistic};

/// Error returned when a configuration cannot be used for a search.
///
/// These are reported before any toy is thrown.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Test statistic name other than `LEP` or `TEV`.
    #[error("test statistics should be one of 'LEP' or 'TEV', and not '{0}'")]
    UnknownTestStatistic(String),

    /// Systematics requested but no nuisance prior was supplied.
    #[error("nuisances or nuisance prior not set. Perhaps you wanted to run with no systematics?")]
    MissingNuisancePrior,

    /// Toys per batch must be positive.
    #[error("toys must be > 0 (got {0})")]
    NoToys(usize),

    /// Confidence level outside (0, 1).
    #[error("confidence level must be in (0, 1) (got {0})")]
    ConfidenceLevel(f64),

    /// The parameter range cannot hold a positive upper bound.
    #[error("parameter range [{min}, {max}] has no positive finite upper bound")]
    InvalidRange {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// A tolerance that must be positive and finite.
    #[error("{name} must be positive and finite (got {value})")]
    Accuracy {
        /// Option name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
}

/// Configuration options for [`LimitSearch`](crate::LimitSearch).
///
/// Immutable once a search starts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    // =========================================================================
    // Toys
    // =========================================================================
    /// Number of toy experiments per batch, per hypothesis. Default: 500.
    pub toys: usize,

    /// Randomize nuisance parameters when throwing toys.
    ///
    /// The oracle must have a nuisance prior when this is set. Default: false.
    pub with_systematics: bool,

    /// Test statistic the oracle computes. Default: LEP.
    pub test_statistic: TestStatistic,

    // =========================================================================
    // Targets and tolerances
    // =========================================================================
    /// Confidence level of the limit. Default: 0.95.
    pub confidence_level: f64,

    /// Which exclusion quantity is driven to `1 - confidence_level`.
    /// Default: CLs.
    pub statistic: ExclusionStatistic,

    /// Absolute accuracy on the exclusion statistic. Default: 0.005.
    ///
    /// A midpoint closer than this to the target ends the search, and the
    /// adaptive evaluator stops adding toys once the error is below it.
    pub cls_accuracy: f64,

    /// Absolute accuracy on `r`. Default: 0.1.
    pub r_abs_accuracy: f64,

    /// Relative accuracy on `r`. Default: 0.05.
    pub r_rel_accuracy: f64,

    // =========================================================================
    // Extras
    // =========================================================================
    /// Refine an interval around the limit after a direct hit. Default: false.
    pub compute_interval: bool,

    /// Wall-time budget for the whole search. Default: none.
    ///
    /// Checked before each additional toy batch.
    pub time_budget: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            toys: 500,
            with_systematics: false,
            test_statistic: TestStatistic::Lep,
            confidence_level: 0.95,
            statistic: ExclusionStatistic::Cls,
            cls_accuracy: 0.005,
            r_abs_accuracy: 0.1,
            r_rel_accuracy: 0.05,
            compute_interval: false,
            time_budget: None,
        }
    }
}

impl Config {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of toys per batch.
    pub fn toys(mut self, n: usize) -> Self {
        self.toys = n;
        self
    }

    /// Set the confidence level.
    pub fn confidence_level(mut self, cl: f64) -> Self {
        self.confidence_level = cl;
        self
    }

    /// Select the exclusion quantity.
    pub fn statistic(mut self, statistic: ExclusionStatistic) -> Self {
        self.statistic = statistic;
        self
    }

    /// Select the test statistic flavor.
    pub fn test_statistic(mut self, test_statistic: TestStatistic) -> Self {
        self.test_statistic = test_statistic;
        self
    }

    /// Select the test statistic flavor by name (`"LEP"` or `"TEV"`).
    pub fn test_statistic_named(mut self, name: &str) -> Result<Self, ConfigError> {
        self.test_statistic = name.parse()?;
        Ok(self)
    }

    /// Set the absolute accuracy on the exclusion statistic.
    pub fn cls_accuracy(mut self, acc: f64) -> Self {
        self.cls_accuracy = acc;
        self
    }

    /// Set the absolute accuracy on `r`.
    pub fn r_abs_accuracy(mut self, acc: f64) -> Self {
        self.r_abs_accuracy = acc;
        self
    }

    /// Set the relative accuracy on `r`.
    pub fn r_rel_accuracy(mut self, acc: f64) -> Self {
        self.r_rel_accuracy = acc;
        self
    }

    /// Enable interval refinement.
    pub fn compute_interval(mut self, enabled: bool) -> Self {
        self.compute_interval = enabled;
        self
    }

    /// Enable nuisance randomization.
    pub fn with_systematics(mut self, enabled: bool) -> Self {
        self.with_systematics = enabled;
        self
    }

    /// Set a wall-time budget.
    pub fn time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Target value of the exclusion statistic, `1 - confidence_level`.
    pub fn cls_target(&self) -> f64 {
        1.0 - self.confidence_level
    }

    /// Bracket width below which bisection stops, at parameter value `r`.
    pub fn r_tolerance(&self, r: f64) -> f64 {
        self.r_abs_accuracy.max(self.r_rel_accuracy * r)
    }

    /// Check every option, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.toys == 0 {
            return Err(ConfigError::NoToys(self.toys));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ConfigError::ConfidenceLevel(self.confidence_level));
        }
        for (name, value) in [
            ("cls_accuracy", self.cls_accuracy),
            ("r_abs_accuracy", self.r_abs_accuracy),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Accuracy { name, value });
            }
        }
        if !(self.r_rel_accuracy.is_finite() && self.r_rel_accuracy >= 0.0) {
            return Err(ConfigError::Accuracy {
                name: "r_rel_accuracy",
                value: self.r_rel_accuracy,
            });
        }
        Ok(())
    }

    /// Merge configuration from environment variables.
    ///
    /// Reads the following environment variables to override settings:
    /// - `HYBRID_TOYS`: Toys per batch
    /// - `HYBRID_CL`: Confidence level (e.g., "0.95")
    /// - `HYBRID_CLS_ACC`: Absolute accuracy on the exclusion statistic
    /// - `HYBRID_R_ABS_ACC`: Absolute accuracy on r
    /// - `HYBRID_R_REL_ACC`: Relative accuracy on r
    /// - `HYBRID_TEST_STAT`: `LEP` or `TEV`
    /// - `HYBRID_TIME_BUDGET_SECS`: Time budget in seconds
    ///
    /// Unparseable numbers are ignored. An unknown test statistic is an error.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        if let Some(n) = parse_env::<usize>("HYBRID_TOYS") {
            self.toys = n;
        }
        if let Some(cl) = parse_env::<f64>("HYBRID_CL") {
            self.confidence_level = cl;
        }
        if let Some(acc) = parse_env::<f64>("HYBRID_CLS_ACC") {
            self.cls_accuracy = acc;
        }
        if let Some(acc) = parse_env::<f64>("HYBRID_R_ABS_ACC") {
            self.r_abs_accuracy = acc;
        }
        if let Some(acc) = parse_env::<f64>("HYBRID_R_REL_ACC") {
            self.r_rel_accuracy = acc;
        }
        if let Some(secs) = parse_env::<u64>("HYBRID_TIME_BUDGET_SECS") {
            self.time_budget = Some(Duration::from_secs(secs));
        }
        if let Ok(name) = env::var("HYBRID_TEST_STAT") {
            self.test_statistic = name.trim().parse()?;
        }
        Ok(self)
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
