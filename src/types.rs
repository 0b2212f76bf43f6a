//! Value types shared by the evaluator, the search and the oracle.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

// ============================================================================
// Statistic selection
// ============================================================================

/// Which exclusion quantity the search drives to its target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ExclusionStatistic {
    /// Modified frequentist ratio CLs+b / CLb.
    #[default]
    Cls,
    /// Plain signal-plus-background p-value.
    ClsPlusB,
}

impl ExclusionStatistic {
    /// Short name used in progress output.
    pub fn name(&self) -> &'static str {
        match self {
            ExclusionStatistic::Cls => "CLs",
            ExclusionStatistic::ClsPlusB => "CLsplusb",
        }
    }
}

impl fmt::Display for ExclusionStatistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Test statistic flavor computed by the oracle for each toy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TestStatistic {
    /// Simple likelihood ratio with nuisances at their nominal values.
    #[default]
    Lep,
    /// Likelihood ratio with nuisances profiled in each hypothesis.
    Tev,
}

impl TestStatistic {
    /// Canonical option name.
    pub fn name(&self) -> &'static str {
        match self {
            TestStatistic::Lep => "LEP",
            TestStatistic::Tev => "TEV",
        }
    }
}

impl fmt::Display for TestStatistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TestStatistic {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LEP" => Ok(TestStatistic::Lep),
            "TEV" => Ok(TestStatistic::Tev),
            other => Err(ConfigError::UnknownTestStatistic(other.to_string())),
        }
    }
}

// ============================================================================
// Estimates and search points
// ============================================================================

/// Monte-Carlo estimate of an exclusion quantity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConfidenceEstimate {
    /// Estimated value in [0, 1].
    pub value: f64,
    /// Standard error of the estimate.
    pub error: f64,
}

impl ConfidenceEstimate {
    /// A point that is certainly not excluded.
    pub const NOT_EXCLUDED: ConfidenceEstimate = ConfidenceEstimate {
        value: 1.0,
        error: 0.0,
    };

    /// Create an estimate from a value and its standard error.
    pub fn new(value: f64, error: f64) -> Self {
        Self { value, error }
    }

    /// True if the estimate lies above `target`.
    pub fn is_above(&self, target: f64) -> bool {
        self.value > target
    }

    /// True while `target` is within `sigmas` standard errors of the value.
    pub fn is_compatible_with(&self, target: f64, sigmas: f64) -> bool {
        (self.value - target).abs() < sigmas * self.error
    }

    /// Upper edge of a `sigmas`-wide band around the value.
    pub fn upper_band(&self, sigmas: f64) -> f64 {
        self.value + sigmas * self.error.abs()
    }
}

impl fmt::Display for ConfidenceEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} +/- {}", self.value, self.error)
    }
}

/// A value of the parameter under test together with its allowed range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ParameterPoint {
    /// Current value.
    pub value: f64,
    /// Lower bound of the allowed range.
    pub min: f64,
    /// Upper bound of the allowed range.
    pub max: f64,
}

impl ParameterPoint {
    /// Create a point at `min` with range `[min, max]`.
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            value: min,
            min,
            max,
        }
    }

    /// The same range with a new current value.
    pub fn at(self, value: f64) -> Self {
        Self { value, ..self }
    }

    /// The same point with a new upper bound.
    pub fn with_max(self, max: f64) -> Self {
        Self { max, ..self }
    }
}

/// Bisection bracket and the last estimate seen at each edge.
///
/// Steps never mutate a state in place; they return the next one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SearchState {
    /// Lower edge of the bracket.
    pub r_min: f64,
    /// Upper edge of the bracket.
    pub r_max: f64,
    /// Estimate at the lower edge.
    pub cls_min: ConfidenceEstimate,
    /// Estimate at the upper edge.
    pub cls_max: ConfidenceEstimate,
}

impl SearchState {
    /// Initial bracket `[0, r_max]` with the lower edge not excluded.
    pub fn new(r_max: f64, cls_max: ConfidenceEstimate) -> Self {
        Self {
            r_min: 0.0,
            r_max,
            cls_min: ConfidenceEstimate::NOT_EXCLUDED,
            cls_max,
        }
    }

    /// Width of the bracket.
    pub fn width(&self) -> f64 {
        self.r_max - self.r_min
    }

    /// Center of the bracket.
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.r_min + self.r_max)
    }

    /// Place `estimate`, taken at `r`, on the side of the bracket it belongs to.
    ///
    /// Assumes the statistic is non-increasing in `r`: a point on the same
    /// side of `target` as the upper edge replaces the upper edge.
    pub fn split(self, r: f64, estimate: ConfidenceEstimate, target: f64) -> Self {
        if estimate.is_above(target) == self.cls_max.is_above(target) {
            Self {
                r_max: r,
                cls_max: estimate,
                ..self
            }
        } else {
            Self {
                r_min: r,
                cls_min: estimate,
                ..self
            }
        }
    }
}
