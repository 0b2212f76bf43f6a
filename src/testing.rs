//! Deterministic oracles for tests and benchmarks.
//!
//! [`LinearOracle`] returns `max(0, 1 - r/k)` for every exclusion quantity,
//! with a fixed error, and can be told to fail on a given call.

use crate::config::ConfigError;
use crate::oracle::{ConfidenceOracle, HypoTestResult, OracleError, OracleSettings};
use crate::types::ConfidenceEstimate;

/// Result of a [`LinearOracle`] batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedResult {
    /// Value shared by CLs and CLs+b.
    pub value: f64,
    /// Error of the value.
    pub error: f64,
}

impl HypoTestResult for FixedResult {
    fn cls(&self) -> ConfidenceEstimate {
        ConfidenceEstimate::new(self.value, self.error)
    }

    fn cls_plus_b(&self) -> ConfidenceEstimate {
        ConfidenceEstimate::new(self.value, self.error)
    }

    fn clb(&self) -> ConfidenceEstimate {
        ConfidenceEstimate::new(1.0, 0.0)
    }
}

/// Oracle with statistic `max(0, 1 - r/k)`.
#[derive(Debug, Clone)]
pub struct LinearOracle {
    /// Parameter value where the statistic reaches zero.
    pub k: f64,
    /// Error reported with each batch.
    pub error: f64,
    /// Every `r` requested, in order.
    pub calls: Vec<f64>,
    /// Fail on this call (1-based).
    pub fail_on: Option<usize>,
    /// Settings received from the search.
    pub settings: Option<OracleSettings>,
}

impl LinearOracle {
    /// Zero-error oracle crossing zero at `k`.
    pub fn new(k: f64) -> Self {
        Self {
            k,
            error: 0.0,
            calls: Vec::new(),
            fail_on: None,
            settings: None,
        }
    }

    /// Oracle whose statistic is 1 everywhere.
    pub fn never_excluding() -> Self {
        Self::new(f64::INFINITY)
    }

    /// Report `error` with every batch.
    pub fn with_error(mut self, error: f64) -> Self {
        self.error = error;
        self
    }

    /// Fail on the `n`-th call.
    pub fn failing_on(mut self, n: usize) -> Self {
        self.fail_on = Some(n);
        self
    }

    /// Statistic at `r`.
    pub fn value_at(&self, r: f64) -> f64 {
        (1.0 - r / self.k).max(0.0)
    }
}

impl ConfidenceOracle for LinearOracle {
    type Output = FixedResult;

    fn configure(&mut self, settings: &OracleSettings) -> Result<(), ConfigError> {
        self.settings = Some(*settings);
        Ok(())
    }

    fn run_test(&mut self, r: f64) -> Result<FixedResult, OracleError> {
        self.calls.push(r);
        if self.fail_on == Some(self.calls.len()) {
            return Err(OracleError::HypoTestFailed {
                r,
                message: "scripted failure".to_string(),
            });
        }
        Ok(FixedResult {
            value: self.value_at(r),
            error: self.error,
        })
    }

    fn accumulate(&self, existing: FixedResult, additional: FixedResult) -> FixedResult {
        // inverse-variance combination of two equal-value batches
        let (a, b) = (existing.error, additional.error);
        let error = if a == 0.0 || b == 0.0 {
            0.0
        } else {
            a * b / (a * a + b * b).sqrt()
        };
        FixedResult {
            value: existing.value,
            error,
        }
    }
}
