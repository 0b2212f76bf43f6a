//! Toy distributions of the test statistic and the CL values read from them.

use crate::oracle::HypoTestResult;
use crate::types::ConfidenceEstimate;

/// Test-statistic values of toys thrown under both hypotheses at one `r`.
///
/// Larger values are more background-like. Merging two distributions
/// concatenates their toys; the observed value is shared.
#[derive(Debug, Clone, PartialEq)]
pub struct ToyDistribution {
    /// Test statistic on the observed data.
    pub observed: f64,
    /// Toys thrown under signal plus background.
    pub signal_plus_background: Vec<f64>,
    /// Toys thrown under background only.
    pub background: Vec<f64>,
}

impl ToyDistribution {
    /// Create a distribution from toys of both hypotheses.
    pub fn new(observed: f64, signal_plus_background: Vec<f64>, background: Vec<f64>) -> Self {
        Self {
            observed,
            signal_plus_background,
            background,
        }
    }

    /// Append the toys of `other`.
    pub fn merge(mut self, other: ToyDistribution) -> Self {
        self.signal_plus_background
            .extend(other.signal_plus_background);
        self.background.extend(other.background);
        self
    }

    /// Number of toys per hypothesis.
    pub fn len(&self) -> usize {
        self.signal_plus_background.len().min(self.background.len())
    }

    /// True if no toys were thrown.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fraction of `toys` at least as background-like as `observed`, with its
/// binomial error.
fn tail_fraction(toys: &[f64], observed: f64) -> ConfidenceEstimate {
    if toys.is_empty() {
        return ConfidenceEstimate::new(0.0, 0.0);
    }
    let n = toys.len() as f64;
    let above = toys.iter().filter(|&&q| q >= observed).count() as f64;
    let p = above / n;
    ConfidenceEstimate::new(p, (p * (1.0 - p) / n).sqrt())
}

impl HypoTestResult for ToyDistribution {
    /// CLs+b / CLb. The ratio is undefined without a background-only
    /// tail and then reads as not excluded.
    fn cls(&self) -> ConfidenceEstimate {
        let sb = self.cls_plus_b();
        let b = self.clb();
        if b.value == 0.0 {
            return ConfidenceEstimate::NOT_EXCLUDED;
        }
        if sb.value == 0.0 {
            return ConfidenceEstimate::new(0.0, 0.0);
        }
        let value = sb.value / b.value;
        let rel_sb = sb.error / sb.value;
        let rel_b = b.error / b.value;
        ConfidenceEstimate::new(value, value * (rel_sb * rel_sb + rel_b * rel_b).sqrt())
    }

    fn cls_plus_b(&self) -> ConfidenceEstimate {
        tail_fraction(&self.signal_plus_background, self.observed)
    }

    fn clb(&self) -> ConfidenceEstimate {
        tail_fraction(&self.background, self.observed)
    }
}
