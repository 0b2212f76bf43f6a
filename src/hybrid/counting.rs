//! Single-bin counting experiment with toy Monte Carlo.
//!
//! The model predicts `r * s + b` events and `n` are observed. Each batch
//! throws toys under `r * s + b` and under `b` alone and evaluates
//! `q = -2 ln [L(n | r s + b_sb) / L(n | b_b)]` on every toy. With the LEP
//! statistic the background stays at its nominal value; with TEV it is
//! profiled under a Gaussian constraint when systematics are enabled.

use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Poisson};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::config::ConfigError;
use crate::constants::DEFAULT_SEED;
use crate::hybrid::ToyDistribution;
use crate::oracle::{ConfidenceOracle, HypoTestResult, OracleError, OracleSettings};
use crate::types::TestStatistic;

/// Gaussian prior on the expected background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NuisancePrior {
    /// Width of the prior.
    pub sigma: f64,
}

/// Counting-experiment oracle.
#[derive(Debug, Clone)]
pub struct CountingExperiment {
    signal: f64,
    background: f64,
    observed: u64,
    prior: Option<NuisancePrior>,
    extended: bool,
    settings: OracleSettings,
    rng: Xoshiro256PlusPlus,
}

impl CountingExperiment {
    /// Experiment expecting `signal` events per unit `r` over `background`,
    /// with `observed` events seen.
    pub fn new(signal: f64, background: f64, observed: u64) -> Self {
        Self {
            signal,
            background,
            observed,
            prior: None,
            extended: true,
            settings: OracleSettings {
                toys: 500,
                use_nuisance: false,
                test_statistic: TestStatistic::Lep,
                extended: true,
            },
            rng: Xoshiro256PlusPlus::seed_from_u64(DEFAULT_SEED),
        }
    }

    /// Reseed the toy generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        self
    }

    /// Attach a Gaussian prior of width `sigma` to the background.
    pub fn with_background_uncertainty(mut self, sigma: f64) -> Self {
        self.prior = Some(NuisancePrior { sigma });
        self
    }

    /// Fix the total count of each toy to its expectation instead of
    /// drawing it from a Poisson distribution.
    pub fn non_extended(mut self) -> Self {
        self.extended = false;
        self
    }

    /// Settings applied by the last search.
    pub fn settings(&self) -> &OracleSettings {
        &self.settings
    }

    fn active_prior(&self) -> Option<NuisancePrior> {
        self.prior.filter(|_| self.settings.use_nuisance)
    }

    /// Background maximizing the constrained likelihood of `n` events on
    /// top of `mu_s` signal events.
    fn profiled_background(&self, n: f64, mu_s: f64) -> f64 {
        let Some(NuisancePrior { sigma }) = self.active_prior() else {
            return self.background;
        };
        let s2 = sigma * sigma;
        if s2 == 0.0 {
            return self.background;
        }
        // root of x^2 + x (s2 + mu_s - b) + mu_s (s2 - b) - n s2 = 0
        let lin = s2 + mu_s - self.background;
        let cst = mu_s * (s2 - self.background) - n * s2;
        let disc = (lin * lin - 4.0 * cst).max(0.0);
        (0.5 * (-lin + disc.sqrt())).max(0.0)
    }

    fn log_likelihood(&self, n: f64, mu_s: f64, b: f64) -> f64 {
        let lambda = mu_s + b;
        let poisson = if n == 0.0 { -lambda } else { n * lambda.ln() - lambda };
        let constraint = match self.active_prior() {
            Some(NuisancePrior { sigma }) if sigma > 0.0 => {
                let d = (b - self.background) / sigma;
                -0.5 * d * d
            }
            _ => 0.0,
        };
        poisson + constraint
    }

    /// `-2 ln Q` for a count `n` at signal strength `r`.
    pub fn test_statistic(&self, n: f64, r: f64) -> f64 {
        let mu_s = r * self.signal;
        let (b_sb, b_b) = match self.settings.test_statistic {
            TestStatistic::Lep => (self.background, self.background),
            TestStatistic::Tev => (
                self.profiled_background(n, mu_s),
                self.profiled_background(n, 0.0),
            ),
        };
        -2.0 * (self.log_likelihood(n, mu_s, b_sb) - self.log_likelihood(n, 0.0, b_b))
    }

    fn throw_toy(&mut self, mu_s: f64, r: f64) -> Result<f64, OracleError> {
        let background = match self.active_prior() {
            Some(NuisancePrior { sigma }) => Normal::new(self.background, sigma)
                .map_err(|e| failure(r, e))?
                .sample(&mut self.rng)
                .max(0.0),
            None => self.background,
        };
        let lambda = mu_s + background;
        let n = if !self.extended {
            lambda.round()
        } else if lambda > 0.0 {
            Poisson::new(lambda)
                .map_err(|e| failure(r, e))?
                .sample(&mut self.rng)
        } else {
            0.0
        };
        Ok(self.test_statistic(n, r))
    }
}

fn failure(r: f64, error: impl std::fmt::Display) -> OracleError {
    OracleError::HypoTestFailed {
        r,
        message: error.to_string(),
    }
}

impl ConfidenceOracle for CountingExperiment {
    type Output = ToyDistribution;

    fn configure(&mut self, settings: &OracleSettings) -> Result<(), ConfigError> {
        if settings.use_nuisance && self.prior.is_none() {
            return Err(ConfigError::MissingNuisancePrior);
        }
        self.settings = *settings;
        Ok(())
    }

    fn run_test(&mut self, r: f64) -> Result<ToyDistribution, OracleError> {
        let mu_s = r * self.signal;
        if !(r >= 0.0 && (mu_s + self.background).is_finite() && self.background > 0.0) {
            return Err(failure(
                r,
                format!(
                    "invalid expectation s = {}, b = {}",
                    mu_s, self.background
                ),
            ));
        }

        let toys = self.settings.toys;
        let mut sb = Vec::with_capacity(toys);
        let mut b = Vec::with_capacity(toys);
        for _ in 0..toys {
            sb.push(self.throw_toy(mu_s, r)?);
            b.push(self.throw_toy(0.0, r)?);
        }

        let observed = self.test_statistic(self.observed as f64, r);
        let toys = ToyDistribution::new(observed, sb, b);
        // CLs is undefined without a background-only tail
        if toys.clb().value == 0.0 {
            return Err(failure(
                r,
                format!("CLb = 0 with {} toys, increase toys", self.settings.toys),
            ));
        }
        Ok(toys)
    }

    fn accumulate(&self, existing: ToyDistribution, additional: ToyDistribution) -> ToyDistribution {
        existing.merge(additional)
    }

    fn is_extended(&self) -> bool {
        self.extended
    }
}
