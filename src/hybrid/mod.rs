//! Hybrid frequentist-Bayesian toy Monte Carlo for a counting experiment.
//!
//! "Hybrid" refers to nuisance parameters: toys are frequentist
//! pseudo-experiments, but when systematics are enabled the background of
//! each toy is drawn from its prior.

mod counting;
mod toys;

pub use counting::{CountingExperiment, NuisancePrior};
pub use toys::ToyDistribution;
