//! # hybrid-limit
//!
//! Upper limits on a signal-strength parameter `r` with the hybrid CLs
//! method.
//!
//! The search finds the smallest `r` whose CLs (or CLs+b) falls to
//! `1 - CL`. Each evaluation is a toy Monte Carlo hypothesis test provided
//! by a [`ConfidenceOracle`]; because toys are noisy, points that land near
//! the target are re-evaluated with more toys until the decision is clear.
//!
//! ## Quick Start
//!
//! ```ignore
//! use hybrid_limit::{Config, CountingExperiment, LimitSearch, ParameterPoint, TracingObserver};
//!
//! let search = LimitSearch::new(Config::default().toys(1000).confidence_level(0.95))?;
//! let oracle = CountingExperiment::new(1.0, 3.0, 3);
//!
//! match search.run(oracle, ParameterPoint::new(0.0, 20.0), None, TracingObserver) {
//!     Ok(result) => println!("{}", hybrid_limit::output::format_limit(&result)),
//!     Err(e) => eprintln!("no limit: {}", e),
//! }
//! ```
//!
//! ## Custom Oracles
//!
//! Any hypothesis-test backend can drive the search by implementing
//! [`ConfidenceOracle`]: run a batch of toys at `r`, and merge two batches
//! taken at the same `r`. The search never inspects toys directly, only the
//! CL values reported by [`HypoTestResult`].

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod constants;
mod observer;
mod oracle;
mod result;
mod types;

// Functional modules
pub mod adaptive;
pub mod hybrid;
pub mod output;
pub mod search;
pub mod testing;

// Re-exports for public API
pub use adaptive::{AdaptiveEvaluator, EvaluationError, Sampling};
pub use config::{Config, ConfigError};
pub use constants::{DEFAULT_SEED, HINT_SCALE, MAX_EXPANSION_RATIO, SIGNIFICANCE_SIGMAS};
pub use hybrid::{CountingExperiment, NuisancePrior, ToyDistribution};
pub use observer::{Evaluation, RecordingObserver, SearchObserver, SearchPhase, TracingObserver};
pub use oracle::{ConfidenceOracle, HypoTestResult, OracleError, OracleSettings};
pub use result::{LimitResult, SearchError, Termination};
pub use search::LimitSearch;
pub use types::{ConfidenceEstimate, ExclusionStatistic, ParameterPoint, SearchState, TestStatistic};
