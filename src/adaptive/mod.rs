//! Adaptive toy accumulation.
//!
//! Each point of the search gets one batch of toys. When a decision depends
//! on which side of a target the statistic falls, more batches are merged
//! into the same result until the answer is significant at three standard
//! errors or the error is below the configured statistic accuracy.
//!
//! ## Key Design Decisions
//!
//! - **Merging belongs to the oracle**: the evaluator never averages
//!   estimates; it hands both batches to `ConfidenceOracle::accumulate`.
//!
//! - **Budget checks only before extra batches**: the first batch at a
//!   point is always thrown, so a search without a time budget behaves
//!   exactly as one with an unexhausted budget.

mod evaluator;
mod state;

pub use evaluator::{AdaptiveEvaluator, EvaluationError, Sampling};
pub use state::SamplingState;
