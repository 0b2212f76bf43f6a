//! Bookkeeping for toy batches requested during one search.

use std::time::{Duration, Instant};

/// Counters and deadline shared by every evaluation of a search.
#[derive(Debug, Clone)]
pub struct SamplingState {
    /// Batches requested from the oracle.
    batches: usize,

    /// Toys per batch, per hypothesis.
    toys_per_batch: usize,

    /// Start time of the search for budget tracking.
    start_time: Instant,

    /// Optional wall-time budget.
    time_budget: Option<Duration>,
}

impl SamplingState {
    /// Create a new state starting the clock now.
    pub fn new(toys_per_batch: usize, time_budget: Option<Duration>) -> Self {
        Self {
            batches: 0,
            toys_per_batch,
            start_time: Instant::now(),
            time_budget,
        }
    }

    /// Record one batch.
    pub fn record_batch(&mut self) {
        self.batches += 1;
    }

    /// Batches requested so far.
    pub fn batches(&self) -> usize {
        self.batches
    }

    /// Toys thrown so far, per hypothesis.
    pub fn toys(&self) -> usize {
        self.batches * self.toys_per_batch
    }

    /// Time since the search started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// True once the time budget, if any, is spent.
    pub fn budget_exhausted(&self) -> bool {
        self.time_budget
            .is_some_and(|budget| self.start_time.elapsed() >= budget)
    }
}
