//! Constants shared by the search and the toy generator.

/// Default deterministic seed for toy generation.
///
/// The value `0x687962726964` is "hybrid" encoded in ASCII.
pub const DEFAULT_SEED: u64 = 0x687962726964;

/// Bracket expansion gives up once the trial value reaches this multiple
/// of the initial upper bound.
pub const MAX_EXPANSION_RATIO: f64 = 20.0;

/// Number of standard errors separating an estimate from its target before
/// the estimate is trusted for a decision.
pub const SIGNIFICANCE_SIGMAS: f64 = 3.0;

/// Factor applied to a hint when narrowing the initial upper bound.
pub const HINT_SCALE: f64 = 3.0;
