//! Numeric constants shared by the counters, the column and the measures.

/// Weights whose absolute value is at most this are treated as absent.
pub const ZERO_WEIGHT_TOLERANCE: f64 = 1e-12;
/// Tolerance for accumulated rounding in counters and information values.
pub const NUMERIC_TOLERANCE:     f64 = 1e-9;
/// A split entropy at most this is regarded as zero.
pub const SPLIT_ENTROPY_TOLERANCE: f64 = 1e-10;
/// A candidate must beat the current best by more than this to replace it.
pub const SCORE_TIE_TOLERANCE:   f64 = 1e-12;

/// Default minimum weight of a branch.
pub const DEFAULT_MIN_SPLIT:     f64 = 1f64;
/// Default number of intervals of a continuous split.
pub const DEFAULT_MAX_INTERVALS: usize = 2;
