//! Information-theoretic measures over weight tables
//! and the best-threshold search for continuous attributes.
//!
//! All functions here are pure; they never touch the counters or the column
//! they are given beyond reading them.

/// Defines the joint tables the measures are computed on.
mod split_table;
/// Defines entropy, mutual information and related measures.
mod entropy;
/// Defines the linear-scan threshold search.
mod threshold_search;


pub use split_table::{Branch, DistCounts, SplitTable};
pub use entropy::{
    entropy,
    conditional_entropy,
    mutual_information,
    branch_entropy,
    split_entropy,
    gain_ratio,
    mdl_penalty,
    normalize_by_branch_count,
};
pub use threshold_search::{
    best_threshold,
    best_threshold_in,
    SearchParams,
    ThresholdChoice,
};
