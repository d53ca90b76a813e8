//! The split evaluator and its verdicts.
//!
//! [`SplitEvaluator`] is the single entry point the tree controller calls
//! once per (node, attribute). It reads an
//! [`AttributeCounters`](crate::AttributeCounters) for a nominal attribute
//! or a [`WeightedValueColumn`](crate::WeightedValueColumn)
//! for a continuous one,
//! and produces a [`SplitCandidate`].

/// Defines the scoring criteria.
mod criterion;
/// Defines the configuration and the builder of `SplitEvaluator`.
mod builder;
/// Defines the verdict of an evaluation.
mod split_candidate;
/// Defines the evaluator.
mod split_evaluator;
/// Defines the parallel sweep over the attributes of a node.
mod parallel;


pub use criterion::{Criterion, SplitScore};
pub use builder::{SplitConfig, SplitEvaluatorBuilder};
pub use split_candidate::{SplitCandidate, SplitRule, SplitType};
pub use split_evaluator::SplitEvaluator;
pub use parallel::{evaluate_attributes, best_candidate};
