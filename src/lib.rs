#![warn(missing_docs)]

//! 
//! A crate that evaluates the candidate splits of a classification tree node.
//! Given the weighted, labeled instances that reach a node,
//! this crate decides, for each attribute,
//! whether a useful split exists, what kind of split it is,
//! where the threshold lies, and how good it is
//! under an information-theoretic criterion.
//! 
//! The crate consists of the following parts.
//! 
//! - [`AttributeCounters`]
//!     Weighted `label x value` counts of every nominal attribute,
//!     updated incrementally by adding/removing instances.
//! 
//! - [`WeightedValueColumn`]
//!     The sorted `(value, label, weight)` samples of a continuous attribute,
//!     with the missing values kept apart.
//! 
//! - [`measure`]
//!     Entropy, mutual information, split entropy, the MDL penalty,
//!     and the linear-scan best-threshold search.
//! 
//! - [`SplitEvaluator`]
//!     Produces a [`SplitCandidate`] per attribute
//!     under a configurable [`Criterion`].
//! 
//! The tree construction itself (when to stop, how to prune) is left to
//! the caller.

pub mod constants;
pub mod error;
pub mod sample;
pub mod counter;
pub mod column;
pub mod measure;
pub mod split;
pub mod prelude;

mod common;


pub use error::{SplitError, Result};

pub use sample::{
    Schema,
    Attribute,
    AttributeKind,
    Instance,
    AttrValue,
};

pub use counter::{
    AttributeCounters,
    AttributeCube,
    NominalCube,
};

pub use column::{
    WeightedValueColumn,
    WeightedSample,
};

pub use measure::{
    Branch,
    DistCounts,
    SplitTable,
};

pub use split::{
    Criterion,
    SplitScore,
    SplitConfig,
    SplitEvaluatorBuilder,
    SplitEvaluator,
    SplitCandidate,
    SplitRule,
    SplitType,
    evaluate_attributes,
    best_candidate,
};
