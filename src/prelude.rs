//! Exports the standard types, traits and functions.
//! 
pub use crate::error::{
    SplitError,
    Result,
};


pub use crate::sample::{
    Schema,
    Attribute,
    AttributeKind,
    Instance,
    AttrValue,
};


pub use crate::counter::{
    // Nominal counts
    AttributeCounters,
    AttributeCube,
    NominalCube,
};


pub use crate::column::{
    // Continuous samples
    WeightedValueColumn,
    WeightedSample,
};


pub use crate::measure::{
    // Tables
    Branch,
    DistCounts,
    SplitTable,


    // Measures
    entropy,
    conditional_entropy,
    mutual_information,
    branch_entropy,
    split_entropy,
    gain_ratio,
    mdl_penalty,
    normalize_by_branch_count,


    // Threshold search
    best_threshold,
    best_threshold_in,
    SearchParams,
    ThresholdChoice,
};


pub use crate::split::{
    // Split evaluator
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
