//! Error type for the recoverable failures of this crate.
//!
//! Programmer misuse (asking a nominal verdict for its threshold,
//! a negative `min_split`, ...) is not represented here.
//! Those conditions panic through the functions in `common::checker`.

use thiserror::Error;

/// Errors raised while counting or projecting a node's instances.
#[derive(Debug, Error)]
pub enum SplitError {
    /// A nominal-only query on a continuous attribute.
    #[error("Attribute {0} is continuous and has no joint value x label counts")]
    InvalidAttribute(usize),

    /// Removing an instance would drive a counter negative.
    #[error(
        "Counter underflow on attribute {attr:?}: \
        removing {weight} leaves {remaining}"
    )]
    CounterUnderflow {
        /// The nominal attribute, `None` for the label counts.
        attr: Option<usize>,
        /// The weight being removed.
        weight: f64,
        /// What would remain.
        remaining: f64,
    },

    /// The instance arity differs from the schema.
    #[error("Instance has {got} values, but the schema has {expected} attributes")]
    SchemaMismatch {
        /// Number of attributes in the schema.
        expected: usize,
        /// Number of values of the instance.
        got: usize,
    },

    /// No such attribute.
    #[error("Attribute index {0} is out of range")]
    AttributeOutOfRange(usize),

    /// A nominal value index at or above the cardinality.
    #[error("Value {value} is out of range for attribute {attr} of cardinality {cardinality}")]
    ValueOutOfRange {
        /// The attribute.
        attr: usize,
        /// The offending value.
        value: usize,
        /// Number of values of the attribute.
        cardinality: usize,
    },

    /// A label index at or above the number of labels.
    #[error("Label {label} is out of range for {n_labels} labels")]
    LabelOutOfRange {
        /// The offending label.
        label: usize,
        /// Number of labels.
        n_labels: usize,
    },

    /// Labeled data where unlabeled is expected, or vice versa.
    #[error("Label mismatch: {0}")]
    LabelMismatch(&'static str),

    /// A nominal value for a continuous attribute, or vice versa.
    #[error("Attribute {attr} is {expected}, but got a value of another kind")]
    KindMismatch {
        /// The attribute.
        attr: usize,
        /// The kind of the attribute.
        expected: &'static str,
    },

    /// A negative (or NaN) weight.
    #[error("Weight must be non-negative. got {0}")]
    NegativeWeight(f64),

    /// An infinite or NaN real value.
    #[error("Value {0} is not finite")]
    NonFiniteValue(f64),

    /// More samples than the column was created for.
    #[error("Column is full. capacity is {0}")]
    ColumnOverflow(usize),

    /// A configuration that cannot be read.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, SplitError>;
