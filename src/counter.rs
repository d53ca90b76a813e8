//! Weighted co-occurrence counts between nominal attributes and the label.
//!
//! [`AttributeCounters`] keeps, for every nominal attribute of a node,
//! a [`NominalCube`] of `label x value` weights.
//! Continuous attributes carry [`AttributeCube::Continuous`] instead,
//! and their values are examined through
//! [`WeightedValueColumn`](crate::WeightedValueColumn).

/// Defines the joint cube of one nominal attribute.
mod nominal_cube;
/// Defines the counters over all attributes of a node.
mod attribute_counters;


pub use nominal_cube::NominalCube;
pub use attribute_counters::{AttributeCounters, AttributeCube};
