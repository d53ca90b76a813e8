//! A sortable, two-partition view of one continuous attribute's samples.

/// Defines the weighted value column.
mod weighted_value_column;


pub use weighted_value_column::{WeightedValueColumn, WeightedSample};
