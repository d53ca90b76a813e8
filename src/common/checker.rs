//! This file defines some functions that checks some pre-conditions
//! E.g., the minimum branch weight and the smoothing parameters.
//! A violated pre-condition is a programming error, so these panic.

use crate::constants::{
    NUMERIC_TOLERANCE,
    ZERO_WEIGHT_TOLERANCE,
};

/// Check the minimum weight a branch must carry.
#[inline(always)]
pub(crate) fn min_split(min_split: f64) {
    assert!(
        min_split.is_finite() && min_split >= 0f64,
        "min_split must be a non-negative finite number. got {min_split}."
    );
}

/// Check the smoothing parameters used for the threshold search.
#[inline(always)]
pub(crate) fn smoothing(smooth_instances: usize, smooth_factor: f64) {
    assert!(
        smooth_factor.is_finite() && smooth_factor >= 0f64,
        "smooth_factor must be a non-negative finite number. \
        got {smooth_factor} (smooth_instances = {smooth_instances})."
    );
}

/// Check the maximal number of intervals of a multi-threshold split.
#[inline(always)]
pub(crate) fn max_intervals(n: usize) {
    assert!(n >= 2, "a split needs at least 2 intervals. got {n}.");
}

/// Check that the column was sorted before a threshold search.
#[inline(always)]
pub(crate) fn sorted(ordered: bool) {
    assert!(
        ordered,
        "the column must be sorted before searching a threshold. \
        call `WeightedValueColumn::sort` after the last `add_known`."
    );
}

/// Check that a split entropy can be used as a denominator.
#[inline(always)]
pub(crate) fn split_entropy(split_entropy: f64, tolerance: f64) {
    assert!(
        split_entropy > tolerance,
        "split entropy is {split_entropy} <= {tolerance}. \
        the gain ratio is undefined for this split."
    );
}

/// Returns `true` if the weight is regarded as absent.
#[inline(always)]
pub(crate) fn is_zero_weight(weight: f64) -> bool {
    weight.abs() <= ZERO_WEIGHT_TOLERANCE
}

/// Returns `true` if `value` went below zero by more than rounding.
#[inline(always)]
pub(crate) fn underflows(value: f64) -> bool {
    value < -NUMERIC_TOLERANCE
}
