use log::trace;

use crate::common::checker;
use crate::constants::{
    NUMERIC_TOLERANCE,
    SPLIT_ENTROPY_TOLERANCE,
};
use super::split_table::SplitTable;


/// Returns the entropy (in bits) of the distribution
/// proportional to `weights`.
/// ```txt
/// H(w) = - sum_i p_i log2(p_i),   p_i = w_i / sum_j w_j.
/// ```
/// Zero weights are skipped.
/// The entropy of an empty or all-zero distribution is `0`.
#[inline]
pub fn entropy(weights: &[f64]) -> f64 {
    let total = weights.iter().sum::<f64>();
    entropy_with_total(weights, total)
}


#[inline(always)]
pub(crate) fn entropy_with_total(weights: &[f64], total: f64) -> f64 {
    if checker::is_zero_weight(total) || total < 0f64 { return 0f64; }

    let ent = weights.iter()
        .filter(|&&w| w > 0f64 && !checker::is_zero_weight(w))
        .map(|&w| {
            let p = w / total;
            -p * p.log2()
        })
        .sum::<f64>();

    ent.max(0f64)
}


/// Returns the entropy of the label given the branch,
/// over the known branches of `table`.
/// ```txt
/// H(label | branch) = sum_b (w_b / W) H(label | b).
/// ```
pub fn conditional_entropy(table: &SplitTable) -> f64 {
    let total = table.known_weight();
    if checker::is_zero_weight(total) { return 0f64; }

    table.branches()
        .map(|row| {
            let w = row.iter().sum::<f64>();
            (w / total) * entropy_with_total(row, w)
        })
        .sum::<f64>()
}


/// Returns the mutual information between the branch and the label,
/// ```txt
/// I(label; branch) = H(label) - H(label | branch),
/// ```
/// over the known branches of `table`.
/// Negative values caused by rounding are clamped to `0`.
pub fn mutual_information(table: &SplitTable) -> f64 {
    let label_entropy = entropy(&table.label_weights());
    let info = label_entropy - conditional_entropy(table);

    if info < 0f64 {
        if info < -NUMERIC_TOLERANCE {
            trace!("clamping mutual information {info} to 0");
        }
        return 0f64;
    }
    info
}


/// Returns the entropy of the branch-size distribution.
/// This never panics; see [`split_entropy`] for the checked version.
#[inline]
pub fn branch_entropy(branch_weights: &[f64]) -> f64 {
    entropy(branch_weights)
}


/// Returns the entropy of the branch-size distribution,
/// the denominator of the gain ratio.
///
/// # Panics
/// Panics if the split entropy is (almost) zero,
/// i.e., all the weight goes to a single branch.
#[inline]
pub fn split_entropy(branch_weights: &[f64]) -> f64 {
    let ent = branch_entropy(branch_weights);
    checker::split_entropy(ent, SPLIT_ENTROPY_TOLERANCE);
    ent
}


/// Returns the gain ratio `info / split_entropy`.
///
/// # Panics
/// Panics if `split_entropy` is (almost) zero.
#[inline]
pub fn gain_ratio(info: f64, split_entropy: f64) -> f64 {
    checker::split_entropy(split_entropy, SPLIT_ENTROPY_TOLERANCE);
    info / split_entropy
}


/// Returns the minimum description length penalty of choosing
/// one threshold among `n_thresholds` candidates,
/// normalized by the total weight.
/// ```txt
/// log2(n_thresholds) / total_weight
/// ```
/// Returns `0` if there is at most one candidate or no weight.
#[inline]
pub fn mdl_penalty(n_thresholds: usize, total_weight: f64) -> f64 {
    if n_thresholds <= 1 || total_weight <= 0f64 { return 0f64; }
    (n_thresholds as f64).log2() / total_weight
}


/// Normalize `info` by `log2(branch_count)`.
/// A split with at most one branch has no information.
#[inline]
pub fn normalize_by_branch_count(info: f64, branch_count: usize) -> f64 {
    if branch_count <= 1 { return 0f64; }
    info / (branch_count as f64).log2()
}
