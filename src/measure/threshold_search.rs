use log::trace;

use crate::common::checker;
use crate::column::{WeightedValueColumn, WeightedSample};
use crate::constants::{NUMERIC_TOLERANCE, SCORE_TIE_TOLERANCE};
use super::split_table::{Branch, DistCounts, SplitTable};


/// Parameters of a threshold search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    /// Minimum weight each side of the cut must carry.
    pub min_split: f64,
    /// Number of pseudo-instances added to each branch before scoring.
    pub smooth_instances: usize,
    /// Weight of each pseudo-instance.
    pub smooth_factor: f64,
}


impl SearchParams {
    /// Construct the parameters without smoothing.
    pub fn new(min_split: f64) -> Self {
        checker::min_split(min_split);
        Self { min_split, smooth_instances: 0, smooth_factor: 0f64 }
    }


    /// Set the smoothing parameters.
    pub fn smoothing(mut self, smooth_instances: usize, smooth_factor: f64)
        -> Self
    {
        checker::smoothing(smooth_instances, smooth_factor);
        self.smooth_instances = smooth_instances;
        self.smooth_factor = smooth_factor;
        self
    }


    /// Returns `true` if a side of weight `weight` passes `min_split`.
    /// Sums of fractional weights are compared up to rounding.
    #[inline]
    pub fn admits(&self, weight: f64) -> bool {
        weight + NUMERIC_TOLERANCE >= self.min_split
    }


    /// Returns the pseudo-count added to each `branch x label` cell,
    /// i.e., `smooth_instances` pseudo-instances of weight `smooth_factor`
    /// spread uniformly across the labels.
    #[inline]
    pub fn pseudo_count(&self, n_labels: usize) -> f64 {
        if self.smooth_instances == 0 || n_labels == 0 { return 0f64; }
        self.smooth_instances as f64 * self.smooth_factor / n_labels as f64
    }
}


/// The best cut point found by a threshold search.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdChoice {
    /// Number of samples on the left of the cut.
    pub split_index: usize,
    /// Samples with value `<= threshold` go left.
    pub threshold: f64,
    /// Score of the cut (before any MDL penalty).
    pub score: f64,
    /// Number of distinct cut points of the scanned samples.
    pub n_candidates: usize,
    /// Left/right/unknown weights at the cut.
    pub dist: DistCounts,
}


/// Search the best threshold over the known samples of a sorted `column`.
/// `dist` must be the table returned by
/// [`WeightedValueColumn::init_dist_counts`].
///
/// See [`best_threshold_in`] for the details.
///
/// # Panics
/// Panics if `column` is not sorted.
pub fn best_threshold<F>(
    column: &WeightedValueColumn,
    dist: DistCounts,
    params: &SearchParams,
    scorer: F,
) -> Option<ThresholdChoice>
    where F: FnMut(&SplitTable) -> f64,
{
    checker::sorted(column.is_sorted());
    best_threshold_in(column.known(), dist, params, scorer)
}


/// Search the best threshold over `samples`,
/// sorted in ascending order of value.
///
/// Cut points are the boundaries between consecutive *distinct* values,
/// so equal values always stay on the same side.
/// Advancing the cut moves the per-label weight of each group of equal
/// values from the right branch to the left branch of `dist`,
/// and the resulting table is scored by `scorer`.
/// A cut leaving less than `params.min_split` weight on either side
/// is skipped.
/// A later cut replaces the best one only if it scores strictly higher,
/// so ties resolve to the lowest threshold.
///
/// Returns `None` if no cut passes.
pub fn best_threshold_in<F>(
    samples: &[WeightedSample],
    mut dist: DistCounts,
    params: &SearchParams,
    mut scorer: F,
) -> Option<ThresholdChoice>
    where F: FnMut(&SplitTable) -> f64,
{
    let n_samples = samples.len();
    let pseudo_count = params.pseudo_count(dist.n_labels());

    let mut best: Option<ThresholdChoice> = None;
    let mut n_candidates = 0_usize;

    let mut i = 0_usize;
    while i < n_samples {
        // Move the group of samples sharing this value from right to left.
        let value = samples[i].value;
        while i < n_samples && samples[i].value == value {
            let sample = &samples[i];
            if let Some(label) = sample.label {
                dist.move_left(label, sample.weight);
            }
            i += 1;
        }

        // No cut after the largest value.
        if i == n_samples { break; }
        n_candidates += 1;

        let left = dist.weight(Branch::Left);
        let right = dist.weight(Branch::Right);
        if !params.admits(left) || !params.admits(right) {
            continue;
        }

        let table = dist.to_split_table();
        let score = if pseudo_count > 0f64 {
            scorer(&table.smoothed(pseudo_count))
        } else {
            scorer(&table)
        };

        let next = samples[i].value;
        trace!("cut {value}|{next}: left {left}, right {right}, score {score}");

        let improves = best.as_ref()
            .map_or(true, |b| score > b.score + SCORE_TIE_TOLERANCE);
        if improves {
            best = Some(ThresholdChoice {
                split_index: i,
                threshold: midpoint(value, next),
                score,
                n_candidates: 0,
                dist: dist.clone(),
            });
        }
    }

    best.map(|mut choice| {
        choice.n_candidates = n_candidates;
        choice
    })
}


/// Returns a threshold `t` with `left <= t < right`.
#[inline(always)]
fn midpoint(left: f64, right: f64) -> f64 {
    let mid = left + (right - left) / 2f64;
    if mid < right { mid } else { left }
}
