use log::{debug, warn};

use std::fmt;
use std::sync::Arc;

use crate::common::checker;
use crate::constants::{NUMERIC_TOLERANCE, SCORE_TIE_TOLERANCE};
use crate::error::Result;
use crate::counter::{AttributeCounters, NominalCube};
use crate::column::{WeightedValueColumn, WeightedSample};
use crate::measure::{
    DistCounts,
    SearchParams,
    SplitTable,
    best_threshold,
    best_threshold_in,
    branch_entropy,
    mdl_penalty,
    mutual_information,
};
use super::builder::{SplitConfig, SplitEvaluatorBuilder};
use super::criterion::SplitScore;
use super::split_candidate::{SplitCandidate, SplitRule};


/// The state of an evaluator.
#[derive(Clone)]
enum EvalState {
    Reset,
    Evaluated(SplitCandidate),
}


/// The split evaluator.
/// Given the counts of a node, [`SplitEvaluator`] decides whether
/// a useful split of one attribute exists, what kind of split it is,
/// and how good it is under the configured [`Criterion`](crate::Criterion).
///
/// An evaluator produces one [`SplitCandidate`].
/// Evaluating again requires [`SplitEvaluator::reset`]
/// (or a fresh evaluator).
///
/// [`SplitEvaluator`] is constructed
/// by [`SplitEvaluatorBuilder`].
///
/// # Example
/// ```
/// use attrsplit::prelude::*;
///
/// let mut column = WeightedValueColumn::new(4, Some(2));
/// for (value, label) in [(1.0, 0), (2.0, 0), (3.0, 1), (4.0, 1)] {
///     column.add_labeled_known(value, label, 1.0).unwrap();
/// }
/// column.sort();
///
/// let mut evaluator = SplitEvaluatorBuilder::new()
///     .penalize_mdl(false)
///     .build();
/// let candidate = evaluator.make_real_split(&column, 0, 1.0, 0, 0.0);
///
/// assert!(candidate.exists_split());
/// assert_eq!(candidate.threshold(), 2.5);
/// assert!((candidate.score() - 1.0).abs() < 1e-12);
/// ```
#[derive(Clone)]
pub struct SplitEvaluator {
    config: SplitConfig,
    external: Option<Arc<dyn SplitScore>>,
    state: EvalState,
}


impl Default for SplitEvaluator {
    fn default() -> Self {
        SplitEvaluatorBuilder::new().build()
    }
}


impl SplitEvaluator {
    /// Initialize [`SplitEvaluator`].
    /// This method is called only via `SplitEvaluatorBuilder::build`.
    #[inline]
    pub(super) fn from_components(
        config: SplitConfig,
        external: Option<Arc<dyn SplitScore>>,
    ) -> Self
    {
        Self { config, external, state: EvalState::Reset, }
    }


    /// Returns an evaluator with the same parameters in the reset state.
    #[inline]
    pub fn fresh(&self) -> Self {
        Self::from_components(self.config, self.external.clone())
    }


    /// Returns the parameters of this evaluator.
    #[inline]
    pub fn config(&self) -> &SplitConfig {
        &self.config
    }


    /// Returns `true` if this evaluator holds a verdict.
    #[inline]
    pub fn is_evaluated(&self) -> bool {
        matches!(self.state, EvalState::Evaluated(_))
    }


    /// Returns the verdict, or `None` before an evaluation.
    #[inline]
    pub fn candidate(&self) -> Option<&SplitCandidate> {
        match &self.state {
            EvalState::Evaluated(candidate) => Some(candidate),
            EvalState::Reset => None,
        }
    }


    /// Consume this evaluator and returns the verdict.
    #[inline]
    pub fn into_candidate(self) -> Option<SplitCandidate> {
        match self.state {
            EvalState::Evaluated(candidate) => Some(candidate),
            EvalState::Reset => None,
        }
    }


    /// Drop the verdict so that this evaluator can be used again.
    #[inline]
    pub fn reset(&mut self) {
        self.state = EvalState::Reset;
    }


    /// Returns `true` if the nominal attribute `attr` is worth splitting:
    /// at least two values are observed and, when `min_split > 1`,
    /// at least two of them carry weight `>= min_split`.
    ///
    /// # Panics
    /// Panics if `min_split` is negative.
    pub fn ok_to_split(
        attr: usize,
        counters: &AttributeCounters,
        min_split: f64,
    ) -> Result<bool>
    {
        checker::min_split(min_split);
        let cube = counters.cube(attr)?;
        if cube.used_value_count() < 2 { return Ok(false); }
        if min_split <= 1f64 { return Ok(true); }

        let heavy = cube.value_counts()
            .iter()
            .filter(|&&w| w + NUMERIC_TOLERANCE >= min_split)
            .count();
        Ok(heavy >= 2)
    }


    /// Evaluate the split of the nominal attribute `attr`
    /// with one branch per observed value.
    ///
    /// A split exists whenever at least one value is observed
    /// and the data is labeled.
    /// A single branch scores `0` under the built-in criteria.
    ///
    /// # Panics
    /// Panics if this evaluator already holds a verdict.
    pub fn make_nominal_split(
        &mut self,
        counters: &AttributeCounters,
        attr: usize,
    ) -> Result<&SplitCandidate>
    {
        self.check_reset();
        let cube = counters.cube(attr)?;
        if let Some(candidate) = reject_unlabeled(cube, attr) {
            return Ok(self.finish(candidate));
        }

        let values = cube.used_values().collect::<Vec<_>>();
        let rows = values.iter()
            .map(|&v| (0..cube.n_labels()).map(|l| cube.count(l, v)).collect())
            .collect::<Vec<Vec<f64>>>();
        let table = SplitTable::from_rows(
            rows, cube.unknown_label_counts().to_vec()
        );

        let candidate = if values.is_empty() {
            SplitCandidate::none(attr, table)
        } else {
            self.discrete_candidate(
                attr, SplitRule::Nominal { values }, table
            )
        };
        Ok(self.finish(candidate))
    }


    /// Evaluate the split of the nominal attribute `attr`
    /// where value `v` goes to branch `branch_of[v]`.
    ///
    /// A split exists whenever some value is observed
    /// and the data is labeled.
    ///
    /// # Panics
    /// Panics if this evaluator already holds a verdict,
    /// or if `branch_of` does not have one entry per nominal value.
    pub fn make_partition_split(
        &mut self,
        counters: &AttributeCounters,
        attr: usize,
        branch_of: &[usize],
    ) -> Result<&SplitCandidate>
    {
        self.check_reset();
        let cube = counters.cube(attr)?;
        assert_eq!(
            branch_of.len(), cube.cardinality(),
            "a partition must assign a branch to each of the {} values",
            cube.cardinality()
        );
        if let Some(candidate) = reject_unlabeled(cube, attr) {
            return Ok(self.finish(candidate));
        }

        let n_labels = cube.n_labels();
        let n_branches = branch_of.iter()
            .max()
            .map_or(0, |&b| b + 1);
        let mut rows = vec![vec![0f64; n_labels]; n_branches];
        for (v, &b) in branch_of.iter().enumerate() {
            for (l, cell) in rows[b].iter_mut().enumerate() {
                *cell += cube.count(l, v);
            }
        }
        let table = SplitTable::from_rows(
            rows, cube.unknown_label_counts().to_vec()
        );

        let candidate = if cube.used_value_count() == 0 {
            SplitCandidate::none(attr, table)
        } else {
            let rule = SplitRule::Partition { branch_of: branch_of.to_vec() };
            self.discrete_candidate(attr, rule, table)
        };
        Ok(self.finish(candidate))
    }


    /// Evaluate the best binary threshold split of the continuous
    /// attribute `attr` held by the sorted `column`.
    ///
    /// No split exists if fewer than two labels or two distinct values
    /// are observed, if no cut leaves `min_split` weight on both sides,
    /// or if the MDL penalty (when enabled) consumes the whole score.
    ///
    /// # Panics
    /// Panics if this evaluator already holds a verdict,
    /// if `column` is not sorted,
    /// or if `min_split` / `smooth_factor` is negative.
    pub fn make_real_split(
        &mut self,
        column: &WeightedValueColumn,
        attr: usize,
        min_split: f64,
        smooth_instances: usize,
        smooth_factor: f64,
    ) -> &SplitCandidate
    {
        self.check_reset();
        checker::sorted(column.is_sorted());
        let params = SearchParams::new(min_split)
            .smoothing(smooth_instances, smooth_factor);

        let dist = column.init_dist_counts();
        if let Some(candidate) = reject_column(column, &dist, attr) {
            return self.finish(candidate);
        }

        let choice = best_threshold(
            column, dist, &params, |table| self.score_table(table)
        );

        let candidate = match choice {
            None => {
                debug!("attribute {attr}: no threshold passes min_split = {min_split}");
                SplitCandidate::none(attr, column_table(column, &[]))
            },
            Some(choice) => {
                let table = choice.dist.to_split_table();
                let penalty = if self.config.penalize_mdl {
                    mdl_penalty(choice.n_candidates, column.known_weight())
                } else {
                    0f64
                };
                let rule = SplitRule::RealThreshold(choice.threshold);
                self.continuous_candidate(attr, rule, table, choice.score, penalty)
            },
        };
        self.finish(candidate)
    }


    /// Evaluate the split of the continuous attribute `attr`
    /// into at most `max_intervals` intervals.
    ///
    /// Starting from the whole range, the interval whose best cut
    /// gains the most information over the node is cut,
    /// until `max_intervals` intervals are reached or no interval
    /// can be cut with `min_split` weight on both sides.
    ///
    /// # Panics
    /// Panics if this evaluator already holds a verdict,
    /// if `column` is not sorted, if `max_intervals < 2`,
    /// or if `min_split` is negative.
    pub fn make_multi_threshold_split(
        &mut self,
        column: &WeightedValueColumn,
        attr: usize,
        max_intervals: usize,
        min_split: f64,
    ) -> &SplitCandidate
    {
        self.check_reset();
        checker::sorted(column.is_sorted());
        checker::max_intervals(max_intervals);
        let params = SearchParams::new(min_split);

        let dist = column.init_dist_counts();
        if let Some(candidate) = reject_column(column, &dist, attr) {
            return self.finish(candidate);
        }

        let known = column.known();
        let total = column.known_weight();
        let n_labels = dist.n_labels();

        // `bounds` holds the sample index where each interval starts.
        let mut bounds = vec![0_usize];
        let mut thresholds = Vec::<f64>::new();
        let mut n_candidates = 0_usize;
        while bounds.len() < max_intervals {
            let mut best: Option<(usize, usize, f64, f64)> = None;
            for k in 0..bounds.len() {
                let start = bounds[k];
                let end = bounds.get(k + 1).copied().unwrap_or(known.len());
                let samples = &known[start..end];

                let dist = DistCounts::new(
                    label_weights(samples, n_labels), vec![0f64; n_labels]
                );
                let Some(choice) = best_threshold_in(
                    samples, dist, &params, mutual_information
                ) else { continue; };
                if thresholds.is_empty() {
                    n_candidates = choice.n_candidates;
                }

                let weight = samples.iter().map(|s| s.weight).sum::<f64>();
                let gain = choice.score * weight / total;
                let improves = best
                    .map_or(true, |(_, _, g, _)| gain > g + SCORE_TIE_TOLERANCE);
                if improves {
                    best = Some((k, start + choice.split_index, gain, choice.threshold));
                }
            }

            match best {
                Some((k, cut, gain, threshold)) if gain > NUMERIC_TOLERANCE => {
                    bounds.insert(k + 1, cut);
                    thresholds.insert(k, threshold);
                },
                _ => { break; },
            }
        }

        let candidate = if thresholds.is_empty() {
            debug!("attribute {attr}: no interval can be cut");
            SplitCandidate::none(attr, column_table(column, &[]))
        } else {
            let table = column_table(column, &bounds);
            let score = self.score_table(&table);
            let penalty = if self.config.penalize_mdl {
                thresholds.len() as f64 * mdl_penalty(n_candidates, total)
            } else {
                0f64
            };
            let rule = SplitRule::MultiThreshold(thresholds);
            self.continuous_candidate(attr, rule, table, score, penalty)
        };
        self.finish(candidate)
    }


    /// Evaluate the continuous attribute `attr` with the configured
    /// parameters: a binary threshold split if `max_intervals == 2`,
    /// a multi-threshold split otherwise.
    ///
    /// # Panics
    /// Panics if this evaluator already holds a verdict
    /// or if `column` is not sorted.
    pub fn make_configured_real_split(
        &mut self,
        column: &WeightedValueColumn,
        attr: usize,
    ) -> &SplitCandidate
    {
        let SplitConfig {
            min_split,
            smooth_instances,
            smooth_factor,
            max_intervals,
            ..
        } = self.config;

        if max_intervals > 2 {
            self.make_multi_threshold_split(column, attr, max_intervals, min_split)
        } else {
            self.make_real_split(
                column, attr, min_split, smooth_instances, smooth_factor
            )
        }
    }


    /// Returns the score of `table` under the configured criterion.
    #[inline]
    pub fn score_table(&self, table: &SplitTable) -> f64 {
        self.config.criterion.score(table, self.external.as_deref())
    }


    fn discrete_candidate(
        &self,
        attr: usize,
        rule: SplitRule,
        table: SplitTable,
    ) -> SplitCandidate
    {
        let score = self.score_table(&table);
        let mutual_info = mutual_information(&table);
        let split_entropy = branch_entropy(&table.branch_weights());
        debug!(
            "attribute {attr}: {} split, {} branches, score {score}",
            rule.split_type(), table.n_branches()
        );

        SplitCandidate {
            attr,
            rule,
            exists: true,
            penalty: 0f64,
            score,
            mutual_info,
            split_entropy,
            table,
        }
    }


    /// The MDL penalty is subtracted from the criterion score as is,
    /// whatever the criterion.
    /// For `GainRatio` and `NormalizedMutualInformation` the result is
    /// `ratio - penalty`, not `(info - penalty) / denominator`.
    fn continuous_candidate(
        &self,
        attr: usize,
        rule: SplitRule,
        table: SplitTable,
        score: f64,
        penalty: f64,
    ) -> SplitCandidate
    {
        let score = score - penalty;
        if self.config.penalize_mdl && score <= 0f64 {
            warn!(
                "attribute {attr}: MDL penalty {penalty} rejects the {} split",
                rule.split_type()
            );
            let mut candidate = SplitCandidate::none(attr, table);
            candidate.penalty = penalty;
            return candidate;
        }

        let mutual_info = mutual_information(&table);
        let split_entropy = branch_entropy(&table.branch_weights());
        debug!(
            "attribute {attr}: {} split {:?}, score {score} (penalty {penalty})",
            rule.split_type(), rule
        );

        SplitCandidate {
            attr,
            rule,
            exists: true,
            penalty,
            score,
            mutual_info,
            split_entropy,
            table,
        }
    }


    #[inline]
    fn check_reset(&self) {
        assert!(
            !self.is_evaluated(),
            "the evaluator already holds a verdict. call `reset()` first."
        );
    }


    #[inline]
    fn finish(&mut self, candidate: SplitCandidate) -> &SplitCandidate {
        self.state = EvalState::Evaluated(candidate);
        match &self.state {
            EvalState::Evaluated(candidate) => candidate,
            EvalState::Reset => unreachable!(),
        }
    }
}


/// Returns a no-split verdict if the cube of `attr` carries no label.
fn reject_unlabeled(cube: &NominalCube, attr: usize)
    -> Option<SplitCandidate>
{
    if cube.n_labels() > 0 { return None; }
    debug!("attribute {attr}: unlabeled data. no split");
    let table = SplitTable::new(0);
    Some(SplitCandidate::none(attr, table))
}


/// Returns a no-split verdict if `column` cannot be split at all.
fn reject_column(
    column: &WeightedValueColumn,
    dist: &DistCounts,
    attr: usize,
) -> Option<SplitCandidate>
{
    let used_labels = dist.used_label_count();
    let distinct = column.distinct_known_values();
    if used_labels < 2 || distinct < 2 {
        debug!(
            "attribute {attr}: {used_labels} used labels, \
            {distinct} distinct values. no split"
        );
        return Some(SplitCandidate::none(attr, column_table(column, &[])));
    }
    None
}


/// Returns the per-label weights of `samples`.
fn label_weights(samples: &[WeightedSample], n_labels: usize) -> Vec<f64> {
    let mut weights = vec![0f64; n_labels];
    for sample in samples {
        if let Some(l) = sample.label {
            weights[l] += sample.weight;
        }
    }
    weights
}


/// Returns the table of the intervals of `column` starting at `bounds`.
/// Empty `bounds` gives a table without branches.
fn column_table(column: &WeightedValueColumn, bounds: &[usize]) -> SplitTable {
    let n_labels = column.n_labels().unwrap_or(0);
    let known = column.known();
    let rows = bounds.iter()
        .enumerate()
        .map(|(k, &start)| {
            let end = bounds.get(k + 1).copied().unwrap_or(known.len());
            label_weights(&known[start..end], n_labels)
        })
        .collect();
    SplitTable::from_rows(rows, column.unknown_label_weights().to_vec())
}


impl fmt::Debug for SplitEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitEvaluator")
            .field("config", &self.config)
            .field("external", &self.external.is_some())
            .field("candidate", &self.candidate())
            .finish()
    }
}
