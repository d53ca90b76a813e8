use fixedbitset::FixedBitSet;
use serde::{Serialize, Deserialize};

use std::ops::Index;

use crate::common::checker;


/// Joint `branch x label` weights of a split.
///
/// Each known branch owns a per-label weight vector.
/// The weight of the instances whose value is missing
/// is kept apart in `unknown` and does not belong to any branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitTable {
    branches: Vec<Vec<f64>>,
    unknown: Vec<f64>,
}


impl SplitTable {
    /// Construct a table without branches for `n_labels` labels.
    pub fn new(n_labels: usize) -> Self {
        Self {
            branches: Vec::new(),
            unknown: vec![0f64; n_labels],
        }
    }


    /// Construct a table from its rows.
    ///
    /// # Panics
    /// Panics if some row does not have `unknown.len()` entries.
    pub fn from_rows(branches: Vec<Vec<f64>>, unknown: Vec<f64>) -> Self {
        let n_labels = unknown.len();
        assert!(
            branches.iter().all(|row| row.len() == n_labels),
            "every branch must have {n_labels} label weights"
        );
        Self { branches, unknown }
    }


    /// Append a branch.
    ///
    /// # Panics
    /// Panics if `row` does not have one weight per label.
    pub fn push_branch(&mut self, row: Vec<f64>) {
        assert_eq!(
            row.len(), self.n_labels(),
            "a branch must have one weight per label"
        );
        self.branches.push(row);
    }


    /// Returns the number of branches.
    #[inline]
    pub fn n_branches(&self) -> usize {
        self.branches.len()
    }


    /// Returns the number of labels.
    #[inline]
    pub fn n_labels(&self) -> usize {
        self.unknown.len()
    }


    /// Returns the per-label weights of the `b`-th branch.
    #[inline]
    pub fn branch(&self, b: usize) -> &[f64] {
        &self.branches[b][..]
    }


    /// Returns an iterator over the branches.
    #[inline]
    pub fn branches(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.branches.iter().map(|row| &row[..])
    }


    /// Returns the per-label weights of the unknown-value instances.
    #[inline]
    pub fn unknown(&self) -> &[f64] {
        &self.unknown[..]
    }


    /// Returns the total weight of each branch.
    pub fn branch_weights(&self) -> Vec<f64> {
        self.branches.iter()
            .map(|row| row.iter().sum::<f64>())
            .collect()
    }


    /// Returns the total weight of each label over the known branches.
    pub fn label_weights(&self) -> Vec<f64> {
        let mut weights = vec![0f64; self.n_labels()];
        for row in self.branches.iter() {
            weights.iter_mut()
                .zip(row)
                .for_each(|(w, r)| { *w += r; });
        }
        weights
    }


    /// Returns the total weight over the known branches.
    #[inline]
    pub fn known_weight(&self) -> f64 {
        self.branches.iter()
            .flatten()
            .sum::<f64>()
    }


    /// Returns the total weight of the unknown-value instances.
    #[inline]
    pub fn unknown_weight(&self) -> f64 {
        self.unknown.iter().sum::<f64>()
    }


    /// Returns the number of branches with non-zero weight.
    pub fn used_branch_count(&self) -> usize {
        self.branch_weights()
            .into_iter()
            .filter(|&w| !checker::is_zero_weight(w))
            .count()
    }


    /// Returns a copy of this table where every known cell
    /// receives `pseudo_count` additional weight.
    /// The unknown weights are kept as is.
    pub fn smoothed(&self, pseudo_count: f64) -> Self {
        let branches = self.branches.iter()
            .map(|row| row.iter().map(|w| w + pseudo_count).collect())
            .collect();
        Self { branches, unknown: self.unknown.clone() }
    }
}


/// The three branches of a binary threshold split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    /// Values at most the threshold.
    Left,
    /// Values greater than the threshold.
    Right,
    /// Missing values.
    Unknown,
}


/// Per-label weights of the left, right and unknown branches
/// of a threshold split under construction.
///
/// The search starts from `{ left: 0, right: known, unknown }`
/// and moves weight from right to left as the cut point advances.
#[derive(Debug, Clone, PartialEq)]
pub struct DistCounts {
    left: Vec<f64>,
    right: Vec<f64>,
    unknown: Vec<f64>,
    used_labels: FixedBitSet,
}


impl DistCounts {
    /// Construct the starting table where every known weight is
    /// on the right branch.
    ///
    /// # Panics
    /// Panics if `right` and `unknown` differ in length.
    pub fn new(right: Vec<f64>, unknown: Vec<f64>) -> Self {
        let n_labels = right.len();
        assert_eq!(
            n_labels, unknown.len(),
            "right and unknown must have one weight per label"
        );

        let mut used_labels = FixedBitSet::with_capacity(n_labels);
        right.iter()
            .enumerate()
            .filter(|&(_, &w)| !checker::is_zero_weight(w))
            .for_each(|(l, _)| { used_labels.insert(l); });

        Self {
            left: vec![0f64; n_labels],
            right,
            unknown,
            used_labels,
        }
    }


    /// Returns the number of labels.
    #[inline]
    pub fn n_labels(&self) -> usize {
        self.right.len()
    }


    /// Returns the labels with non-zero known weight.
    #[inline]
    pub fn used_labels(&self) -> &FixedBitSet {
        &self.used_labels
    }


    /// Returns the number of labels with non-zero known weight.
    #[inline]
    pub fn used_label_count(&self) -> usize {
        self.used_labels.count_ones(..)
    }


    /// Returns the total weight of `branch`.
    #[inline]
    pub fn weight(&self, branch: Branch) -> f64 {
        self[branch].iter().sum::<f64>()
    }


    /// Move `weight` of `label` from the right branch to the left branch.
    #[inline]
    pub fn move_left(&mut self, label: usize, weight: f64) {
        self.left[label] += weight;
        self.right[label] -= weight;
        if self.right[label] < 0f64 { self.right[label] = 0f64; }
    }


    /// Returns the two-branch [`SplitTable`] `[left, right]`.
    pub fn to_split_table(&self) -> SplitTable {
        SplitTable::from_rows(
            vec![self.left.clone(), self.right.clone()],
            self.unknown.clone(),
        )
    }
}


impl Index<Branch> for DistCounts {
    type Output = [f64];
    #[inline]
    fn index(&self, branch: Branch) -> &Self::Output {
        match branch {
            Branch::Left => &self.left[..],
            Branch::Right => &self.right[..],
            Branch::Unknown => &self.unknown[..],
        }
    }
}
