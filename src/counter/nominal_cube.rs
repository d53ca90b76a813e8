use serde::{Serialize, Deserialize};

use crate::common::checker;


/// Weighted `label x value` counts of one nominal attribute.
///
/// For `k` values and `L` labels, `count(l, v)` is the total weight
/// of the instances with label `l` and value `v`.
/// The marginals are maintained alongside the cube so that
/// ```txt
/// sum_v count(l, v) + unknown_label_count(l) == label weight of l,
/// sum_l count(l, v)                          == value_count(v).
/// ```
/// For unlabeled data, only the value marginal is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NominalCube {
    // counts[label][value]
    pub(super) counts: Vec<Vec<f64>>,
    pub(super) by_value: Vec<f64>,
    pub(super) unknown_by_label: Vec<f64>,
    pub(super) unknown: f64,
    pub(super) cardinality: usize,
}


impl NominalCube {
    /// Construct a zero cube.
    pub(crate) fn new(cardinality: usize, n_labels: Option<usize>) -> Self {
        let n_labels = n_labels.unwrap_or(0);
        Self {
            counts: vec![vec![0f64; cardinality]; n_labels],
            by_value: vec![0f64; cardinality],
            unknown_by_label: vec![0f64; n_labels],
            unknown: 0f64,
            cardinality,
        }
    }


    /// Returns the number of nominal values.
    #[inline]
    pub fn cardinality(&self) -> usize {
        self.cardinality
    }


    /// Returns the number of label rows.
    /// This is `0` for unlabeled data.
    #[inline]
    pub fn n_labels(&self) -> usize {
        self.counts.len()
    }


    /// Returns the weight of the instances with `label` and `value`.
    #[inline]
    pub fn count(&self, label: usize, value: usize) -> f64 {
        self.counts[label][value]
    }


    /// Returns the `label`-th row of the cube.
    #[inline]
    pub fn row(&self, label: usize) -> &[f64] {
        &self.counts[label][..]
    }


    /// Returns the weight of the instances with `value`.
    #[inline]
    pub fn value_count(&self, value: usize) -> f64 {
        self.by_value[value]
    }


    /// Returns the value marginal.
    #[inline]
    pub fn value_counts(&self) -> &[f64] {
        &self.by_value[..]
    }


    /// Returns the weight of the instances whose value is missing.
    #[inline]
    pub fn unknown_count(&self) -> f64 {
        self.unknown
    }


    /// Returns the per-label weight of the instances
    /// whose value is missing.
    #[inline]
    pub fn unknown_label_counts(&self) -> &[f64] {
        &self.unknown_by_label[..]
    }


    /// Returns the total weight of the instances with a known value.
    #[inline]
    pub fn known_weight(&self) -> f64 {
        self.by_value.iter().sum::<f64>()
    }


    /// Returns the indices of the values with non-zero weight.
    pub fn used_values(&self) -> impl Iterator<Item = usize> + '_ {
        self.by_value.iter()
            .enumerate()
            .filter_map(|(v, &w)| (!checker::is_zero_weight(w)).then_some(v))
    }


    /// Returns the number of values with non-zero weight.
    #[inline]
    pub fn used_value_count(&self) -> usize {
        self.used_values().count()
    }


    /// Returns the remaining weight of the first cell of `(label, value)`
    /// that would go below zero after subtracting `weight`.
    pub(super) fn underflow(
        &self,
        label: Option<usize>,
        value: Option<usize>,
        weight: f64,
    ) -> Option<f64>
    {
        let (marginal, joint) = match value {
            Some(v) => (self.by_value[v], label.map(|l| self.counts[l][v])),
            None => (self.unknown, label.map(|l| self.unknown_by_label[l])),
        };
        std::iter::once(marginal)
            .chain(joint)
            .map(|cell| cell - weight)
            .find(|&remaining| checker::underflows(remaining))
    }


    /// Add `weight` (possibly negative) to the cells of
    /// `(label, value)`. `value == None` means the value is missing.
    pub(super) fn adjust(
        &mut self,
        label: Option<usize>,
        value: Option<usize>,
        weight: f64,
    )
    {
        match value {
            Some(v) => {
                snap_add(&mut self.by_value[v], weight);
                if let Some(l) = label {
                    snap_add(&mut self.counts[l][v], weight);
                }
            },
            None => {
                snap_add(&mut self.unknown, weight);
                if let Some(l) = label {
                    snap_add(&mut self.unknown_by_label[l], weight);
                }
            },
        }
    }
}


/// Add `weight` to `cell`.
/// Negative rounding residues are snapped to zero.
#[inline(always)]
pub(super) fn snap_add(cell: &mut f64, weight: f64) {
    *cell += weight;
    if *cell < 0f64 { *cell = 0f64; }
}
