use serde::{Serialize, Deserialize};

use crate::common::checker;
use crate::error::{Result, SplitError};
use crate::measure::DistCounts;
use crate::sample::{
    Schema,
    AttributeKind,
    Instance,
    AttrValue,
};


/// One instance projected onto one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedSample {
    /// Attribute value. `NaN` for a sample in the unknown partition.
    pub value: f64,
    /// Label index, `None` for unlabeled data.
    pub label: Option<usize>,
    /// Weight of the sample.
    pub weight: f64,
}


/// Struct `WeightedValueColumn` holds the samples of one continuous
/// attribute, split into a *known* partition and an *unknown* partition
/// (instances whose value is missing).
/// Per-label aggregate weights are kept for both partitions.
///
/// The known partition must be sorted by [`WeightedValueColumn::sort`]
/// before a threshold search.
/// Adding a known sample afterwards invalidates the ordering.
///
/// # Example
/// ```
/// use attrsplit::prelude::*;
///
/// let mut column = WeightedValueColumn::new(3, Some(2));
/// column.add_labeled_known(3.0, 1, 1.0).unwrap();
/// column.add_labeled_known(1.0, 0, 2.0).unwrap();
/// column.add_labeled_unknown(0, 0.5).unwrap();
/// column.sort();
///
/// let dist = column.init_dist_counts();
/// assert_eq!(dist.weight(Branch::Left), 0.0);
/// assert_eq!(dist.weight(Branch::Right), 3.0);
/// assert_eq!(dist.weight(Branch::Unknown), 0.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedValueColumn {
    known: Vec<WeightedSample>,
    unknown: Vec<WeightedSample>,
    known_by_label: Vec<f64>,
    unknown_by_label: Vec<f64>,
    known_weight: f64,
    unknown_weight: f64,
    n_labels: Option<usize>,
    max_length: usize,
    ordered: bool,
}


impl WeightedValueColumn {
    /// Construct an empty column that holds at most `max_length` samples.
    /// `n_labels == None` means that the samples are unlabeled.
    pub fn new(max_length: usize, n_labels: Option<usize>) -> Self {
        let n = n_labels.unwrap_or(0);
        Self {
            known: Vec::with_capacity(max_length),
            unknown: Vec::new(),
            known_by_label: vec![0f64; n],
            unknown_by_label: vec![0f64; n],
            known_weight: 0f64,
            unknown_weight: 0f64,
            n_labels,
            max_length,
            ordered: true,
        }
    }


    /// Project `instances` onto the continuous attribute `attr`.
    /// The returned column is sorted.
    pub fn from_instances(
        schema: &Schema,
        attr: usize,
        instances: &[Instance],
    ) -> Result<Self>
    {
        let attribute = schema.attribute(attr)
            .ok_or(SplitError::AttributeOutOfRange(attr))?;
        if attribute.kind != AttributeKind::Continuous {
            return Err(SplitError::KindMismatch {
                attr, expected: "continuous",
            });
        }

        let mut column = Self::new(instances.len(), schema.n_labels());
        for instance in instances {
            instance.validate(schema)?;
            match (instance.values[attr], instance.label) {
                (AttrValue::Real(value), Some(label)) => {
                    column.add_labeled_known(value, label, instance.weight)?;
                },
                (AttrValue::Real(value), None) => {
                    column.add_known(value, instance.weight)?;
                },
                (_, Some(label)) => {
                    column.add_labeled_unknown(label, instance.weight)?;
                },
                (_, None) => {
                    column.add_unknown(instance.weight)?;
                },
            }
        }
        column.sort();

        Ok(column)
    }


    /// Append an unlabeled sample with a known value.
    /// A sample of weight zero is ignored.
    pub fn add_known(&mut self, value: f64, weight: f64) -> Result<()> {
        self.check_label(None)?;
        self.push_known(value, None, weight)
    }


    /// Append a labeled sample with a known value.
    /// A sample of weight zero is ignored.
    pub fn add_labeled_known(&mut self, value: f64, label: usize, weight: f64)
        -> Result<()>
    {
        self.check_label(Some(label))?;
        self.push_known(value, Some(label), weight)
    }


    /// Append an unlabeled sample whose value is missing.
    /// A sample of weight zero is ignored.
    pub fn add_unknown(&mut self, weight: f64) -> Result<()> {
        self.check_label(None)?;
        self.push_unknown(None, weight)
    }


    /// Append a labeled sample whose value is missing.
    /// A sample of weight zero is ignored.
    pub fn add_labeled_unknown(&mut self, label: usize, weight: f64)
        -> Result<()>
    {
        self.check_label(Some(label))?;
        self.push_unknown(Some(label), weight)
    }


    fn check_label(&self, label: Option<usize>) -> Result<()> {
        match (label, self.n_labels) {
            (Some(label), Some(n_labels)) if label >= n_labels => {
                Err(SplitError::LabelOutOfRange { label, n_labels })
            },
            (Some(_), None) => Err(SplitError::LabelMismatch(
                "labeled sample for an unlabeled column"
            )),
            (None, Some(_)) => Err(SplitError::LabelMismatch(
                "unlabeled sample for a labeled column"
            )),
            _ => Ok(()),
        }
    }


    fn check_weight(&self, weight: f64) -> Result<bool> {
        if !(weight >= 0f64) {
            return Err(SplitError::NegativeWeight(weight));
        }
        if checker::is_zero_weight(weight) { return Ok(false); }

        if self.len() >= self.max_length {
            return Err(SplitError::ColumnOverflow(self.max_length));
        }
        Ok(true)
    }


    fn push_known(&mut self, value: f64, label: Option<usize>, weight: f64)
        -> Result<()>
    {
        if !value.is_finite() {
            return Err(SplitError::NonFiniteValue(value));
        }
        if !self.check_weight(weight)? { return Ok(()); }

        self.known.push(WeightedSample { value, label, weight });
        self.known_weight += weight;
        if let Some(l) = label {
            self.known_by_label[l] += weight;
        }
        self.ordered = false;
        Ok(())
    }


    fn push_unknown(&mut self, label: Option<usize>, weight: f64)
        -> Result<()>
    {
        if !self.check_weight(weight)? { return Ok(()); }

        let value = f64::NAN;
        self.unknown.push(WeightedSample { value, label, weight });
        self.unknown_weight += weight;
        if let Some(l) = label {
            self.unknown_by_label[l] += weight;
        }
        Ok(())
    }


    /// Sort the known partition in ascending order of value.
    /// Samples with equal values keep their insertion order.
    pub fn sort(&mut self) {
        self.known.shrink_to_fit();
        self.known.sort_by(|a, b| a.value.total_cmp(&b.value));
        self.ordered = true;
    }


    /// Returns `true` if the known partition is sorted.
    #[inline]
    pub fn is_sorted(&self) -> bool {
        self.ordered
    }


    /// Returns the start point of a threshold search:
    /// ```txt
    /// { left: 0, right: known weight per label, unknown: unknown weight per label }
    /// ```
    pub fn init_dist_counts(&self) -> DistCounts {
        DistCounts::new(
            self.known_by_label.clone(),
            self.unknown_by_label.clone(),
        )
    }


    /// Returns the number of distinct known values.
    ///
    /// # Panics
    /// Panics if the column is not sorted.
    pub fn distinct_known_values(&self) -> usize {
        checker::sorted(self.ordered);
        let mut iter = self.known.iter().map(|s| s.value);
        let mut prev = match iter.next() {
            Some(v) => v,
            None => { return 0; },
        };

        let mut count = 1_usize;
        for v in iter {
            if v != prev {
                count += 1;
                prev = v;
            }
        }
        count
    }


    /// Returns the samples with a known value.
    #[inline]
    pub fn known(&self) -> &[WeightedSample] {
        &self.known[..]
    }


    /// Returns the samples whose value is missing.
    #[inline]
    pub fn unknown(&self) -> &[WeightedSample] {
        &self.unknown[..]
    }


    /// Returns the total weight of the known partition.
    #[inline]
    pub fn known_weight(&self) -> f64 {
        self.known_weight
    }


    /// Returns the total weight of the unknown partition.
    #[inline]
    pub fn unknown_weight(&self) -> f64 {
        self.unknown_weight
    }


    /// Returns the per-label weight of the known partition.
    #[inline]
    pub fn known_label_weights(&self) -> &[f64] {
        &self.known_by_label[..]
    }


    /// Returns the per-label weight of the unknown partition.
    #[inline]
    pub fn unknown_label_weights(&self) -> &[f64] {
        &self.unknown_by_label[..]
    }


    /// Returns the number of labels, `None` if unlabeled.
    #[inline]
    pub fn n_labels(&self) -> Option<usize> {
        self.n_labels
    }


    /// Returns the number of samples in both partitions.
    #[inline]
    pub fn len(&self) -> usize {
        self.known.len() + self.unknown.len()
    }


    /// Returns `true` if the column holds no sample.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
