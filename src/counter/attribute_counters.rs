use log::trace;

use crate::common::checker;
use crate::error::{Result, SplitError};
use crate::sample::{
    Schema,
    AttributeKind,
    Instance,
    AttrValue,
};
use super::nominal_cube::{NominalCube, snap_add};


/// The counts kept for one attribute.
/// The variant is chosen once from the schema.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeCube {
    /// Joint `label x value` counts of a nominal attribute.
    Nominal(NominalCube),
    /// A continuous attribute has no cube.
    Continuous,
}


impl AttributeCube {
    /// Returns the nominal cube, or `None` for a continuous attribute.
    #[inline]
    pub fn as_nominal(&self) -> Option<&NominalCube> {
        match self {
            Self::Nominal(cube) => Some(cube),
            Self::Continuous => None,
        }
    }
}


/// Struct `AttributeCounters` holds the live weighted co-occurrence counts
/// between every nominal attribute and the label
/// over the instances of one node.
///
/// The counters are built fresh for a node, updated by
/// [`AttributeCounters::add`] / [`AttributeCounters::remove`],
/// and discarded after the node is evaluated.
///
/// # Example
/// ```
/// use attrsplit::prelude::*;
///
/// let schema = Schema::new(vec![Attribute::nominal("color", 3)], 2);
/// let instances = vec![
///     Instance::labeled(vec![AttrValue::Nominal(0)], 0, 1.0),
///     Instance::labeled(vec![AttrValue::Nominal(2)], 1, 0.5),
/// ];
/// let counters = AttributeCounters::build(&schema, &instances).unwrap();
///
/// assert_eq!(counters.label_count(1), 0.5);
/// assert_eq!(counters.attr_count(0, 2).unwrap(), 0.5);
/// assert_eq!(counters.used_value_count(0).unwrap(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeCounters {
    schema: Schema,
    label_counts: Option<Vec<f64>>,
    cubes: Vec<AttributeCube>,
    total: f64,
}


impl AttributeCounters {
    /// Construct the empty counters for `schema`.
    pub fn new(schema: &Schema) -> Self {
        let n_labels = schema.n_labels();
        let cubes = schema.attributes()
            .iter()
            .map(|attribute| match attribute.kind {
                AttributeKind::Nominal { cardinality } => {
                    AttributeCube::Nominal(
                        NominalCube::new(cardinality, n_labels)
                    )
                },
                AttributeKind::Continuous => AttributeCube::Continuous,
            })
            .collect::<Vec<_>>();

        let label_counts = n_labels.map(|n| vec![0f64; n]);

        Self {
            schema: schema.clone(),
            label_counts,
            cubes,
            total: 0f64,
        }
    }


    /// Construct the counters for `schema` and add every instance.
    pub fn build(schema: &Schema, instances: &[Instance]) -> Result<Self> {
        let mut counters = Self::new(schema);
        for instance in instances {
            counters.add(instance)?;
        }
        trace!(
            "built counters over {} instances (total weight {})",
            instances.len(), counters.total
        );
        Ok(counters)
    }


    /// Add `instance` to the counters.
    /// An instance of weight zero is ignored.
    pub fn add(&mut self, instance: &Instance) -> Result<()> {
        instance.validate(&self.schema)?;
        if checker::is_zero_weight(instance.weight) { return Ok(()); }

        self.adjust(instance, instance.weight);
        Ok(())
    }


    /// Remove `instance` from the counters.
    /// An instance of weight zero is ignored.
    ///
    /// If some count would become negative beyond the rounding tolerance,
    /// `SplitError::CounterUnderflow` is returned
    /// and the counters are left untouched.
    pub fn remove(&mut self, instance: &Instance) -> Result<()> {
        instance.validate(&self.schema)?;
        let weight = instance.weight;
        if checker::is_zero_weight(weight) { return Ok(()); }

        let remaining = self.total - weight;
        if checker::underflows(remaining) {
            return Err(SplitError::CounterUnderflow {
                attr: None, weight, remaining,
            });
        }

        if let (Some(counts), Some(label)) = (&self.label_counts, instance.label) {
            let remaining = counts[label] - weight;
            if checker::underflows(remaining) {
                return Err(SplitError::CounterUnderflow {
                    attr: None, weight, remaining,
                });
            }
        }

        for (attr, cube) in self.cubes.iter().enumerate() {
            let AttributeCube::Nominal(cube) = cube else { continue; };
            let value = nominal_index(instance, attr);
            if let Some(remaining) = cube.underflow(instance.label, value, weight) {
                return Err(SplitError::CounterUnderflow {
                    attr: Some(attr), weight, remaining,
                });
            }
        }

        self.adjust(instance, -weight);
        Ok(())
    }


    fn adjust(&mut self, instance: &Instance, weight: f64) {
        snap_add(&mut self.total, weight);

        if let (Some(counts), Some(label)) = (&mut self.label_counts, instance.label) {
            snap_add(&mut counts[label], weight);
        }

        for (attr, cube) in self.cubes.iter_mut().enumerate() {
            if let AttributeCube::Nominal(cube) = cube {
                let value = nominal_index(instance, attr);
                cube.adjust(instance.label, value, weight);
            }
        }
    }


    /// Returns the schema these counters were built for.
    #[inline]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }


    /// Returns the total weight of the counted instances.
    #[inline]
    pub fn total_weight(&self) -> f64 {
        self.total
    }


    /// Returns the label marginal, or `None` for unlabeled data.
    #[inline]
    pub fn label_counts(&self) -> Option<&[f64]> {
        self.label_counts.as_deref()
    }


    /// Returns the weight of the instances with `label`.
    /// Unlabeled counters return `0`.
    ///
    /// # Panics
    /// Panics if `label` is out of range for a labeled schema.
    #[inline]
    pub fn label_count(&self, label: usize) -> f64 {
        match &self.label_counts {
            Some(counts) => {
                assert!(
                    label < counts.len(),
                    "label {label} is out of range for {} labels",
                    counts.len()
                );
                counts[label]
            },
            None => 0f64,
        }
    }


    /// Returns the number of labels with non-zero weight.
    #[inline]
    pub fn used_label_count(&self) -> usize {
        self.label_counts.iter()
            .flatten()
            .filter(|&&w| !checker::is_zero_weight(w))
            .count()
    }


    /// Returns the counts kept for attribute `attr`.
    pub fn attribute(&self, attr: usize) -> Result<&AttributeCube> {
        self.cubes.get(attr)
            .ok_or(SplitError::AttributeOutOfRange(attr))
    }


    /// Returns the joint cube of the nominal attribute `attr`.
    /// A continuous attribute results in `SplitError::InvalidAttribute`.
    pub fn cube(&self, attr: usize) -> Result<&NominalCube> {
        self.attribute(attr)?
            .as_nominal()
            .ok_or(SplitError::InvalidAttribute(attr))
    }


    /// Returns the weight of the instances whose `attr`-th value is `value`.
    pub fn attr_count(&self, attr: usize, value: usize) -> Result<f64> {
        let cube = self.cube(attr)?;
        check_value(cube, attr, value)?;
        Ok(cube.value_count(value))
    }


    /// Returns the weight of the instances with `label`
    /// whose `attr`-th value is `value`.
    pub fn joint_count(&self, attr: usize, label: usize, value: usize)
        -> Result<f64>
    {
        let cube = self.cube(attr)?;
        check_value(cube, attr, value)?;
        let n_labels = cube.n_labels();
        if label >= n_labels {
            return Err(SplitError::LabelOutOfRange { label, n_labels });
        }
        Ok(cube.count(label, value))
    }


    /// Returns the weight of the instances whose `attr`-th value is missing.
    pub fn unknown_count(&self, attr: usize) -> Result<f64> {
        Ok(self.cube(attr)?.unknown_count())
    }


    /// Returns the number of values of `attr` with non-zero weight.
    pub fn used_value_count(&self, attr: usize) -> Result<usize> {
        Ok(self.cube(attr)?.used_value_count())
    }
}


#[inline(always)]
fn nominal_index(instance: &Instance, attr: usize) -> Option<usize> {
    match instance.values[attr] {
        AttrValue::Nominal(v) => Some(v),
        _ => None,
    }
}


#[inline(always)]
fn check_value(cube: &NominalCube, attr: usize, value: usize) -> Result<()> {
    let cardinality = cube.cardinality();
    if value >= cardinality {
        return Err(SplitError::ValueOutOfRange { attr, value, cardinality });
    }
    Ok(())
}
