use serde::{Serialize, Deserialize};

use crate::error::{Result, SplitError};
use super::schema::{Schema, AttributeKind};


/// A value of one attribute of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    /// Index of a nominal value.
    Nominal(usize),
    /// A real value.
    Real(f64),
    /// The value is missing.
    Unknown,
}


/// A weighted training instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// Attribute values, one per attribute in the schema.
    pub values: Vec<AttrValue>,
    /// Label index. `None` for unlabeled data.
    pub label: Option<usize>,
    /// Non-negative weight of this instance.
    pub weight: f64,
}


impl Instance {
    /// Construct a labeled instance.
    pub fn labeled(values: Vec<AttrValue>, label: usize, weight: f64) -> Self {
        Self { values, label: Some(label), weight }
    }


    /// Construct an unlabeled instance.
    pub fn unlabeled(values: Vec<AttrValue>, weight: f64) -> Self {
        Self { values, label: None, weight }
    }


    /// Returns the value of the `attr`-th attribute.
    #[inline]
    pub fn value(&self, attr: usize) -> Option<AttrValue> {
        self.values.get(attr).copied()
    }


    /// Check that this instance conforms to `schema`.
    pub(crate) fn validate(&self, schema: &Schema) -> Result<()> {
        let expected = schema.n_attributes();
        let got = self.values.len();
        if expected != got {
            return Err(SplitError::SchemaMismatch { expected, got });
        }

        if !(self.weight >= 0f64) {
            return Err(SplitError::NegativeWeight(self.weight));
        }

        match (self.label, schema.n_labels()) {
            (Some(label), Some(n_labels)) if label >= n_labels => {
                return Err(SplitError::LabelOutOfRange { label, n_labels });
            },
            (Some(_), None) => {
                return Err(SplitError::LabelMismatch(
                    "labeled instance for an unlabeled schema"
                ));
            },
            (None, Some(_)) => {
                return Err(SplitError::LabelMismatch(
                    "unlabeled instance for a labeled schema"
                ));
            },
            _ => {},
        }

        let iter = self.values.iter()
            .zip(schema.attributes())
            .enumerate();
        for (attr, (value, attribute)) in iter {
            match (value, attribute.kind) {
                (AttrValue::Unknown, _) => {},
                (
                    AttrValue::Nominal(value),
                    AttributeKind::Nominal { cardinality }
                ) => {
                    if *value >= cardinality {
                        return Err(SplitError::ValueOutOfRange {
                            attr, value: *value, cardinality,
                        });
                    }
                },
                (AttrValue::Real(value), AttributeKind::Continuous) => {
                    if !value.is_finite() {
                        return Err(SplitError::NonFiniteValue(*value));
                    }
                },
                (_, AttributeKind::Nominal { .. }) => {
                    return Err(SplitError::KindMismatch {
                        attr, expected: "nominal",
                    });
                },
                (_, AttributeKind::Continuous) => {
                    return Err(SplitError::KindMismatch {
                        attr, expected: "continuous",
                    });
                },
            }
        }
        Ok(())
    }
}
