use serde::{Serialize, Deserialize};

use std::fmt;


/// The type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeKind {
    /// A discrete attribute taking values in `0..cardinality`.
    Nominal {
        /// Number of nominal values.
        cardinality: usize,
    },
    /// An ordered, real valued attribute.
    Continuous,
}


impl AttributeKind {
    /// Returns `true` if the attribute is nominal.
    #[inline]
    pub fn is_nominal(&self) -> bool {
        matches!(self, Self::Nominal { .. })
    }


    /// Returns the number of nominal values,
    /// or `None` for a continuous attribute.
    #[inline]
    pub fn cardinality(&self) -> Option<usize> {
        match self {
            Self::Nominal { cardinality } => Some(*cardinality),
            Self::Continuous => None,
        }
    }
}


/// A named attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Attribute type.
    pub kind: AttributeKind,
}


impl Attribute {
    /// Construct a nominal attribute with `cardinality` values.
    pub fn nominal<T: ToString>(name: T, cardinality: usize) -> Self {
        let kind = AttributeKind::Nominal { cardinality };
        Self { name: name.to_string(), kind }
    }


    /// Construct a continuous attribute.
    pub fn continuous<T: ToString>(name: T) -> Self {
        let kind = AttributeKind::Continuous;
        Self { name: name.to_string(), kind }
    }
}


/// Struct `Schema` describes the attributes of the instances
/// and the number of labels.
/// `n_labels == None` means that the data is unlabeled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    attributes: Vec<Attribute>,
    n_labels: Option<usize>,
}


impl Schema {
    /// Construct a schema for labeled data with `n_labels` labels.
    pub fn new(attributes: Vec<Attribute>, n_labels: usize) -> Self {
        Self { attributes, n_labels: Some(n_labels), }
    }


    /// Construct a schema for unlabeled data.
    pub fn unlabeled(attributes: Vec<Attribute>) -> Self {
        Self { attributes, n_labels: None, }
    }


    /// Returns the attributes.
    #[inline]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes[..]
    }


    /// Returns the `attr`-th attribute.
    #[inline]
    pub fn attribute(&self, attr: usize) -> Option<&Attribute> {
        self.attributes.get(attr)
    }


    /// Returns the number of attributes.
    #[inline]
    pub fn n_attributes(&self) -> usize {
        self.attributes.len()
    }


    /// Returns the number of labels, `None` if unlabeled.
    #[inline]
    pub fn n_labels(&self) -> Option<usize> {
        self.n_labels
    }


    /// Returns `true` if the data is labeled.
    #[inline]
    pub fn is_labeled(&self) -> bool {
        self.n_labels.is_some()
    }
}


impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for attr in self.attributes.iter() {
            match attr.kind {
                AttributeKind::Nominal { cardinality } => {
                    writeln!(f, "{}: nominal ({cardinality})", attr.name)?;
                },
                AttributeKind::Continuous => {
                    writeln!(f, "{}: continuous", attr.name)?;
                },
            }
        }
        match self.n_labels {
            Some(n) => write!(f, "label: {n} values"),
            None => write!(f, "label: none"),
        }
    }
}
