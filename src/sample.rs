//! The read-only view of a node's data handed in by the tree controller.
//! [`Schema`] describes the attributes and the label,
//! [`Instance`] is one weighted, possibly labeled, training example.

// Provides the schema struct.
pub(crate) mod schema;
// Provides the instance struct.
pub(crate) mod instance;


pub use schema::{Schema, Attribute, AttributeKind};
pub use instance::{Instance, AttrValue};
