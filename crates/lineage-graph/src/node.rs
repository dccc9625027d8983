//! Node identifier type.
//!
//! The algorithms in this crate are generic over any `Clone + Eq + Hash`
//! identifier. [`NodeId`] is the concrete string-backed identifier used for
//! lineage entities such as `warehouse.orders` or `warehouse.orders.amount`.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier of a lineage entity (table or column).
///
/// Identity is by value: two `NodeId`s naming the same string are the same
/// node.
///
/// # Examples
///
/// ```
/// use lineage_graph::NodeId;
///
/// let node = NodeId::new("warehouse.orders");
/// assert_eq!(node.as_str(), "warehouse.orders");
/// assert_eq!(node, NodeId::from("warehouse.orders"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a new node ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
