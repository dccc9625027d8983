//! Error types for lineage graph operations.
//!
//! The algorithms themselves never fail: duplicate universe entries are
//! dropped, dangling successors are tolerated, and cycles are reported as
//! data on [`TopologicalOrder`](crate::TopologicalOrder). This type exists for
//! callers that want to promote an incomplete order into a hard failure.

use thiserror::Error;

/// The error type for lineage graph operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Some nodes could not be ordered because they sit on, or strictly
    /// downstream of, a dependency cycle.
    #[error("cyclic dependency: {count} node(s) could not be ordered: {nodes}")]
    CyclicDependency {
        /// Number of unresolved nodes
        count: usize,
        /// Comma-separated unresolved node identifiers, in universe order
        nodes: String,
    },
}

impl Error {
    /// Creates a cyclic dependency error from the unresolved nodes.
    pub fn cyclic_dependency<N: std::fmt::Display>(unresolved: &[N]) -> Self {
        let nodes = unresolved
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Self::CyclicDependency {
            count: unresolved.len(),
            nodes,
        }
    }
}

/// A specialized Result type for lineage graph operations.
pub type Result<T> = std::result::Result<T, Error>;
