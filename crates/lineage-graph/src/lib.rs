//! Graph analysis core for data-pipeline lineage.
//!
//! This library answers two questions over a directed, normally acyclic
//! dependency graph of named entities (tables, columns):
//!
//! - **Reachability**: which entities are downstream of a set of starting
//!   entities? See [`compute_downstream`].
//! - **Sequencing**: in what order can entities be visited so that each one
//!   comes after all of its predecessors? See [`compute_order`].
//!
//! Both operations are pure, synchronous, and run over any type implementing
//! [`AdjacencySource`], so the same algorithms work whether the graph is stored
//! as a map of successors, a list of edges, or computed lazily.
//!
//! # Example
//!
//! ```
//! use lineage_graph::{compute_downstream, compute_order, SuccessorMap};
//!
//! let graph = SuccessorMap::from_edges([("A", "B"), ("A", "C"), ("B", "D")]);
//!
//! let affected = compute_downstream(["B"], &graph);
//! assert!(affected.contains(&"D"));
//! assert!(!affected.contains(&"C"));
//!
//! let order = compute_order(&["A", "B", "C", "D"], &graph);
//! assert!(order.is_complete());
//! assert_eq!(order.order(), &["A", "B", "C", "D"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod adjacency;
pub mod cycles;
pub mod error;
pub mod node;
pub mod reachability;
pub mod topo;
mod universe;

pub use adjacency::{AdjacencySource, FnAdjacency, SuccessorMap, from_fn};
pub use cycles::{Cycle, find_cycles};
pub use error::{Error, Result};
pub use node::NodeId;
pub use reachability::{DownstreamSet, compute_downstream};
pub use topo::{TopologicalOrder, compute_order};
