//! Deterministic topological sequencing (Kahn's algorithm).
//!
//! Produces a visiting order in which every node comes after all of its
//! predecessors within the node universe. The order drives layered layout, so
//! it is fully determined by the inputs:
//!
//! 1. Nodes with no in-universe predecessors are ready first, in **universe
//!    order**.
//! 2. A node becomes ready when its last predecessor is visited. Newly ready
//!    nodes join the back of a FIFO queue in **discovery order**: the order
//!    their predecessors are visited, then the order the adjacency source
//!    lists them.
//!
//! All currently unblocked nodes are therefore visited before any node they
//! unblock, which yields a stable layering.
//!
//! ## Cycles
//!
//! When the universe contains a cycle, the nodes on it (and the nodes that
//! depend on them) never become ready. They are returned as
//! [`TopologicalOrder::unresolved`] alongside the ordered prefix. Nothing
//! loops and nothing is dropped silently.

use crate::adjacency::AdjacencySource;
use crate::cycles::{Cycle, find_cycles};
use crate::error::{Error, Result};
use crate::universe::Universe;
use std::collections::VecDeque;
use std::fmt;
use std::hash::Hash;
use tracing::{debug, trace, warn};

/// Result of sequencing a node universe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologicalOrder<N> {
    /// Nodes in visiting order
    order: Vec<N>,
    /// Nodes blocked by a cycle, in universe order
    unresolved: Vec<N>,
    /// Universe entries dropped as repeats of an earlier entry
    duplicates: Vec<N>,
}

impl<N> TopologicalOrder<N> {
    /// Nodes in visiting order.
    ///
    /// When [`is_complete`](Self::is_complete) is `false` this is the prefix
    /// that could be ordered.
    #[must_use]
    pub fn order(&self) -> &[N] {
        &self.order
    }

    /// Nodes that could not be ordered because they are on, or downstream
    /// of, a cycle. Listed in universe order.
    #[must_use]
    pub fn unresolved(&self) -> &[N] {
        &self.unresolved
    }

    /// Universe entries ignored because an earlier entry had the same ID.
    #[must_use]
    pub fn duplicates(&self) -> &[N] {
        &self.duplicates
    }

    /// Returns `true` if every universe node was ordered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Number of ordered nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no node was ordered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Consume the result and return the (possibly partial) order.
    #[must_use]
    pub fn into_order(self) -> Vec<N> {
        self.order
    }
}

impl<N: PartialEq> TopologicalOrder<N> {
    /// Position of `node` in the order, if it was ordered.
    #[must_use]
    pub fn position(&self, node: &N) -> Option<usize> {
        self.order.iter().position(|n| n == node)
    }
}

impl<N: Clone + Eq + Hash> TopologicalOrder<N> {
    /// Group the unresolved nodes into the cycles that block them.
    ///
    /// `neighbors` should be the adjacency source the order was computed
    /// with. Returns an empty list for a complete order.
    pub fn cycles<A>(&self, neighbors: &A) -> Vec<Cycle<N>>
    where
        A: AdjacencySource<N> + ?Sized,
    {
        find_cycles(&self.unresolved, neighbors)
    }
}

impl<N: fmt::Display> TopologicalOrder<N> {
    /// Convert into the full order, or fail if any node is unresolved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CyclicDependency`] listing the unresolved nodes when
    /// the universe contains a cycle.
    pub fn into_complete(self) -> Result<Vec<N>> {
        if self.unresolved.is_empty() {
            Ok(self.order)
        } else {
            Err(Error::cyclic_dependency(&self.unresolved))
        }
    }
}

/// Compute a deterministic topological order of `universe`.
///
/// Only edges with both endpoints in `universe` take part: successors outside
/// it neither block nor appear in the result. Duplicate universe entries are
/// dropped (first occurrence wins) and reported in
/// [`TopologicalOrder::duplicates`]. The adjacency source is consulted once
/// per distinct universe node.
///
/// Runs in O(V + E) time and O(V + E) auxiliary space.
///
/// # Example
///
/// ```
/// use lineage_graph::{compute_order, SuccessorMap};
///
/// let graph = SuccessorMap::from_edges([
///     ("A", "B"), ("A", "C"), ("B", "D"), ("C", "F"), ("D", "E"), ("G", "H"),
/// ]);
/// let universe = ["A", "B", "C", "D", "E", "F", "G", "H"];
///
/// let order = compute_order(&universe, &graph);
/// assert_eq!(order.order(), &["A", "G", "B", "C", "H", "D", "F", "E"]);
/// ```
pub fn compute_order<N, A>(universe: &[N], neighbors: &A) -> TopologicalOrder<N>
where
    N: Clone + Eq + Hash,
    A: AdjacencySource<N> + ?Sized,
{
    let universe = Universe::new(universe);
    if !universe.duplicates.is_empty() {
        warn!(
            duplicates = universe.duplicates.len(),
            "Node universe contains duplicate IDs; keeping first occurrences"
        );
    }

    let node_count = universe.len();
    let mut successors: Vec<Vec<usize>> = Vec::with_capacity(node_count);
    let mut indegree = vec![0usize; node_count];
    let mut ignored_edges = 0usize;

    for &node in &universe.nodes {
        let targets: Vec<usize> = neighbors
            .successors(node)
            .iter()
            .filter_map(|successor| {
                let position = universe.position(successor);
                if position.is_none() {
                    ignored_edges += 1;
                }
                position
            })
            .collect();
        for &target in &targets {
            indegree[target] += 1;
        }
        successors.push(targets);
    }

    if ignored_edges > 0 {
        trace!(ignored_edges, "Ignored successors outside the node universe");
    }

    let mut queue: VecDeque<usize> = indegree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(position, _)| position)
        .collect();

    let mut order = Vec::with_capacity(node_count);
    while let Some(current) = queue.pop_front() {
        order.push(universe.nodes[current].clone());
        for &target in &successors[current] {
            indegree[target] -= 1;
            if indegree[target] == 0 {
                queue.push_back(target);
            }
        }
    }

    let unresolved: Vec<N> = universe
        .nodes
        .iter()
        .zip(&indegree)
        .filter(|(_, degree)| **degree > 0)
        .map(|(node, _)| (*node).clone())
        .collect();

    if unresolved.is_empty() {
        debug!(nodes = order.len(), "Computed topological order");
    } else {
        debug!(
            ordered = order.len(),
            unresolved = unresolved.len(),
            "Topological order incomplete: node universe contains a cycle"
        );
    }

    TopologicalOrder {
        order,
        unresolved,
        duplicates: universe.duplicates.into_iter().cloned().collect(),
    }
}
