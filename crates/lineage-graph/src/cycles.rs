//! Cycle reporting for unresolved nodes.
//!
//! When sequencing leaves nodes unresolved, callers usually want to know
//! *which* dependencies form the loop. This module groups nodes into the
//! strongly connected components of the subgraph they induce, using petgraph's
//! Tarjan SCC implementation, and keeps the components that are real cycles:
//! more than one member, or a single member with a self-loop.
//!
//! Unresolved nodes that are merely downstream of a cycle belong to no
//! component and are not reported here.

use crate::adjacency::AdjacencySource;
use crate::universe::Universe;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;
use tracing::debug;

/// A group of nodes that depend on each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle<N> {
    /// Members in input order
    nodes: Vec<N>,
    /// Closed walk from the first member back to itself (start not repeated)
    path: Vec<N>,
}

impl<N> Cycle<N> {
    /// Members of the cycle, in the order they were given to [`find_cycles`].
    #[must_use]
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// A shortest dependency loop through the first member.
    ///
    /// Every consecutive pair is an edge, and the last node has an edge back
    /// to the first. A self-loop is a single-element path.
    #[must_use]
    pub fn path(&self) -> &[N] {
        &self.path
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`; a cycle has at least one member.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<N: PartialEq> Cycle<N> {
    /// Returns `true` if `node` is a member.
    #[must_use]
    pub fn contains(&self, node: &N) -> bool {
        self.nodes.contains(node)
    }
}

/// Find the dependency cycles among `nodes`.
///
/// Only edges between members of `nodes` are considered; duplicates in
/// `nodes` are ignored. Cycles are listed by the position of their first
/// member, so the result is deterministic for identical input.
///
/// # Example
///
/// ```
/// use lineage_graph::{compute_order, find_cycles, SuccessorMap};
///
/// let graph = SuccessorMap::from_edges([("a", "b"), ("b", "a"), ("b", "c")]);
/// let order = compute_order(&["a", "b", "c"], &graph);
///
/// let cycles = find_cycles(order.unresolved(), &graph);
/// assert_eq!(cycles.len(), 1);
/// assert_eq!(cycles[0].path(), &["a", "b"]);
/// ```
pub fn find_cycles<N, A>(nodes: &[N], neighbors: &A) -> Vec<Cycle<N>>
where
    N: Clone + Eq + Hash,
    A: AdjacencySource<N> + ?Sized,
{
    let universe = Universe::new(nodes);

    // Successor positions in adjacency listing order; used for path walking.
    let adjacency: Vec<Vec<usize>> = universe
        .nodes
        .iter()
        .map(|&node| {
            neighbors
                .successors(node)
                .iter()
                .filter_map(|successor| universe.position(successor))
                .collect()
        })
        .collect();

    let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(universe.len(), 0);
    let indices: Vec<NodeIndex> = (0..universe.len()).map(|p| graph.add_node(p)).collect();
    for (from, targets) in adjacency.iter().enumerate() {
        for &to in targets {
            graph.update_edge(indices[from], indices[to], ());
        }
    }

    let mut components: Vec<Vec<usize>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| match component.as_slice() {
            [single] => graph.contains_edge(*single, *single),
            members => members.len() > 1,
        })
        .map(|component| {
            let mut members: Vec<usize> = component.into_iter().map(|ix| graph[ix]).collect();
            members.sort_unstable();
            members
        })
        .collect();
    components.sort_unstable_by_key(|members| members.first().copied());

    debug!(
        candidates = universe.len(),
        cycles = components.len(),
        "Grouped nodes into dependency cycles"
    );

    components
        .into_iter()
        .map(|members| {
            let path = shortest_loop(&adjacency, &members);
            Cycle {
                nodes: members
                    .iter()
                    .map(|&p| universe.nodes[p].clone())
                    .collect(),
                path: path.iter().map(|&p| universe.nodes[p].clone()).collect(),
            }
        })
        .collect()
}

/// Breadth-first search for the shortest loop from `members[0]` back to
/// itself, staying inside the component.
fn shortest_loop(adjacency: &[Vec<usize>], members: &[usize]) -> Vec<usize> {
    let Some(&start) = members.first() else {
        return Vec::new();
    };
    let inside: HashSet<usize> = members.iter().copied().collect();
    let mut parent: HashMap<usize, usize> = HashMap::new();
    let mut queue = VecDeque::from([start]);
    let mut visited = HashSet::from([start]);

    while let Some(current) = queue.pop_front() {
        for &next in &adjacency[current] {
            if next == start {
                let mut path = vec![current];
                let mut cursor = current;
                while let Some(&previous) = parent.get(&cursor) {
                    path.push(previous);
                    cursor = previous;
                }
                path.reverse();
                return path;
            }
            if inside.contains(&next) && visited.insert(next) {
                parent.insert(next, current);
                queue.push_back(next);
            }
        }
    }

    // Unreachable for a strongly connected component; fall back to members.
    members.to_vec()
}
