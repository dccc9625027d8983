//! Downstream reachability (forward closure).
//!
//! Answers "which entities are affected if these ones change?". The result is
//! the set of nodes reachable from the roots by following zero or more
//! successor edges, so the roots themselves are always members.

use crate::adjacency::AdjacencySource;
use std::collections::{HashSet, VecDeque};
use std::hash::Hash;
use tracing::{debug, trace};

/// The set of nodes reachable from a set of roots, roots included.
///
/// Membership only: the set carries no order. Use
/// [`ordered_by`](Self::ordered_by) to list members in a caller-chosen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownstreamSet<N: Eq + Hash> {
    members: HashSet<N>,
}

impl<N: Eq + Hash> DownstreamSet<N> {
    /// Returns `true` if `node` is reachable from the roots.
    #[must_use]
    pub fn contains(&self, node: &N) -> bool {
        self.members.contains(node)
    }

    /// Number of reachable nodes, roots included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if no roots were given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterate over the members in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &N> + '_ {
        self.members.iter()
    }

    /// Consume the set and return the underlying `HashSet`.
    #[must_use]
    pub fn into_inner(self) -> HashSet<N> {
        self.members
    }

    /// Restrict the set to nodes present in `universe`.
    ///
    /// Reachability includes successors outside any rendered
    /// subset; callers that want a bounded result filter with this.
    #[must_use]
    pub fn within(self, universe: &[N]) -> Self {
        let allowed: HashSet<&N> = universe.iter().collect();
        let members = self
            .members
            .into_iter()
            .filter(|node| allowed.contains(node))
            .collect();
        Self { members }
    }

    /// Members that appear in `universe`, in universe order.
    ///
    /// Each member is listed once even if `universe` repeats it.
    #[must_use]
    pub fn ordered_by<'a>(&self, universe: &'a [N]) -> Vec<&'a N> {
        let mut seen = HashSet::new();
        universe
            .iter()
            .filter(|node| self.members.contains(*node) && seen.insert(*node))
            .collect()
    }
}

impl<N: Eq + Hash> IntoIterator for DownstreamSet<N> {
    type Item = N;
    type IntoIter = std::collections::hash_set::IntoIter<N>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl<'a, N: Eq + Hash> IntoIterator for &'a DownstreamSet<N> {
    type Item = &'a N;
    type IntoIter = std::collections::hash_set::Iter<'a, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

/// Compute the downstream set of `roots`.
///
/// Breadth-first expansion with an explicit work queue. Nodes are marked
/// visited before they are enqueued, so each node is expanded at most once and
/// cycles close back onto visited nodes instead of looping.
///
/// - An empty `roots` yields an empty set.
/// - Duplicate roots are harmless.
/// - Successors the adjacency source names are included even when the caller
///   considers them outside its universe; see [`DownstreamSet::within`].
///
/// Runs in O(V + E) over the reachable subgraph.
///
/// # Example
///
/// ```
/// use lineage_graph::{compute_downstream, SuccessorMap};
///
/// let graph = SuccessorMap::from_edges([("A", "B"), ("A", "C"), ("B", "D"), ("D", "E")]);
///
/// let affected = compute_downstream(["B"], &graph);
/// let mut members: Vec<_> = affected.into_iter().collect();
/// members.sort();
/// assert_eq!(members, vec!["B", "D", "E"]);
/// ```
pub fn compute_downstream<N, I, A>(roots: I, neighbors: &A) -> DownstreamSet<N>
where
    N: Clone + Eq + Hash,
    I: IntoIterator<Item = N>,
    A: AdjacencySource<N> + ?Sized,
{
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();

    for root in roots {
        if visited.insert(root.clone()) {
            queue.push_back(root);
        }
    }
    let root_count = visited.len();

    while let Some(node) = queue.pop_front() {
        for successor in neighbors.successors(&node).iter() {
            if !visited.contains(successor) {
                visited.insert(successor.clone());
                queue.push_back(successor.clone());
            }
        }
    }

    trace!(
        roots = root_count,
        reached = visited.len(),
        "Computed downstream set"
    );
    if root_count > 0 && visited.len() == root_count {
        debug!(roots = root_count, "No nodes downstream of roots");
    }

    DownstreamSet { members: visited }
}
