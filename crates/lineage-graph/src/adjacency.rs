//! Adjacency abstraction shared by the reachability and sequencing algorithms.
//!
//! An adjacency source answers a single question: "what are the direct
//! downstream neighbors of this node, in order?". Expressing the graph as this
//! capability, rather than as a concrete container, lets the same algorithms
//! run over a map of successors, a list of edges, or successors computed on
//! demand.
//!
//! ## Contract
//!
//! - The lookup is total: asking about a node the source has never heard of
//!   yields an empty sequence, never a failure.
//! - Successor order is significant. It is the order in which the sequencer
//!   discovers newly unblocked nodes.
//! - The source must behave as immutable for the duration of a call.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

/// Lookup of a node's direct successors.
///
/// Stored successor lists are returned borrowed; computed lists are returned
/// owned.
pub trait AdjacencySource<N: Clone> {
    /// Returns the direct successors of `node` in caller-defined order.
    ///
    /// Returns an empty sequence for unknown nodes.
    fn successors(&self, node: &N) -> Cow<'_, [N]>;
}

impl<N: Clone, A: AdjacencySource<N> + ?Sized> AdjacencySource<N> for &A {
    fn successors(&self, node: &N) -> Cow<'_, [N]> {
        (**self).successors(node)
    }
}

impl<N, S> AdjacencySource<N> for HashMap<N, Vec<N>, S>
where
    N: Clone + Eq + Hash,
    S: BuildHasher,
{
    fn successors(&self, node: &N) -> Cow<'_, [N]> {
        match self.get(node) {
            Some(successors) => Cow::Borrowed(successors.as_slice()),
            None => Cow::Owned(Vec::new()),
        }
    }
}

impl<N> AdjacencySource<N> for BTreeMap<N, Vec<N>>
where
    N: Clone + Ord,
{
    fn successors(&self, node: &N) -> Cow<'_, [N]> {
        match self.get(node) {
            Some(successors) => Cow::Borrowed(successors.as_slice()),
            None => Cow::Owned(Vec::new()),
        }
    }
}

/// Adjacency source backed by a closure. Created by [`from_fn`].
#[derive(Clone, Copy)]
pub struct FnAdjacency<F> {
    lookup: F,
}

impl<F> std::fmt::Debug for FnAdjacency<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnAdjacency")
            .field("lookup", &"<closure>")
            .finish()
    }
}

impl<N, F> AdjacencySource<N> for FnAdjacency<F>
where
    N: Clone,
    F: Fn(&N) -> Vec<N>,
{
    fn successors(&self, node: &N) -> Cow<'_, [N]> {
        Cow::Owned((self.lookup)(node))
    }
}

/// Creates an adjacency source whose successors are computed by `lookup`.
///
/// The closure must return an empty vector for nodes it does not know.
///
/// # Example
///
/// ```
/// use lineage_graph::{compute_downstream, from_fn};
///
/// // Each number points at its double, up to 16.
/// let doubling = from_fn(|n: &u32| if *n < 16 { vec![n * 2] } else { vec![] });
///
/// let reached = compute_downstream([1], &doubling);
/// assert_eq!(reached.len(), 5);
/// ```
pub fn from_fn<N, F>(lookup: F) -> FnAdjacency<F>
where
    F: Fn(&N) -> Vec<N>,
{
    FnAdjacency { lookup }
}

/// Successor lists built from declared edges.
///
/// Preserves two orders: the order in which nodes were first mentioned
/// (see [`nodes`](Self::nodes)) and, per node, the order in which its outgoing
/// edges were declared. Both matter to the sequencer's tie-breaking.
///
/// # Example
///
/// ```
/// use lineage_graph::{AdjacencySource, SuccessorMap};
///
/// let graph = SuccessorMap::from_edges([("raw", "stg"), ("stg", "mart"), ("raw", "audit")]);
///
/// assert_eq!(graph.nodes(), &["raw", "stg", "mart", "audit"]);
/// assert_eq!(graph.successors(&"raw").as_ref(), &["stg", "audit"]);
/// assert!(graph.successors(&"unknown").is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct SuccessorMap<N> {
    /// Every registered node maps to its (possibly empty) successor list
    successors: HashMap<N, Vec<N>>,
    /// Registered nodes in first-mention order
    nodes: Vec<N>,
    edge_count: usize,
}

impl<N> Default for SuccessorMap<N> {
    fn default() -> Self {
        Self {
            successors: HashMap::new(),
            nodes: Vec::new(),
            edge_count: 0,
        }
    }
}

impl<N: Clone + Eq + Hash> SuccessorMap<N> {
    /// Create an empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from `(from, to)` edges in declaration order.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (N, N)>,
    {
        let mut map = Self::new();
        map.extend(edges);
        map
    }

    /// Register a node without edges.
    ///
    /// Returns `false` if the node was already registered.
    pub fn add_node(&mut self, node: N) -> bool {
        if self.successors.contains_key(&node) {
            return false;
        }
        self.successors.insert(node.clone(), Vec::new());
        self.nodes.push(node);
        true
    }

    /// Append an edge `from -> to`, registering both endpoints if needed.
    ///
    /// Repeated edges are kept; each listing counts as one edge.
    pub fn add_edge(&mut self, from: N, to: N) {
        self.add_node(from.clone());
        self.add_node(to.clone());
        if let Some(list) = self.successors.get_mut(&from) {
            list.push(to);
            self.edge_count += 1;
        }
    }

    /// Registered nodes in first-mention order.
    #[must_use]
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// Returns `true` if the node has been registered.
    #[must_use]
    pub fn contains_node(&self, node: &N) -> bool {
        self.successors.contains_key(node)
    }

    /// Number of registered nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of declared edges, counting repeats.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Iterate over edges, grouped by source in node order.
    pub fn edges(&self) -> impl Iterator<Item = (&N, &N)> + '_ {
        self.nodes.iter().flat_map(move |from| {
            self.successors
                .get(from)
                .into_iter()
                .flatten()
                .map(move |to| (from, to))
        })
    }

    /// Build the upstream relation: every edge `a -> b` becomes `b -> a`.
    ///
    /// Node order is preserved, so downstream and upstream queries over the
    /// same map agree on tie-breaking.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut reversed = Self::new();
        for node in &self.nodes {
            reversed.add_node(node.clone());
        }
        for (from, to) in self.edges() {
            reversed.add_edge(to.clone(), from.clone());
        }
        reversed
    }
}

impl<N: Clone + Eq + Hash> AdjacencySource<N> for SuccessorMap<N> {
    fn successors(&self, node: &N) -> Cow<'_, [N]> {
        self.successors.successors(node)
    }
}

impl<N: Clone + Eq + Hash> Extend<(N, N)> for SuccessorMap<N> {
    fn extend<I: IntoIterator<Item = (N, N)>>(&mut self, edges: I) {
        for (from, to) in edges {
            self.add_edge(from, to);
        }
    }
}

impl<N: Clone + Eq + Hash> FromIterator<(N, N)> for SuccessorMap<N> {
    fn from_iter<I: IntoIterator<Item = (N, N)>>(edges: I) -> Self {
        Self::from_edges(edges)
    }
}
