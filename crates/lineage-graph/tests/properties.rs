//! Property-based tests for reachability and sequencing.
//!
//! Uses proptest to validate, over random graphs:
//! - Roots are always downstream of themselves
//! - Downstream closure is idempotent and closed under predecessors
//! - Sequencing respects every in-universe edge on acyclic graphs
//! - Sequencing partitions the universe into ordered and unresolved nodes
//! - Both computations are deterministic

use lineage_graph::{SuccessorMap, compute_downstream, compute_order, find_cycles};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

/// Node count and a list of arbitrary edges (cycles and self-loops allowed).
fn any_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..24).prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..64)))
}

/// Node count, edges pointing from lower to higher labels, and a shuffled
/// universe so labels carry no ordering hint.
fn any_dag() -> impl Strategy<Value = (Vec<usize>, Vec<(usize, usize)>)> {
    any_graph().prop_flat_map(|(n, edges)| {
        let dag: Vec<(usize, usize)> = edges
            .into_iter()
            .filter(|(a, b)| a != b)
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect();
        let universe: Vec<usize> = (0..n).collect();
        (Just(universe).prop_shuffle(), Just(dag))
    })
}

fn graph_with_nodes(n: usize, edges: &[(usize, usize)]) -> SuccessorMap<usize> {
    let mut graph = SuccessorMap::new();
    for node in 0..n {
        graph.add_node(node);
    }
    graph.extend(edges.iter().copied());
    graph
}

proptest! {
    /// Property: roots ⊆ downstream(roots)
    #[test]
    fn prop_roots_are_members((n, edges) in any_graph(), picks in prop::collection::vec(any::<prop::sample::Index>(), 0..8)) {
        let graph = graph_with_nodes(n, &edges);
        let roots: Vec<usize> = picks.iter().map(|i| i.index(n)).collect();

        let downstream = compute_downstream(roots.iter().copied(), &graph);

        for root in &roots {
            prop_assert!(downstream.contains(root), "root {} missing", root);
        }
    }

    /// Property: downstream(downstream(roots)) == downstream(roots)
    #[test]
    fn prop_downstream_is_idempotent((n, edges) in any_graph(), picks in prop::collection::vec(any::<prop::sample::Index>(), 0..8)) {
        let graph = graph_with_nodes(n, &edges);
        let roots: Vec<usize> = picks.iter().map(|i| i.index(n)).collect();

        let once = compute_downstream(roots, &graph);
        let twice = compute_downstream(once.iter().copied(), &graph);

        prop_assert_eq!(once, twice);
    }

    /// Property: every non-root member has a predecessor in the set, and no
    /// edge leaves the set
    #[test]
    fn prop_downstream_is_a_closure((n, edges) in any_graph(), picks in prop::collection::vec(any::<prop::sample::Index>(), 0..8)) {
        let graph = graph_with_nodes(n, &edges);
        let roots: HashSet<usize> = picks.iter().map(|i| i.index(n)).collect();

        let downstream = compute_downstream(roots.iter().copied(), &graph);

        for member in downstream.iter().filter(|m| !roots.contains(*m)) {
            let has_predecessor = edges
                .iter()
                .any(|(from, to)| to == member && downstream.contains(from));
            prop_assert!(has_predecessor, "{} has no predecessor in the set", member);
        }
        for (from, to) in &edges {
            if downstream.contains(from) {
                prop_assert!(downstream.contains(to), "edge {} -> {} leaves the set", from, to);
            }
        }
    }

    /// Property: on a DAG every edge u -> v has pos(u) < pos(v), and the order
    /// is a permutation of the universe
    #[test]
    fn prop_dag_order_respects_edges((universe, edges) in any_dag()) {
        let graph = graph_with_nodes(universe.len(), &edges);

        let result = compute_order(&universe, &graph);

        prop_assert!(result.is_complete());
        prop_assert_eq!(result.len(), universe.len());
        let position: HashMap<usize, usize> = result
            .order()
            .iter()
            .enumerate()
            .map(|(i, node)| (*node, i))
            .collect();
        prop_assert_eq!(position.len(), universe.len());
        for (from, to) in &edges {
            prop_assert!(position[from] < position[to], "edge {} -> {} out of order", from, to);
        }
    }

    /// Property: nodes ready from the start keep their universe order
    #[test]
    fn prop_sources_keep_universe_order((universe, edges) in any_dag()) {
        let graph = graph_with_nodes(universe.len(), &edges);
        let targets: HashSet<usize> = edges.iter().map(|(_, to)| *to).collect();

        let result = compute_order(&universe, &graph);

        let sources_in_universe: Vec<usize> = universe
            .iter()
            .copied()
            .filter(|node| !targets.contains(node))
            .collect();
        let leading: Vec<usize> = result.order()[..sources_in_universe.len()].to_vec();
        prop_assert_eq!(leading, sources_in_universe);
    }

    /// Property: ordered and unresolved nodes partition the universe, and an
    /// incomplete order always has at least one cycle among its unresolved nodes
    #[test]
    fn prop_order_partitions_universe((n, edges) in any_graph()) {
        let graph = graph_with_nodes(n, &edges);
        let universe: Vec<usize> = (0..n).collect();

        let result = compute_order(&universe, &graph);

        prop_assert_eq!(result.len() + result.unresolved().len(), n);
        let ordered: HashSet<&usize> = result.order().iter().collect();
        prop_assert!(result.unresolved().iter().all(|node| !ordered.contains(node)));

        let cycles = find_cycles(result.unresolved(), &graph);
        prop_assert_eq!(result.is_complete(), cycles.is_empty());
        for cycle in &cycles {
            prop_assert!(cycle.nodes().iter().all(|node| result.unresolved().contains(node)));
        }
    }

    /// Property: cycle paths are real loops
    #[test]
    fn prop_cycle_paths_follow_edges((n, edges) in any_graph()) {
        let graph = graph_with_nodes(n, &edges);
        let universe: Vec<usize> = (0..n).collect();
        let edge_set: HashSet<(usize, usize)> = edges.iter().copied().collect();

        let cycles = compute_order(&universe, &graph).cycles(&graph);

        for cycle in &cycles {
            let path = cycle.path();
            prop_assert!(!path.is_empty());
            for (i, from) in path.iter().enumerate() {
                let to = path[(i + 1) % path.len()];
                prop_assert!(edge_set.contains(&(*from, to)), "missing edge {} -> {}", from, to);
            }
        }
    }

    /// Property: repeated calls produce identical results
    #[test]
    fn prop_order_is_deterministic((n, edges) in any_graph()) {
        let graph = graph_with_nodes(n, &edges);
        let universe: Vec<usize> = (0..n).rev().collect();

        let first = compute_order(&universe, &graph);
        let second = compute_order(&universe, &graph);

        prop_assert_eq!(first, second);
    }

    /// Property: successors outside the universe never appear in the order
    #[test]
    fn prop_order_stays_within_universe((n, edges) in any_graph(), keep in prop::collection::vec(any::<bool>(), 24)) {
        let graph = graph_with_nodes(n, &edges);
        let universe: Vec<usize> = (0..n).filter(|node| keep[*node]).collect();

        let result = compute_order(&universe, &graph);

        prop_assert!(result.order().iter().all(|node| universe.contains(node)));
        prop_assert!(result.unresolved().iter().all(|node| universe.contains(node)));
        prop_assert_eq!(result.len() + result.unresolved().len(), universe.len());
    }
}

#[test]
fn empty_universe_has_empty_order_and_nothing_unresolved() {
    let graph = graph_with_nodes(3, &[(0, 1), (1, 0)]);

    let result = compute_order(&[], &graph);

    assert!(result.is_empty());
    assert!(result.unresolved().is_empty());
}
