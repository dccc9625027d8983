//! Node universe normalization.

use std::collections::HashMap;
use std::hash::Hash;

/// A deduplicated node universe with a position index.
pub(crate) struct Universe<'a, N> {
    /// Distinct nodes in first-occurrence order
    pub(crate) nodes: Vec<&'a N>,
    /// Node -> position in `nodes`
    pub(crate) index: HashMap<&'a N, usize>,
    /// Entries dropped because an earlier entry had the same ID
    pub(crate) duplicates: Vec<&'a N>,
}

impl<'a, N: Eq + Hash> Universe<'a, N> {
    /// Deduplicate `universe`, keeping the first occurrence of each node.
    pub(crate) fn new(universe: &'a [N]) -> Self {
        let mut nodes = Vec::with_capacity(universe.len());
        let mut index = HashMap::with_capacity(universe.len());
        let mut duplicates = Vec::new();

        for node in universe {
            if index.contains_key(node) {
                duplicates.push(node);
                continue;
            }
            index.insert(node, nodes.len());
            nodes.push(node);
        }

        Self {
            nodes,
            index,
            duplicates,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn position(&self, node: &N) -> Option<usize> {
        self.index.get(node).copied()
    }
}
