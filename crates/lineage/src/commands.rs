//! Command implementations.
//!
//! Each command takes a loaded [`LineageDocument`] and returns a plain report;
//! printing is left to [`crate::output`].

use crate::config::{CONFIG_FILE_NAME, DEFAULT_DATA_FILE, LineageConfig};
use crate::document::LineageDocument;
use crate::error::{Error, Result};
use lineage_graph::{Cycle, NodeId, compute_downstream, compute_order, find_cycles};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Nodes affected by a change to a set of roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownstreamReport {
    /// Roots as given, without repeats
    pub roots: Vec<NodeId>,
    /// Affected declared nodes, in document order
    pub affected: Vec<NodeId>,
    /// Affected nodes the document never declares, sorted
    pub external: Vec<NodeId>,
    /// Roots the document never declares
    pub unknown_roots: Vec<NodeId>,
}

impl DownstreamReport {
    /// Total number of affected nodes, roots included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.affected.len() + self.external.len()
    }

    /// Returns `true` if nothing is affected, either because no roots were
    /// given or because `within` dropped every undeclared root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A dependency loop among document nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Members in document order
    pub nodes: Vec<NodeId>,
    /// Shortest loop through the first member
    pub path: Vec<NodeId>,
}

impl From<Cycle<NodeId>> for CycleReport {
    fn from(cycle: Cycle<NodeId>) -> Self {
        Self {
            nodes: cycle.nodes().to_vec(),
            path: cycle.path().to_vec(),
        }
    }
}

/// Layout order of the document, or of the part affected by some roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderReport {
    /// Nodes in visiting order
    pub order: Vec<NodeId>,
    /// Nodes on or downstream of a cycle, in document order
    pub unresolved: Vec<NodeId>,
    /// Loops among the unresolved nodes
    pub cycles: Vec<CycleReport>,
    /// `--from` roots the document never declares
    pub unknown_roots: Vec<NodeId>,
}

impl OrderReport {
    /// Returns `true` if every node was ordered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Fail if any node could not be ordered.
    pub fn ensure_complete(&self) -> Result<()> {
        if self.is_complete() {
            return Ok(());
        }
        Err(lineage_graph::Error::cyclic_dependency(&self.unresolved).into())
    }
}

/// Result of the init command
#[derive(Debug)]
pub struct InitResult {
    /// Path to the created config file
    pub config_file: PathBuf,
    /// Path to the lineage document
    pub data_file: PathBuf,
    /// Whether the lineage document was created (it may already exist)
    pub created_data_file: bool,
}

/// Deduplicate `roots` and split off those the document does not declare.
fn split_roots(document: &LineageDocument, roots: &[NodeId]) -> (Vec<NodeId>, Vec<NodeId>) {
    let mut seen = HashSet::new();
    let unique: Vec<NodeId> = roots
        .iter()
        .filter(|root| seen.insert(*root))
        .cloned()
        .collect();
    let unknown = unique
        .iter()
        .filter(|root| !document.is_declared(root))
        .cloned()
        .collect();
    (unique, unknown)
}

/// Compute the nodes affected by a change to `roots`.
///
/// With `within`, nodes the document does not declare are dropped.
#[must_use]
pub fn downstream(document: &LineageDocument, roots: &[NodeId], within: bool) -> DownstreamReport {
    let (roots, unknown_roots) = split_roots(document, roots);
    for root in &unknown_roots {
        tracing::warn!(root = %root, "Root is not declared in the lineage document");
    }

    let mut reached = compute_downstream(roots.iter().cloned(), document.graph());
    if within {
        reached = reached.within(document.universe());
    }

    let affected: Vec<NodeId> = reached
        .ordered_by(document.universe())
        .into_iter()
        .cloned()
        .collect();
    let mut external: Vec<NodeId> = reached
        .iter()
        .filter(|node| !document.is_declared(node))
        .cloned()
        .collect();
    external.sort();

    tracing::debug!(
        roots = roots.len(),
        affected = affected.len(),
        external = external.len(),
        "Computed downstream impact"
    );

    DownstreamReport {
        roots,
        affected,
        external,
        unknown_roots,
    }
}

/// Order the document for layered layout.
///
/// With non-empty `from`, only the declared nodes downstream of those roots
/// are ordered.
#[must_use]
pub fn order(document: &LineageDocument, from: &[NodeId]) -> OrderReport {
    let (roots, unknown_roots) = split_roots(document, from);

    let subset: Vec<NodeId>;
    let universe = if roots.is_empty() {
        document.universe()
    } else {
        subset = compute_downstream(roots, document.graph())
            .ordered_by(document.universe())
            .into_iter()
            .cloned()
            .collect();
        subset.as_slice()
    };

    let result = compute_order(universe, document.graph());
    let cycles = result
        .cycles(document.graph())
        .into_iter()
        .map(CycleReport::from)
        .collect();
    let unresolved = result.unresolved().to_vec();

    OrderReport {
        order: result.into_order(),
        unresolved,
        cycles,
        unknown_roots,
    }
}

/// Find every dependency loop among the document's nodes.
#[must_use]
pub fn cycles(document: &LineageDocument) -> Vec<CycleReport> {
    find_cycles(document.universe(), document.graph())
        .into_iter()
        .map(CycleReport::from)
        .collect()
}

/// Create `lineage.yaml` and an empty lineage document in `dir`.
///
/// Fails if the configuration file already exists; an existing lineage
/// document is left untouched.
pub async fn init(dir: &Path) -> Result<InitResult> {
    let config_file = dir.join(CONFIG_FILE_NAME);
    if fs::try_exists(&config_file).await? {
        return Err(Error::Config(format!(
            "{} already exists",
            config_file.display()
        )));
    }

    LineageConfig::default().save(&config_file).await?;

    let data_file = dir.join(DEFAULT_DATA_FILE);
    let created_data_file = !fs::try_exists(&data_file).await?;
    if created_data_file {
        fs::write(&data_file, "").await?;
    }

    Ok(InitResult {
        config_file,
        data_file,
        created_data_file,
    })
}
