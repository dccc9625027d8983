//! JSON Lines lineage documents.
//!
//! One node record per line:
//!
//! ```json
//! {"id": "raw.orders", "downstream": ["stg.orders", "stg.order_items"]}
//! ```
//!
//! Line order defines the node universe and `downstream` order defines the
//! successor order, which together fix every tie-break in the ordering.
//!
//! Loading is resilient: problems in individual lines are reported as
//! [`LoadWarning`]s and the rest of the document is still used. Only I/O
//! failures are errors.

use crate::error::{Error, Result};
use lineage_graph::{NodeId, SuccessorMap};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

/// A single line of a lineage document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Node identifier
    pub id: NodeId,

    /// Direct successors, in listing order
    #[serde(default)]
    pub downstream: Vec<NodeId>,
}

/// Non-fatal problems found while loading a lineage document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// Line that couldn't be decoded as UTF-8 or parsed as a node record
    ///
    /// **Effect**: Line is skipped entirely.
    MalformedJson {
        /// 1-based line number
        line_number: usize,
        /// Parser message
        error: String,
    },

    /// Node declared on more than one line
    ///
    /// **Effect**: The node keeps its first position; the successors from
    /// the later line are appended to its list.
    DuplicateNode {
        /// Repeated identifier
        id: NodeId,
        /// 1-based line number of the repeat
        line_number: usize,
    },

    /// Successor that no line declares
    ///
    /// **Effect**: The edge is kept. Downstream queries report the node as
    /// outside the document; ordering ignores it.
    DanglingReference {
        /// Declaring node
        from: NodeId,
        /// Undeclared successor
        to: NodeId,
    },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedJson { line_number, error } => {
                write!(f, "skipped malformed line {line_number}: {error}")
            }
            Self::DuplicateNode { id, line_number } => {
                write!(f, "node {id} declared again on line {line_number}")
            }
            Self::DanglingReference { from, to } => {
                write!(f, "{from} lists undeclared downstream node {to}")
            }
        }
    }
}

/// A loaded lineage document: the declared nodes in line order and their
/// successor lists.
#[derive(Debug, Clone, Default)]
pub struct LineageDocument {
    universe: Vec<NodeId>,
    declared: HashSet<NodeId>,
    graph: SuccessorMap<NodeId>,
}

impl LineageDocument {
    /// Parse a document held in memory.
    #[must_use]
    pub fn parse(content: &str) -> (Self, Vec<LoadWarning>) {
        let mut builder = Builder::default();
        for (index, line) in content.lines().enumerate() {
            builder.push_line(index + 1, line);
        }
        builder.finish()
    }

    /// Load a document from disk, line by line.
    pub async fn load(path: &Path) -> Result<(Self, Vec<LoadWarning>)> {
        let read_error = |source| Error::Read {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).await.map_err(read_error)?;
        let mut reader = BufReader::new(file);
        let mut builder = Builder::default();
        let mut buf = Vec::new();
        let mut line_number = 0;

        // Raw bytes so a line with bad encoding is skipped, not fatal
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await.map_err(read_error)? == 0 {
                break;
            }
            line_number += 1;
            match std::str::from_utf8(&buf) {
                Ok(line) => builder.push_line(line_number, line),
                Err(e) => builder.reject_line(line_number, format!("invalid UTF-8: {e}")),
            }
        }

        let (document, warnings) = builder.finish();
        tracing::debug!(
            path = %path.display(),
            nodes = document.node_count(),
            edges = document.edge_count(),
            warnings = warnings.len(),
            "Loaded lineage document"
        );
        Ok((document, warnings))
    }

    /// Declared nodes in line order.
    #[must_use]
    pub fn universe(&self) -> &[NodeId] {
        &self.universe
    }

    /// Successor lists, including edges to undeclared nodes.
    #[must_use]
    pub fn graph(&self) -> &SuccessorMap<NodeId> {
        &self.graph
    }

    /// Returns `true` if a line declares `id`.
    #[must_use]
    pub fn is_declared(&self, id: &NodeId) -> bool {
        self.declared.contains(id)
    }

    /// Number of declared nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.universe.len()
    }

    /// Number of listed edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl FromIterator<NodeRecord> for LineageDocument {
    /// Build a document from records, discarding load warnings.
    fn from_iter<I: IntoIterator<Item = NodeRecord>>(records: I) -> Self {
        let mut builder = Builder::default();
        for (index, record) in records.into_iter().enumerate() {
            builder.push_record(index + 1, record);
        }
        builder.finish().0
    }
}

#[derive(Default)]
struct Builder {
    document: LineageDocument,
    warnings: Vec<LoadWarning>,
}

impl Builder {
    fn push_line(&mut self, line_number: usize, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        match serde_json::from_str::<NodeRecord>(line) {
            Ok(record) => self.push_record(line_number, record),
            Err(e) => self.reject_line(line_number, e.to_string()),
        }
    }

    fn reject_line(&mut self, line_number: usize, error: String) {
        tracing::warn!(line_number, error = %error, "Skipping malformed lineage line");
        self.warnings
            .push(LoadWarning::MalformedJson { line_number, error });
    }

    fn push_record(&mut self, line_number: usize, record: NodeRecord) {
        let doc = &mut self.document;
        if doc.declared.insert(record.id.clone()) {
            doc.universe.push(record.id.clone());
        } else {
            self.warnings.push(LoadWarning::DuplicateNode {
                id: record.id.clone(),
                line_number,
            });
        }

        doc.graph.add_node(record.id.clone());
        for successor in record.downstream {
            doc.graph.add_edge(record.id.clone(), successor);
        }
    }

    fn finish(mut self) -> (LineageDocument, Vec<LoadWarning>) {
        let doc = &self.document;
        let dangling = doc
            .graph
            .edges()
            .filter(|(_, to)| !doc.declared.contains(*to))
            .map(|(from, to)| LoadWarning::DanglingReference {
                from: from.clone(),
                to: to.clone(),
            });
        self.warnings.extend(dangling);
        (self.document, self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_graph::AdjacencySource;
    use rstest::rstest;

    fn ids(names: &[&str]) -> Vec<NodeId> {
        names.iter().map(|name| NodeId::from(*name)).collect()
    }

    #[test]
    fn lines_define_universe_and_successor_order() {
        let (doc, warnings) = LineageDocument::parse(
            r#"{"id": "raw.orders", "downstream": ["stg.orders", "stg.items"]}
{"id": "stg.items"}
{"id": "stg.orders", "downstream": ["mart.revenue"]}
{"id": "mart.revenue", "downstream": []}
"#,
        );

        assert!(warnings.is_empty());
        assert_eq!(
            doc.universe(),
            ids(&["raw.orders", "stg.items", "stg.orders", "mart.revenue"]).as_slice()
        );
        assert_eq!(
            doc.graph().successors(&NodeId::from("raw.orders")).as_ref(),
            ids(&["stg.orders", "stg.items"]).as_slice()
        );
        assert_eq!(doc.edge_count(), 3);
    }

    #[rstest]
    #[case::not_json("not json")]
    #[case::missing_id(r#"{"downstream": ["a"]}"#)]
    #[case::wrong_type(r#"{"id": "a", "downstream": "b"}"#)]
    fn malformed_lines_are_skipped(#[case] bad: &str) {
        let content = format!("{{\"id\": \"a\"}}\n{bad}\n{{\"id\": \"b\"}}\n");

        let (doc, warnings) = LineageDocument::parse(&content);

        assert_eq!(doc.universe(), ids(&["a", "b"]).as_slice());
        assert!(matches!(
            warnings.as_slice(),
            [LoadWarning::MalformedJson { line_number: 2, .. }]
        ));
    }

    #[tokio::test]
    async fn undecodable_line_is_skipped_when_loading() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("lineage.jsonl");
        tokio::fs::write(&path, b"{\"id\":\"a\"}\n\xff\xfe\n{\"id\":\"b\"}\n")
            .await
            .unwrap();

        let (doc, warnings) = LineageDocument::load(&path).await.unwrap();

        assert_eq!(doc.universe(), ids(&["a", "b"]).as_slice());
        assert!(matches!(
            warnings.as_slice(),
            [LoadWarning::MalformedJson { line_number: 2, error }] if error.contains("UTF-8")
        ));
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let temp = tempfile::TempDir::new().unwrap();

        let result = LineageDocument::load(&temp.path().join("absent.jsonl")).await;

        assert!(matches!(result, Err(Error::Read { .. })));
    }

    #[test]
    fn blank_lines_are_ignored_but_counted() {
        let (doc, warnings) = LineageDocument::parse("\n{\"id\": \"a\"}\n   \n{oops\n");

        assert_eq!(doc.node_count(), 1);
        assert!(matches!(
            warnings.as_slice(),
            [LoadWarning::MalformedJson { line_number: 4, .. }]
        ));
    }

    #[test]
    fn repeated_node_keeps_first_position_and_merges_successors() {
        let (doc, warnings) = LineageDocument::parse(
            r#"{"id": "a", "downstream": ["b"]}
{"id": "b"}
{"id": "a", "downstream": ["c"]}
{"id": "c"}
"#,
        );

        assert_eq!(doc.universe(), ids(&["a", "b", "c"]).as_slice());
        assert_eq!(
            doc.graph().successors(&NodeId::from("a")).as_ref(),
            ids(&["b", "c"]).as_slice()
        );
        assert_eq!(
            warnings,
            vec![LoadWarning::DuplicateNode {
                id: NodeId::from("a"),
                line_number: 3,
            }]
        );
    }

    #[test]
    fn undeclared_successors_are_kept_and_reported() {
        let (doc, warnings) =
            LineageDocument::parse(r#"{"id": "stg.orders", "downstream": ["mart.revenue"]}"#);

        assert!(!doc.is_declared(&NodeId::from("mart.revenue")));
        assert_eq!(doc.graph().successors(&NodeId::from("stg.orders")).len(), 1);
        assert_eq!(
            warnings,
            vec![LoadWarning::DanglingReference {
                from: NodeId::from("stg.orders"),
                to: NodeId::from("mart.revenue"),
            }]
        );
        assert_eq!(
            warnings[0].to_string(),
            "stg.orders lists undeclared downstream node mart.revenue"
        );
    }

    #[test]
    fn successor_declared_later_is_not_dangling() {
        let (_, warnings) = LineageDocument::parse(
            r#"{"id": "a", "downstream": ["b"]}
{"id": "b"}"#,
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn records_collect_into_document() {
        let doc: LineageDocument = [
            NodeRecord {
                id: NodeId::from("a"),
                downstream: ids(&["b"]),
            },
            NodeRecord {
                id: NodeId::from("b"),
                downstream: Vec::new(),
            },
        ]
        .into_iter()
        .collect();

        assert_eq!(doc.universe(), ids(&["a", "b"]).as_slice());
        assert_eq!(doc.edge_count(), 1);
    }
}
