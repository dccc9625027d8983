//! Lineage - impact analysis and layout ordering for JSONL lineage documents.
//!
//! The binary is a thin wrapper around this library:
//!
//! - [`document`] loads a lineage document, collecting non-fatal
//!   [`LoadWarning`]s.
//! - [`config`] reads `lineage.yaml`.
//! - [`commands`] runs the analyses on a loaded document and returns reports.
//! - [`output`] prints reports as text or JSON.
//! - [`cli`] ties them together behind `clap`.
//!
//! # Example
//!
//! ```
//! use lineage::commands;
//! use lineage::document::LineageDocument;
//! use lineage_graph::NodeId;
//!
//! let (document, warnings) = LineageDocument::parse(
//!     r#"{"id": "raw.orders", "downstream": ["stg.orders"]}
//! {"id": "stg.orders"}"#,
//! );
//! assert!(warnings.is_empty());
//!
//! let report = commands::downstream(&document, &[NodeId::from("raw.orders")], false);
//! assert_eq!(report.affected.len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod output;

pub use config::LineageConfig;
pub use document::{LineageDocument, LoadWarning, NodeRecord};
pub use error::{Error, Result};
