//! Error types for lineage CLI operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for lineage CLI operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A named file could not be read.
    #[error("failed to read {}", path.display())]
    Read {
        /// File that was being read
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: io::Error,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Graph computation error.
    #[error(transparent)]
    Graph(#[from] lineage_graph::Error),
}

/// A specialized Result type for lineage operations.
pub type Result<T> = std::result::Result<T, Error>;
