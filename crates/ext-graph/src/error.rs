//! Error types for ext-graph

use std::path::PathBuf;

/// Result type for ext-graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised while loading a graph description document
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The document is not valid Turtle
    #[error("parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// The document base cannot be turned into an IRI
    #[error("invalid document base {base}: {message}")]
    InvalidBase { base: String, message: String },

    /// The document could not be read
    #[error("failed to read graph document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: ext_fs::Error,
    },
}
