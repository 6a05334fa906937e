//! Error types for ext-config

use std::path::PathBuf;

/// Result type for ext-config operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that abort loading a single extension
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Graph document unreadable or malformed
    #[error(transparent)]
    Graph(#[from] ext_graph::GraphError),

    /// The graph document does not name the extension it describes
    #[error("graph document at {base} declares no primary topic")]
    MissingPrimarySubject { base: String },

    /// Local override file exists but is malformed
    #[error("failed to parse override {path} at line {line}: {message}")]
    OverrideParse {
        path: PathBuf,
        line: usize,
        message: String,
    },
}
