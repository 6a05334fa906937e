//! Error types for ext-manager

use std::path::PathBuf;

use crate::hooks::HookError;

/// Result type for ext-manager operations
pub type Result<T> = std::result::Result<T, ManagerError>;

/// Errors surfaced by the scanner, the cache and the registry
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    /// The extension root cannot be listed; aborts the scan
    #[error("cannot read extension root {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: ext_fs::Error,
    },

    /// The cache document exists but cannot be read or decoded; aborts the scan
    #[error("cache document {path} is corrupt: {reason}")]
    CacheCorrupt { path: PathBuf, reason: String },

    /// Lookup of a name the registry does not know
    #[error("extension '{0}' is not registered")]
    NotRegistered(String),

    /// The component has no helper, or it has not been loaded yet
    #[error("no helper loaded for component '{0}'")]
    NoHelper(String),

    /// A collaborator rejected a hand-off
    #[error("collaborator failed: {0}")]
    Hook(#[from] HookError),

    /// Manager options file is malformed
    #[error("invalid options in {path}: {reason}")]
    Options { path: PathBuf, reason: String },

    #[error(transparent)]
    Fs(#[from] ext_fs::Error),

    #[error(transparent)]
    Config(#[from] ext_config::ConfigError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
