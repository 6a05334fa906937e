//! Configuration resolution for extensions.
//!
//! An extension's configuration comes from two sources:
//!
//! 1. **Graph description** - `<root>/<name>/doap.n3`, translated into a
//!    nested tree by the [`Translator`]
//! 2. **Local override** - `<root>/<name>.ini`, optional, merged on top
//!
//! The merged tree is then normalized into an [`ExtensionConfig`]: `name`
//! and `path` are always present, `enabled` is always a boolean, and path
//! fragments end in exactly one `/`.
//!
//! # Example
//!
//! ```ignore
//! use ext_config::{ExtensionLoader, Translator};
//! use ext_fs::NormalizedPath;
//!
//! let loader = ExtensionLoader::new(NormalizedPath::new("/srv/extensions"), Translator::default());
//! let loaded = loader.load("history")?;
//! assert!(loaded.config.path().is_some());
//! ```

pub mod error;
pub mod loader;
pub mod mapping;
pub mod normalize;
pub mod overrides;
pub mod translator;
pub mod tree;

pub use error::{ConfigError, Result};
pub use loader::{ExtensionLoader, GRAPH_FILE_NAME, LoadedExtension, OVERRIDE_FILE_EXTENSION};
pub use mapping::PredicateMapping;
pub use overrides::{load_override, parse_ini};
pub use translator::{Anomaly, Translation, Translator};
pub use tree::{ConfigMap, ExtensionConfig, deep_merge};
