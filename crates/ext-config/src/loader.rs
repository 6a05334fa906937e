//! Loading one extension's configuration from disk.

use ext_fs::NormalizedPath;
use ext_graph::FactStore;

use crate::normalize;
use crate::overrides::load_override;
use crate::translator::{Anomaly, Translation, Translator};
use crate::tree::{ExtensionConfig, deep_merge};
use crate::Result;

/// File name of the graph description inside an extension directory.
pub const GRAPH_FILE_NAME: &str = "doap.n3";

/// Extension of the local override file next to the extension directory.
pub const OVERRIDE_FILE_EXTENSION: &str = "ini";

/// A freshly loaded descriptor together with the translation anomalies.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedExtension {
    pub config: ExtensionConfig,
    pub anomalies: Vec<Anomaly>,
}

/// Resolves extensions below a root directory.
#[derive(Debug, Clone)]
pub struct ExtensionLoader {
    root: NormalizedPath,
    translator: Translator,
}

impl ExtensionLoader {
    pub fn new(root: NormalizedPath, translator: Translator) -> Self {
        Self { root, translator }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// `<root>/<name>`
    pub fn extension_dir(&self, name: &str) -> NormalizedPath {
        self.root.join(name)
    }

    /// `<root>/<name>/doap.n3`
    pub fn graph_path(&self, name: &str) -> NormalizedPath {
        self.extension_dir(name).join(GRAPH_FILE_NAME)
    }

    /// `<root>/<name>.ini`
    pub fn override_path(&self, name: &str) -> NormalizedPath {
        self.root.join(&format!("{name}.{OVERRIDE_FILE_EXTENSION}"))
    }

    /// Translate, apply the local override, then normalize.
    pub fn load(&self, name: &str) -> Result<LoadedExtension> {
        let dir = self.extension_dir(name).to_dir_string();
        let store = FactStore::load(&self.graph_path(name))?;
        let Translation {
            mut config,
            anomalies,
        } = self.translator.translate(&store, &dir)?;

        if let Some(local) = load_override(&self.override_path(name))? {
            deep_merge(&mut config, &local);
        }

        normalize::finalize(&mut config, name, &dir);

        tracing::debug!(
            extension = name,
            anomalies = anomalies.len(),
            "resolved extension configuration"
        );
        Ok(LoadedExtension {
            config: ExtensionConfig::new(config),
            anomalies,
        })
    }
}
