//! Extension discovery and mtime-driven staleness detection.
//!
//! A scan pass:
//!
//! 1. load the cache; a missing cache is a cold start where every directory
//!    holding a graph document is loaded, whatever its mtimes
//! 2. otherwise, if the root directory's last edit time is newer than the
//!    cache build time, classify every candidate directory by comparing its
//!    override and graph document mtimes against the build time, reload each
//!    changed extension and prune cached entries whose sources vanished
//! 3. write the cache back if anything changed
//!
//! The root-directory gate is coarse: editing a file inside an extension
//! directory does not bump the root mtime, so such edits are only noticed
//! once something at the top level changes too.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::SystemTime;

use ext_config::{Anomaly, ExtensionConfig, ExtensionLoader, Translator};
use ext_fs::{NormalizedPath, directory_edit_time, io, modified_time};
use serde::Serialize;

use crate::cache::ConfigCache;
use crate::{ManagerError, Result};

/// Subdirectories of the root that never hold extensions.
pub const RESERVED_DIRS: [&str; 2] = ["themes", "translations"];

/// Which sources of an extension changed since the cache was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Only the local override.
    Local = 0,
    /// Only the graph document.
    Graph = 1,
    Both = 2,
    /// Directory or graph document disappeared; the entry was pruned.
    Removed = 3,
}

impl ChangeKind {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Local => "local",
            Self::Graph => "graph",
            Self::Both => "both",
            Self::Removed => "removed",
        };
        f.write_str(label)
    }
}

/// Result of one scan pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanOutcome {
    /// Every registered descriptor, enabled or not.
    pub extensions: BTreeMap<String, ExtensionConfig>,
    /// Extensions detected as changed during this pass.
    pub changes: BTreeMap<String, ChangeKind>,
    /// Changed extensions that failed to load, with the reason.
    pub failures: BTreeMap<String, String>,
    /// Translation anomalies of the extensions reloaded in this pass.
    pub anomalies: BTreeMap<String, Vec<String>>,
    pub cache_written: bool,
}

/// Walks an extension root and keeps the cache in step with it.
#[derive(Debug, Clone)]
pub struct ExtensionScanner {
    loader: ExtensionLoader,
}

impl ExtensionScanner {
    pub fn new(root: NormalizedPath) -> Self {
        Self::with_translator(root, Translator::default())
    }

    pub fn with_translator(root: NormalizedPath, translator: Translator) -> Self {
        Self {
            loader: ExtensionLoader::new(root, translator),
        }
    }

    pub fn root(&self) -> &NormalizedPath {
        self.loader.root()
    }

    pub fn loader(&self) -> &ExtensionLoader {
        &self.loader
    }

    /// Run one scan pass against `cache`.
    pub fn scan(&self, cache: &ConfigCache) -> Result<ScanOutcome> {
        let root = self.root();
        let (built_at, entries) = match cache.load()? {
            Some(snapshot) => (Some(snapshot.built_at), snapshot.entries),
            None => {
                tracing::info!(root = %root, "no cache, scanning all extensions");
                (None, BTreeMap::new())
            }
        };

        let mut outcome = ScanOutcome {
            extensions: entries,
            ..ScanOutcome::default()
        };

        let stale = match built_at {
            Some(built_at) => {
                directory_edit_time(root).map_err(|source| self.unreadable(source))? > built_at
            }
            None => true,
        };
        if stale {
            self.refresh(&mut outcome, built_at)?;
        } else {
            tracing::debug!(root = %root, "cache is fresh");
        }

        if !outcome.changes.is_empty() {
            cache.save(&outcome.extensions)?;
            outcome.cache_written = true;
        }

        tracing::info!(
            root = %root,
            extensions = outcome.extensions.len(),
            changed = outcome.changes.len(),
            failed = outcome.failures.len(),
            "scan complete"
        );
        Ok(outcome)
    }

    /// Names of the immediate subdirectories that may hold extensions,
    /// sorted.
    pub fn candidates(&self) -> Result<Vec<String>> {
        let entries = io::list_dir(self.root()).map_err(|source| self.unreadable(source))?;
        Ok(entries
            .into_iter()
            .filter(|entry| entry.is_dir && !RESERVED_DIRS.contains(&entry.name.as_str()))
            .map(|entry| entry.name)
            .collect())
    }

    /// Classify `candidates` whose sources are newer than `since`.
    pub fn modified_since(
        &self,
        candidates: &[String],
        since: SystemTime,
    ) -> BTreeMap<String, ChangeKind> {
        let newer = |path: &NormalizedPath| modified_time(path).is_some_and(|time| time > since);

        let mut changes = BTreeMap::new();
        for name in candidates {
            let local = newer(&self.loader.override_path(name));
            let graph = newer(&self.loader.graph_path(name));
            let kind = match (local, graph) {
                (true, false) => ChangeKind::Local,
                (false, true) => ChangeKind::Graph,
                (true, true) => ChangeKind::Both,
                (false, false) => continue,
            };
            tracing::debug!(extension = %name, change = %kind, "source changed");
            changes.insert(name.clone(), kind);
        }
        changes
    }

    /// Reload changed extensions; without a build time every extension with
    /// a graph document counts as changed.
    fn refresh(&self, outcome: &mut ScanOutcome, built_at: Option<SystemTime>) -> Result<()> {
        let candidates = self.candidates()?;

        let present: BTreeSet<&str> = candidates
            .iter()
            .filter(|name| self.loader.graph_path(name).is_file())
            .map(String::as_str)
            .collect();
        let vanished: Vec<String> = outcome
            .extensions
            .keys()
            .filter(|name| !present.contains(name.as_str()))
            .cloned()
            .collect();
        for name in vanished {
            tracing::info!(extension = %name, "extension vanished, pruning");
            outcome.extensions.remove(&name);
            outcome.changes.insert(name, ChangeKind::Removed);
        }

        let changes = match built_at {
            Some(built_at) => self.modified_since(&candidates, built_at),
            None => present
                .iter()
                .map(|name| (name.to_string(), ChangeKind::Both))
                .collect(),
        };
        for (name, kind) in changes {
            if !present.contains(name.as_str()) {
                tracing::warn!(extension = %name, "override without graph document, skipping");
                continue;
            }
            match self.loader.load(&name) {
                Ok(loaded) => {
                    for anomaly in &loaded.anomalies {
                        log_anomaly(&name, anomaly);
                    }
                    if !loaded.anomalies.is_empty() {
                        outcome.anomalies.insert(
                            name.clone(),
                            loaded.anomalies.iter().map(ToString::to_string).collect(),
                        );
                    }
                    outcome.extensions.insert(name.clone(), loaded.config);
                }
                Err(e) => {
                    tracing::warn!(extension = %name, error = %e, "failed to load extension");
                    outcome.extensions.remove(&name);
                    outcome.failures.insert(name.clone(), e.to_string());
                }
            }
            outcome.changes.insert(name, kind);
        }
        Ok(())
    }

    fn unreadable(&self, source: ext_fs::Error) -> ManagerError {
        ManagerError::RootUnreadable {
            path: self.root().to_native(),
            source,
        }
    }
}

fn log_anomaly(extension: &str, anomaly: &Anomaly) {
    match anomaly {
        Anomaly::DroppedPredicate { .. } => {
            tracing::debug!(%extension, %anomaly, "translation anomaly");
        }
        _ => tracing::warn!(%extension, %anomaly, "translation anomaly"),
    }
}
