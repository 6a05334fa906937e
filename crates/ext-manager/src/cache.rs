//! Resolved-configuration cache.
//!
//! A single pretty-printed JSON document mapping extension names to their
//! merged configuration trees. The document's modification time is the
//! cache build time the scanner compares source files against.

use std::collections::BTreeMap;
use std::time::SystemTime;

use ext_config::ExtensionConfig;
use ext_fs::{NormalizedPath, io, modified_time};

use crate::{ManagerError, Result};

/// Extension name → merged configuration, ordered by name.
pub type CacheEntries = BTreeMap<String, ExtensionConfig>;

/// A loaded cache document.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSnapshot {
    /// Modification time of the cache document.
    pub built_at: SystemTime,
    pub entries: CacheEntries,
}

/// Handle to the cache document on disk.
#[derive(Debug, Clone)]
pub struct ConfigCache {
    path: NormalizedPath,
}

impl ConfigCache {
    pub fn new(path: impl Into<NormalizedPath>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// Load the cache document.
    ///
    /// A missing document is `Ok(None)`. A document that exists but cannot be
    /// read or decoded is [`ManagerError::CacheCorrupt`].
    pub fn load(&self) -> Result<Option<CacheSnapshot>> {
        let text = match io::read_text(&self.path) {
            Ok(text) => text,
            Err(e) if e.is_not_found() => {
                tracing::debug!(path = %self.path, "no cache document");
                return Ok(None);
            }
            Err(e) => return Err(self.corrupt(e.to_string())),
        };
        let entries: CacheEntries =
            serde_json::from_str(&text).map_err(|e| self.corrupt(e.to_string()))?;
        let built_at = modified_time(&self.path)
            .ok_or_else(|| self.corrupt("cannot read modification time".into()))?;

        tracing::debug!(path = %self.path, entries = entries.len(), "loaded cache");
        Ok(Some(CacheSnapshot { built_at, entries }))
    }

    /// Replace the cache document with `entries`.
    pub fn save(&self, entries: &CacheEntries) -> Result<()> {
        let mut json = serde_json::to_vec_pretty(entries)?;
        json.push(b'\n');
        io::write_atomic(&self.path, &json)?;
        tracing::info!(path = %self.path, entries = entries.len(), "wrote cache");
        Ok(())
    }

    /// Remove the cache document so the next scan starts cold.
    ///
    /// Returns whether a document was removed.
    pub fn invalidate(&self) -> Result<bool> {
        let removed = io::remove_if_exists(&self.path)?;
        if removed {
            tracing::info!(path = %self.path, "invalidated cache");
        }
        Ok(removed)
    }

    fn corrupt(&self, reason: String) -> ManagerError {
        ManagerError::CacheCorrupt {
            path: self.path.to_native(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn entry(value: serde_json::Value) -> ExtensionConfig {
        match value {
            serde_json::Value::Object(map) => ExtensionConfig::new(map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn missing_document_is_none() {
        let temp = TempDir::new().unwrap();
        let cache = ConfigCache::new(temp.path().join("cache/extensions.json"));
        assert!(cache.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let temp = TempDir::new().unwrap();
        let cache = ConfigCache::new(temp.path().join("cache/extensions.json"));
        let mut entries = CacheEntries::new();
        entries.insert(
            "feed".into(),
            entry(json!({ "name": "feed", "enabled": true, "private": { "limit": "5" } })),
        );

        cache.save(&entries).unwrap();
        let snapshot = cache.load().unwrap().unwrap();

        assert_eq!(snapshot.entries, entries);
        assert!(snapshot.built_at <= SystemTime::now());
    }

    #[test]
    fn document_is_pretty_and_keyed_by_name() {
        let temp = TempDir::new().unwrap();
        let cache = ConfigCache::new(temp.path().join("extensions.json"));
        let mut entries = CacheEntries::new();
        entries.insert("b".into(), entry(json!({ "name": "b" })));
        entries.insert("a".into(), entry(json!({ "name": "a" })));

        cache.save(&entries).unwrap();
        let text = std::fs::read_to_string(temp.path().join("extensions.json")).unwrap();

        assert!(text.starts_with("{\n  \"a\": {"));
        assert!(text.find("\"a\"").unwrap() < text.find("\"b\"").unwrap());
    }

    #[test]
    fn corrupt_document_is_fatal() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("extensions.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = ConfigCache::new(path.as_path()).load().unwrap_err();
        assert!(matches!(err, ManagerError::CacheCorrupt { .. }));
    }

    #[test]
    fn non_map_document_is_fatal() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("extensions.json");
        std::fs::write(&path, r#"{ "feed": "not a tree" }"#).unwrap();

        let err = ConfigCache::new(path.as_path()).load().unwrap_err();
        assert!(matches!(err, ManagerError::CacheCorrupt { .. }));
    }

    #[test]
    fn invalidate_removes_document() {
        let temp = TempDir::new().unwrap();
        let cache = ConfigCache::new(temp.path().join("extensions.json"));
        cache.save(&CacheEntries::new()).unwrap();

        assert!(cache.invalidate().unwrap());
        assert!(!cache.invalidate().unwrap());
        assert!(cache.load().unwrap().is_none());
    }
}
