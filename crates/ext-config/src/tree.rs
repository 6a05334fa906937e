//! Configuration trees and the extension descriptor.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A nested key-value configuration tree.
///
/// Keys are ordered, so serializing the same tree always yields the same
/// bytes.
pub type ConfigMap = serde_json::Map<String, Value>;

/// Module registry context used when a module declares none.
pub const DEFAULT_MODULE_CONTEXT: &str = "main.sidewindows";

/// Merge `overlay` into `base`.
///
/// Nested maps merge recursively; any other overlay value (scalars and
/// lists alike) replaces the base value. Keys missing from `overlay` are
/// left untouched.
pub fn deep_merge(base: &mut ConfigMap, overlay: &ConfigMap) {
    for (key, value) in overlay {
        match (base.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                deep_merge(existing, incoming);
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

/// The fully merged configuration of one extension.
///
/// Serializes as its plain tree so cache documents stay free of any
/// graph-specific types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtensionConfig(ConfigMap);

impl ExtensionConfig {
    pub fn new(map: ConfigMap) -> Self {
        Self(map)
    }

    pub fn as_map(&self) -> &ConfigMap {
        &self.0
    }

    pub fn into_map(self) -> ConfigMap {
        self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value of `key`, if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn enabled(&self) -> bool {
        self.0.get("enabled").and_then(Value::as_bool).unwrap_or(false)
    }

    /// Absolute extension directory, ending in `/`.
    pub fn path(&self) -> Option<&str> {
        self.get_str("path")
    }

    pub fn templates(&self) -> Option<&str> {
        self.get_str("templates")
    }

    pub fn languages(&self) -> Option<&str> {
        self.get_str("languages")
    }

    pub fn helpers(&self) -> Option<&str> {
        self.get_str("helpers")
    }

    pub fn private(&self) -> Option<&ConfigMap> {
        self.0.get("private").and_then(Value::as_object)
    }

    pub fn modules(&self) -> Option<&ConfigMap> {
        self.0.get("modules").and_then(Value::as_object)
    }

    pub fn module(&self, name: &str) -> Option<&ConfigMap> {
        self.modules()
            .and_then(|modules| modules.get(name))
            .and_then(Value::as_object)
    }

    /// Events the extension's helper is bound to.
    pub fn helper_events(&self) -> Vec<String> {
        string_list(self.0.get("helperEvents"))
    }

    /// Events the extension's plugins listen for.
    pub fn events(&self) -> Vec<String> {
        string_list(self.0.get("events"))
    }

    /// Module registry contexts: `context` (string or list), else
    /// `contexts`, else [`DEFAULT_MODULE_CONTEXT`].
    pub fn contexts(&self) -> Vec<String> {
        let declared = match self.0.get("context") {
            Some(value @ (Value::String(_) | Value::Array(_))) => string_list(Some(value)),
            _ => string_list(self.0.get("contexts")),
        };
        if declared.is_empty() {
            vec![DEFAULT_MODULE_CONTEXT.to_string()]
        } else {
            declared
        }
    }

    /// The configuration as seen by one of the extension's modules.
    ///
    /// Modules share the extension's descriptor but may carry their own
    /// settings under `modules.<name>`. Those settings are merged into a fresh
    /// copy; the shared descriptor is never modified.
    pub fn for_module(&self, module: &str) -> Cow<'_, ExtensionConfig> {
        match self.module(module) {
            Some(settings) => {
                let mut merged = self.0.clone();
                deep_merge(&mut merged, settings);
                Cow::Owned(Self(merged))
            }
            None => Cow::Borrowed(self),
        }
    }
}

impl From<ConfigMap> for ExtensionConfig {
    fn from(map: ConfigMap) -> Self {
        Self(map)
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn map(value: Value) -> ConfigMap {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn deep_merge_recurses_into_maps_and_replaces_scalars() {
        let mut base = map(json!({
            "enabled": false,
            "private": { "limit": "10", "title": "Feed" },
            "helperEvents": ["a", "b"]
        }));
        let overlay = map(json!({
            "enabled": "1",
            "private": { "limit": "20" },
            "helperEvents": ["c"]
        }));

        deep_merge(&mut base, &overlay);

        assert_eq!(
            Value::Object(base),
            json!({
                "enabled": "1",
                "private": { "limit": "20", "title": "Feed" },
                "helperEvents": ["c"]
            })
        );
    }

    #[test]
    fn for_module_copies_before_merging() {
        let config = ExtensionConfig::new(map(json!({
            "name": "navigation",
            "caching": true,
            "modules": { "tree": { "caching": false, "priority": "10" } }
        })));

        let view = config.for_module("tree");
        assert!(matches!(view, Cow::Owned(_)));
        assert_eq!(view.get("caching"), Some(&json!(false)));
        assert_eq!(view.get_str("priority"), Some("10"));

        // the shared descriptor is untouched
        assert_eq!(config.get("caching"), Some(&json!(true)));
        assert!(config.get("priority").is_none());
    }

    #[test]
    fn for_module_without_settings_borrows() {
        let config = ExtensionConfig::new(map(json!({ "name": "navigation" })));
        assert!(matches!(config.for_module("tree"), Cow::Borrowed(_)));
    }

    #[test]
    fn contexts_fall_back_in_order() {
        let single = ExtensionConfig::new(map(json!({ "context": "main.window" })));
        assert_eq!(single.contexts(), vec!["main.window"]);

        let listed = ExtensionConfig::new(map(json!({ "contexts": ["a", "b"] })));
        assert_eq!(listed.contexts(), vec!["a", "b"]);

        let none = ExtensionConfig::default();
        assert_eq!(none.contexts(), vec![DEFAULT_MODULE_CONTEXT]);
    }

    #[test]
    fn serializes_as_plain_tree() {
        let config = ExtensionConfig::new(map(json!({ "name": "history", "enabled": true })));
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(text, r#"{"enabled":true,"name":"history"}"#);
    }
}
