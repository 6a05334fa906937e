//! Descriptor normalization applied after the override merge.

use serde_json::Value;

use crate::tree::ConfigMap;

/// Keys holding path fragments relative to the extension directory.
pub const PATH_KEYS: [&str; 3] = ["templates", "languages", "helpers"];

/// Legacy string spellings of an enabled flag.
pub fn legacy_enabled(value: &str) -> bool {
    matches!(value, "1" | "enabled" | "true" | "on")
}

/// Coerce a raw `enabled` value into a boolean.
///
/// Booleans pass through, strings use [`legacy_enabled`], anything else
/// (including a missing key) is false.
pub fn coerce_enabled(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(s)) => legacy_enabled(s),
        _ => false,
    }
}

/// Trim trailing separators and append exactly one `/`.
pub fn path_fragment(value: &str) -> String {
    format!("{}/", value.trim_end_matches(['/', '\\']))
}

/// Establish the descriptor invariants on a merged tree.
///
/// `dir` is the absolute extension directory with a trailing `/`.
pub fn finalize(config: &mut ConfigMap, name: &str, dir: &str) {
    if config.get("name").is_none_or(Value::is_null) {
        config.insert("name".into(), Value::String(name.to_string()));
    }

    let enabled = coerce_enabled(config.get("enabled"));
    config.insert("enabled".into(), Value::Bool(enabled));

    for key in PATH_KEYS {
        if let Some(Value::String(fragment)) = config.get_mut(key) {
            *fragment = path_fragment(fragment);
        }
    }

    config.insert("path".into(), Value::String(dir.to_string()));
}
