//! Local override files (`<root>/<name>.ini`).
//!
//! Overrides are INI documents:
//!
//! ```ini
//! ; top-level keys
//! enabled = true
//! templates = "views"
//!
//! ; dotted keys nest, `[]` appends to a list
//! private.feed.limit = 20
//! helperEvents[] = onAddStatement
//!
//! [private]
//! title = "Recent changes"
//!
//! [modules : private]
//! extra = 1
//! ```
//!
//! Sections nest their keys under the section name; `[child : parent]`
//! starts the child from a copy of the parent section. Bare
//! `true`/`on`/`yes` read as `"1"` and `false`/`off`/`no`/`none`/`null` as
//! the empty string, so an override's `enabled` is always a string until
//! normalization.

use ext_fs::{NormalizedPath, io};
use serde_json::Value;

use crate::tree::ConfigMap;
use crate::{ConfigError, Result};

/// Malformed INI input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniError {
    pub line: usize,
    pub message: String,
}

/// Load the override at `path`.
///
/// Returns `Ok(None)` when the file is missing or unreadable.
pub fn load_override(path: &NormalizedPath) -> Result<Option<ConfigMap>> {
    let Some(text) = io::read_text_if_readable(path) else {
        return Ok(None);
    };
    let map = parse_ini(&text).map_err(|e| ConfigError::OverrideParse {
        path: path.to_native(),
        line: e.line,
        message: e.message,
    })?;
    tracing::debug!(path = %path, keys = map.len(), "loaded local override");
    Ok(Some(map))
}

/// Parse INI text into a configuration tree.
pub fn parse_ini(text: &str) -> std::result::Result<ConfigMap, IniError> {
    let mut root = ConfigMap::new();
    let mut section: Option<String> = None;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let Some(header) = header.strip_suffix(']') else {
                return Err(error(line_no, "unterminated section header"));
            };
            let (name, parent) = match header.split_once(':') {
                Some((name, parent)) => (name.trim(), Some(parent.trim())),
                None => (header.trim(), None),
            };
            if name.is_empty() {
                return Err(error(line_no, "empty section name"));
            }
            let initial = match parent {
                Some(parent) => match root.get(parent) {
                    Some(Value::Object(data)) => data.clone(),
                    _ => {
                        return Err(error(
                            line_no,
                            format!("parent section '{parent}' is not defined"),
                        ));
                    }
                },
                None => match root.get(name) {
                    Some(Value::Object(data)) => data.clone(),
                    _ => ConfigMap::new(),
                },
            };
            root.insert(name.to_string(), Value::Object(initial));
            section = Some(name.to_string());
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(error(line_no, "expected 'key = value'"));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(error(line_no, "empty key"));
        }
        let value = parse_value(value.trim());

        let target = match &section {
            Some(name) => match root.get_mut(name) {
                Some(Value::Object(data)) => data,
                _ => return Err(error(line_no, format!("section '{name}' is not a map"))),
            },
            None => &mut root,
        };
        assign(target, key, value).map_err(|message| error(line_no, message))?;
    }

    Ok(root)
}

fn error(line: usize, message: impl Into<String>) -> IniError {
    IniError {
        line,
        message: message.into(),
    }
}

fn parse_value(raw: &str) -> Value {
    for quote in ['"', '\''] {
        if let Some(rest) = raw.strip_prefix(quote) {
            let inner = rest.split_once(quote).map_or(rest, |(inner, _)| inner);
            return Value::String(inner.to_string());
        }
    }
    let bare = raw.split_once(';').map_or(raw, |(value, _)| value).trim();
    let value = match bare.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" => "1".to_string(),
        "false" | "off" | "no" | "none" | "null" => String::new(),
        _ => bare.to_string(),
    };
    Value::String(value)
}

/// Store `value` at a dotted `key`, creating intermediate maps.
fn assign(target: &mut ConfigMap, key: &str, value: Value) -> std::result::Result<(), String> {
    let (head, rest) = match key.split_once('.') {
        Some((head, rest)) => (head.trim(), Some(rest)),
        None => (key.trim(), None),
    };
    if head.is_empty() {
        return Err(format!("invalid key '{key}'"));
    }

    match rest {
        Some(rest) => {
            let child = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(ConfigMap::new()));
            match child {
                Value::Object(child) => assign(child, rest, value),
                _ => Err(format!(
                    "cannot create sub-key for '{head}' as key already exists"
                )),
            }
        }
        None => match head.strip_suffix("[]") {
            Some(list_key) => {
                let slot = target
                    .entry(list_key.to_string())
                    .or_insert_with(|| Value::Array(Vec::new()));
                match slot {
                    Value::Array(items) => {
                        items.push(value);
                        Ok(())
                    }
                    _ => Err(format!("'{list_key}' is not a list")),
                }
            }
            None => {
                target.insert(head.to_string(), value);
                Ok(())
            }
        },
    }
}
