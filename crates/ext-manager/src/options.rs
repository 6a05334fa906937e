//! Manager options, loadable from a TOML file.
//!
//! ```toml
//! extensions_dir = "extensions"
//! cache_file = "cache/extensions.json"
//! component_url_base = "https://example.org/ontowiki/"
//!
//! [conventions]
//! file_extension = "wasm"
//! ```
//!
//! Relative paths are taken as-is, i.e. relative to the working directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ManagerError, Result};

/// Default location of the resolved-configuration cache.
pub const DEFAULT_CACHE_FILE: &str = "cache/extensions.json";

/// Where extensions live and how the manager treats them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerOptions {
    /// Root directory holding one subdirectory per extension.
    pub extensions_dir: PathBuf,

    #[serde(default = "default_cache_file")]
    pub cache_file: PathBuf,

    /// Prefix for component URLs; empty means relative URLs.
    #[serde(default)]
    pub component_url_base: String,

    #[serde(default)]
    pub conventions: FileConventions,
}

fn default_cache_file() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_FILE)
}

impl ManagerOptions {
    pub fn new(extensions_dir: impl Into<PathBuf>) -> Self {
        Self {
            extensions_dir: extensions_dir.into(),
            cache_file: default_cache_file(),
            component_url_base: String::new(),
            conventions: FileConventions::default(),
        }
    }

    /// Load options from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = ext_fs::io::read_text(&path.into())?;
        toml::from_str(&text).map_err(|e| ManagerError::Options {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn with_cache_file(mut self, cache_file: impl Into<PathBuf>) -> Self {
        self.cache_file = cache_file.into();
        self
    }

    pub fn with_component_url_base(mut self, base: impl Into<String>) -> Self {
        self.component_url_base = base.into();
        self
    }

    pub fn with_conventions(mut self, conventions: FileConventions) -> Self {
        self.conventions = conventions;
        self
    }
}

/// Kind of an extension file recognized by its suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentFile {
    Module,
    Plugin,
    Wrapper,
}

/// File naming rules for component artifacts inside an extension directory.
///
/// For an extension `history` with the defaults:
///
/// - controller: `HistoryController.wasm`
/// - helper: `HistoryHelper.wasm`, class `HistoryHelper`
/// - modules, plugins and wrappers: any `*Module.wasm`, `*Plugin.wasm`, `*Wrapper.wasm`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConventions {
    /// Extension of component files, without the dot. May be empty.
    pub file_extension: String,
    pub controller_suffix: String,
    pub helper_suffix: String,
    pub module_suffix: String,
    pub plugin_suffix: String,
    pub wrapper_suffix: String,
}

impl Default for FileConventions {
    fn default() -> Self {
        Self {
            file_extension: "wasm".into(),
            controller_suffix: "Controller".into(),
            helper_suffix: "Helper".into(),
            module_suffix: "Module".into(),
            plugin_suffix: "Plugin".into(),
            wrapper_suffix: "Wrapper".into(),
        }
    }
}

impl FileConventions {
    pub fn controller_file(&self, extension: &str) -> String {
        self.file_name(&format!("{}{}", ucfirst(extension), self.controller_suffix))
    }

    pub fn helper_file(&self, extension: &str) -> String {
        self.file_name(&self.helper_class(extension))
    }

    pub fn helper_class(&self, extension: &str) -> String {
        format!("{}{}", ucfirst(extension), self.helper_suffix)
    }

    /// Classify a directory entry and derive its registry key, which is the
    /// file name minus the suffix, lower-cased.
    pub fn classify(&self, file_name: &str) -> Option<(ComponentFile, String)> {
        let kinds = [
            (ComponentFile::Module, &self.module_suffix),
            (ComponentFile::Plugin, &self.plugin_suffix),
            (ComponentFile::Wrapper, &self.wrapper_suffix),
        ];
        kinds.into_iter().find_map(|(kind, suffix)| {
            let stem = file_name.strip_suffix(&self.file_name(suffix))?;
            (!stem.is_empty()).then(|| (kind, stem.to_lowercase()))
        })
    }

    fn file_name(&self, stem: &str) -> String {
        if self.file_extension.is_empty() {
            stem.to_string()
        } else {
            format!("{stem}.{}", self.file_extension)
        }
    }
}

/// Upper-case the first character.
fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn parses_minimal_options() {
        let options: ManagerOptions = toml::from_str(r#"extensions_dir = "extensions""#).unwrap();
        assert_eq!(options, ManagerOptions::new("extensions"));
        assert_eq!(options.cache_file, PathBuf::from("cache/extensions.json"));
    }

    #[test]
    fn parses_full_options() {
        let options: ManagerOptions = toml::from_str(
            r#"
extensions_dir = "/srv/extensions"
cache_file = "/var/cache/ext.json"
component_url_base = "https://example.org/"

[conventions]
file_extension = "so"
"#,
        )
        .unwrap();
        assert_eq!(options.cache_file, PathBuf::from("/var/cache/ext.json"));
        assert_eq!(options.conventions.file_extension, "so");
        assert_eq!(options.conventions.module_suffix, "Module");
    }

    #[test]
    fn missing_extensions_dir_is_rejected() {
        assert!(toml::from_str::<ManagerOptions>("cache_file = \"x\"").is_err());
    }

    #[test]
    fn derived_file_names() {
        let conventions = FileConventions::default();
        assert_eq!(conventions.controller_file("history"), "HistoryController.wasm");
        assert_eq!(conventions.helper_file("history"), "HistoryHelper.wasm");
        assert_eq!(conventions.helper_class("history"), "HistoryHelper");
    }

    #[rstest]
    #[case("RecentModule.wasm", Some((ComponentFile::Module, "recent")))]
    #[case("HistoryPlugin.wasm", Some((ComponentFile::Plugin, "history")))]
    #[case("LinkedDataWrapper.wasm", Some((ComponentFile::Wrapper, "linkeddata")))]
    #[case("HistoryController.wasm", None)]
    #[case("RecentModule.php", None)]
    #[case("doap.n3", None)]
    fn classifies_component_files(
        #[case] file_name: &str,
        #[case] expected: Option<(ComponentFile, &str)>,
    ) {
        let conventions = FileConventions::default();
        assert_eq!(
            conventions.classify(file_name),
            expected.map(|(kind, key)| (kind, key.to_string()))
        );
    }

    #[test]
    fn empty_file_extension() {
        let conventions = FileConventions {
            file_extension: String::new(),
            ..FileConventions::default()
        };
        assert_eq!(conventions.controller_file("feed"), "FeedController");
        assert_eq!(
            conventions.classify("FeedModule"),
            Some((ComponentFile::Module, "feed".to_string()))
        );
    }
}
