//! [`TestExtensions`] builder for scanner and registry scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::TempDir;

use crate::Doap;

/// A temporary workspace holding an extension root and a cache location.
///
/// Layout:
///
/// ```text
/// <tmp>/extensions/<name>/doap.n3
/// <tmp>/extensions/<name>.ini
/// <tmp>/cache/extensions.json
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use ext_test_utils::{Doap, TestExtensions};
///
/// let tree = TestExtensions::new();
/// tree.add("history", &Doap::new("history").enabled(true));
/// tree.write_override("history", "enabled = false\n");
/// tree.age_all(std::time::Duration::from_secs(60));
/// ```
pub struct TestExtensions {
    temp_dir: TempDir,
}

impl Default for TestExtensions {
    fn default() -> Self {
        Self::new()
    }
}

impl TestExtensions {
    /// Create an empty extension root.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("extensions")).unwrap();
        Self { temp_dir }
    }

    pub fn base(&self) -> &Path {
        self.temp_dir.path()
    }

    /// `<tmp>/extensions`
    pub fn root(&self) -> PathBuf {
        self.base().join("extensions")
    }

    /// `<tmp>/cache/extensions.json`
    pub fn cache_path(&self) -> PathBuf {
        self.base().join("cache").join("extensions.json")
    }

    pub fn extension_dir(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    pub fn override_path(&self, name: &str) -> PathBuf {
        self.root().join(format!("{name}.ini"))
    }

    /// Write `<root>/<name>/doap.n3` from a builder.
    pub fn add(&self, name: &str, doap: &Doap) {
        self.add_raw(name, &doap.render());
    }

    /// Write `<root>/<name>/doap.n3` verbatim.
    pub fn add_raw(&self, name: &str, text: &str) {
        let dir = self.extension_dir(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("doap.n3"), text).unwrap();
    }

    pub fn write_override(&self, name: &str, text: &str) {
        fs::write(self.override_path(name), text).unwrap();
    }

    /// Write a file relative to the extension root.
    pub fn write_file(&self, relative: &str, content: &str) {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Create an empty directory relative to the extension root.
    pub fn create_dir(&self, relative: &str) {
        fs::create_dir_all(self.root().join(relative)).unwrap();
    }

    pub fn remove_extension(&self, name: &str) {
        fs::remove_dir_all(self.extension_dir(name)).unwrap();
    }

    /// Set the modification time of any file or directory.
    pub fn set_mtime(&self, path: &Path, time: SystemTime) {
        fs::File::open(path)
            .unwrap_or_else(|e| panic!("cannot open {}: {e}", path.display()))
            .set_modified(time)
            .unwrap_or_else(|e| panic!("cannot set mtime on {}: {e}", path.display()));
    }

    /// Move an extension's files `age` into the past: the graph document,
    /// the extension directory and the override if present.
    pub fn age_extension(&self, name: &str, age: Duration) {
        let time = SystemTime::now() - age;
        let dir = self.extension_dir(name);
        for entry in fs::read_dir(&dir).unwrap() {
            self.set_mtime(&entry.unwrap().path(), time);
        }
        self.set_mtime(&dir, time);
        let local = self.override_path(name);
        if local.exists() {
            self.set_mtime(&local, time);
        }
    }

    /// Age every extension, the root directory and the cache file.
    pub fn age_all(&self, age: Duration) {
        for entry in fs::read_dir(self.root()).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    self.age_extension(name, age);
                }
            }
        }
        self.age_root(age);
        self.age_cache(age);
    }

    pub fn age_root(&self, age: Duration) {
        self.set_mtime(&self.root(), SystemTime::now() - age);
    }

    pub fn age_cache(&self, age: Duration) {
        let cache = self.cache_path();
        if cache.exists() {
            self.set_mtime(&cache, SystemTime::now() - age);
        }
    }

    /// Set an override's mtime to now, and the root directory's too.
    pub fn touch_override(&self, name: &str) {
        let now = SystemTime::now();
        self.set_mtime(&self.override_path(name), now);
        self.set_mtime(&self.root(), now);
    }

    /// Set a graph document's mtime to now, and the root directory's too.
    pub fn touch_graph(&self, name: &str) {
        let now = SystemTime::now();
        self.set_mtime(&self.extension_dir(name).join("doap.n3"), now);
        self.set_mtime(&self.root(), now);
    }

    pub fn read_cache(&self) -> String {
        fs::read_to_string(self.cache_path()).unwrap()
    }

    /// Assert that `relative` (to the base) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_exists(&self, relative: &str) {
        let path = self.base().join(relative);
        assert!(path.exists(), "Expected path to exist: {}", path.display());
    }

    /// Assert that `relative` (to the base) does **not** exist.
    pub fn assert_not_exists(&self, relative: &str) {
        let path = self.base().join(relative);
        assert!(!path.exists(), "Expected path NOT to exist: {}", path.display());
    }
}
