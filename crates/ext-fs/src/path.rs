//! Slash-normalized paths for descriptor and cache strings

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A path normalized to use forward slashes internally.
///
/// Extension descriptors store paths as plain strings (they end up in the
/// JSON cache), so every path the manager derives goes through this type
/// and converts to a platform-native `PathBuf` only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Wrap `path`, turning every `\` into `/`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let normalized = path_str.replace('\\', "/");
        Self { inner: normalized }
    }

    /// Resolve `path` to an absolute, symlink-free path.
    ///
    /// Uses `dunce` so Windows paths do not come back in `\\?\` form.
    pub fn canonicalize(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let resolved = dunce::canonicalize(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::new(resolved))
    }

    /// The slash-normalized form.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Native form for the filesystem calls.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Append `segment` with a single separating `/`.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self { inner: joined }
    }

    /// The path as a directory string with exactly one trailing `/`.
    pub fn to_dir_string(&self) -> String {
        let trimmed = self.inner.trim_end_matches('/');
        format!("{trimmed}/")
    }

    /// Everything before the last non-trailing `/`; `/` for top-level
    /// entries, `None` for a bare name.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Last segment, ignoring a trailing `/`.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// True for a regular file; missing paths and directories are not.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_string_has_single_trailing_slash() {
        assert_eq!(NormalizedPath::new("/ext/history").to_dir_string(), "/ext/history/");
        assert_eq!(NormalizedPath::new("/ext/history//").to_dir_string(), "/ext/history/");
    }

    #[test]
    fn file_name_ignores_trailing_slash() {
        assert_eq!(NormalizedPath::new("/ext/history/").file_name(), Some("history"));
        assert_eq!(NormalizedPath::new("/").file_name(), None);
    }
}
