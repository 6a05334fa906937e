//! Modification-time probes.
//!
//! Staleness detection compares these against the cache build time. The
//! directory probe is coarse: any entry created, removed or
//! renamed in the directory bumps it, content edits of nested files don't.

use std::fs;
use std::time::{Duration, SystemTime};

use crate::{Error, NormalizedPath, Result};

/// Modification time of `path`, or `None` if it cannot be stat'ed.
pub fn modified_time(path: &NormalizedPath) -> Option<SystemTime> {
    fs::metadata(path.to_native())
        .and_then(|meta| meta.modified())
        .ok()
}

/// Last edit time of a directory as used for the whole-tree staleness gate.
///
/// Directory mtimes on Windows do not track child changes reliably, so there
/// the result is always in the future and every caller rescans.
pub fn directory_edit_time(dir: &NormalizedPath) -> Result<SystemTime> {
    if cfg!(windows) {
        return Ok(SystemTime::now() + Duration::from_secs(1));
    }
    let native = dir.to_native();
    fs::metadata(&native)
        .and_then(|meta| meta.modified())
        .map_err(|e| Error::io(&native, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_has_no_mtime() {
        let temp = TempDir::new().unwrap();
        let path = NormalizedPath::new(temp.path()).join("absent.ini");
        assert!(modified_time(&path).is_none());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = NormalizedPath::new(temp.path()).join("gone");
        if cfg!(windows) {
            assert!(directory_edit_time(&path).is_ok());
        } else {
            assert!(directory_edit_time(&path).unwrap_err().is_not_found());
        }
    }
}
