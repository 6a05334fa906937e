//! File reads and locked atomic writes used by the cache and loaders

use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::Write;

use crate::{Error, NormalizedPath, Result};

/// Replace `path` with `content` so readers see the old or the new bytes,
/// never a mix.
///
/// Missing parent directories are created. The bytes go to a
/// per-process `.<name>.<pid>.tmp` sibling, held under an exclusive `fs2`
/// lock until synced, then renamed over the target.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // same directory, so the rename cannot cross filesystems
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name().unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    fs::rename(&temp_path, &native_path).map_err(|e| Error::io(&native_path, e))?;

    tracing::debug!(path = %path, bytes = content.len(), "wrote file atomically");
    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read text content, treating a missing or unreadable file as absent.
pub fn read_text_if_readable(path: &NormalizedPath) -> Option<String> {
    match fs::read_to_string(path.to_native()) {
        Ok(content) => Some(content),
        Err(e) => {
            tracing::debug!(path = %path, error = %e, "file not readable");
            None
        }
    }
}

/// Remove a file; a file that is already gone is not an error.
pub fn remove_if_exists(path: &NormalizedPath) -> Result<bool> {
    let native_path = path.to_native();
    match fs::remove_file(&native_path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(&native_path, e)),
    }
}

/// Whether `path` is a file that can be opened for reading.
pub fn is_readable(path: &NormalizedPath) -> bool {
    path.is_file() && fs::File::open(path.to_native()).is_ok()
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// List a directory, sorted by name.
///
/// Entries whose names are not valid UTF-8 are skipped.
pub fn list_dir(dir: &NormalizedPath) -> Result<Vec<DirEntry>> {
    let native = dir.to_native();
    let mut entries = Vec::new();
    for entry in fs::read_dir(&native).map_err(|e| Error::io(&native, e))? {
        let entry = entry.map_err(|e| Error::io(&native, e))?;
        let Ok(name) = entry.file_name().into_string() else {
            tracing::debug!(dir = %dir, "skipping non UTF-8 entry");
            continue;
        };
        let is_dir = entry.path().is_dir();
        entries.push(DirEntry { name, is_dir });
    }
    entries.sort();
    Ok(entries)
}
