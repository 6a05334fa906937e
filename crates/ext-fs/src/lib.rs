//! Filesystem primitives for the extension manager
//!
//! Provides slash-normalized paths, atomic locked writes and
//! modification-time probes used for cache staleness checks.

pub mod error;
pub mod io;
pub mod mtime;
pub mod path;

pub use error::{Error, Result};
pub use mtime::{directory_edit_time, modified_time};
pub use path::NormalizedPath;
