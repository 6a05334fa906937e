//! Command implementations for extmgr
//!
//! Each command builds its own manager from the resolved options.

pub mod hooks;
pub mod inspect;
pub mod scan;

pub use hooks::run_hooks;
pub use inspect::{run_list, run_paths, run_private, run_show};
pub use scan::run_scan;

use serde::Serialize;

use crate::error::Result;

/// Print `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
