//! Building manager options from command-line flags

use ext_manager::ManagerOptions;

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Resolve the options for this invocation.
///
/// An options file is the starting point if given; `--root`, `--cache` and
/// `--url-base` override its values. Without either a root is required.
pub fn resolve_options(cli: &Cli) -> Result<ManagerOptions> {
    let mut options = match (&cli.config, &cli.root) {
        (Some(path), Some(root)) => {
            let mut options = ManagerOptions::load(path)?;
            options.extensions_dir = root.clone();
            options
        }
        (Some(path), None) => ManagerOptions::load(path)?,
        (None, Some(root)) => ManagerOptions::new(root),
        (None, None) => {
            return Err(CliError::user(
                "no extension root given (use --root, EXTMGR_ROOT or --config)",
            ));
        }
    };

    if let Some(cache) = &cli.cache {
        options = options.with_cache_file(cache);
    }
    if let Some(base) = &cli.url_base {
        options = options.with_component_url_base(base);
    }

    tracing::debug!(
        root = %options.extensions_dir.display(),
        cache = %options.cache_file.display(),
        "resolved options"
    );
    Ok(options)
}
