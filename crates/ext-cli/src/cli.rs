//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Extension manager - resolve, cache and inspect extension configuration
#[derive(Parser, Debug)]
#[command(name = "extmgr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Extension root directory
    #[arg(long, global = true, env = "EXTMGR_ROOT")]
    pub root: Option<PathBuf>,

    /// Cache document location
    #[arg(long, global = true, env = "EXTMGR_CACHE")]
    pub cache: Option<PathBuf>,

    /// Manager options file (TOML); --root and --cache override its values
    #[arg(long, global = true, env = "EXTMGR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL that component URLs are built from
    #[arg(long, global = true)]
    pub url_base: Option<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run a scan pass and report what changed
    Scan {
        /// Drop the cache first so every extension is reloaded
        #[arg(long)]
        force: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List registered extensions
    List {
        /// Only show enabled extensions
        #[arg(long)]
        enabled: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved configuration of an extension as JSON
    Show {
        /// Extension name
        name: String,

        /// Print the view a module sees instead of the shared descriptor
        #[arg(long)]
        module: Option<String>,
    },

    /// Print the private configuration of an extension as JSON
    Private {
        /// Extension name
        name: String,
    },

    /// Show the resolved paths and URL of an extension
    Paths {
        /// Extension name
        name: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show the registrations an engine would receive
    Hooks {
        /// Also run route shutdown so helpers are initialized
        #[arg(long)]
        shutdown: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_scan_force() {
        let cli = Cli::parse_from(["extmgr", "--root", "/srv/ext", "scan", "--force"]);
        assert_eq!(cli.root, Some(PathBuf::from("/srv/ext")));
        assert_eq!(
            cli.command,
            Commands::Scan {
                force: true,
                json: false
            }
        );
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["extmgr", "show", "feed", "--verbose", "--cache", "c.json"]);
        assert!(cli.verbose);
        assert_eq!(cli.cache, Some(PathBuf::from("c.json")));
        assert_eq!(
            cli.command,
            Commands::Show {
                name: "feed".into(),
                module: None
            }
        );
    }

    #[test]
    fn command_is_required() {
        assert!(Cli::try_parse_from(["extmgr"]).is_err());
    }

    #[test]
    fn show_requires_a_name() {
        assert!(Cli::try_parse_from(["extmgr", "show"]).is_err());
    }
}
