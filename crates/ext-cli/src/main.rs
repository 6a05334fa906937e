//! Extension manager CLI
//!
//! Scans an extension root, keeps the resolved-configuration cache current
//! and prints what the registry knows.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: failed to set up logging: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");

    let options = context::resolve_options(&cli)?;
    match cli.command {
        Commands::Scan { force, json } => commands::run_scan(options, force, json),
        Commands::List { enabled, json } => commands::run_list(options, enabled, json),
        Commands::Show { name, module } => commands::run_show(options, &name, module.as_deref()),
        Commands::Private { name } => commands::run_private(options, &name),
        Commands::Paths { name, json } => commands::run_paths(options, &name, json),
        Commands::Hooks { shutdown, json } => commands::run_hooks(options, shutdown, json),
    }
}
