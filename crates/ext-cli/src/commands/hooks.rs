//! Hooks command implementation
//!
//! Runs registration against a [`Recorder`] and prints what each
//! collaborator would have been handed.

use colored::Colorize;
use ext_manager::{ExtensionManager, ManagerOptions, Recorder, Registration};

use super::print_json;
use crate::error::Result;

/// Run the hooks command
pub fn run_hooks(options: ManagerOptions, shutdown: bool, json: bool) -> Result<()> {
    let recorder = Recorder::new();
    let mut manager = ExtensionManager::with_collaborators(options, recorder.collaborators())?;
    if shutdown {
        let initialized = manager.on_route_shutdown();
        tracing::debug!(initialized, "ran route shutdown");
    }
    let entries = recorder.take();

    if json {
        return print_json(&entries);
    }

    println!("{}", "Registrations".bold());
    println!();
    if entries.is_empty() {
        println!("  {}", "None".dimmed());
    }
    for entry in &entries {
        let marker = match entry {
            Registration::HelperLoaded { .. } | Registration::HelperInit { .. } => "*".yellow(),
            _ => "+".green(),
        };
        println!("  {} {}", marker, entry);
    }
    Ok(())
}
