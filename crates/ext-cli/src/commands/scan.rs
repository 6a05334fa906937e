//! Scan command implementation

use colored::Colorize;
use ext_manager::{ChangeKind, ConfigCache, ExtensionManager, ManagerOptions, ScanOutcome};

use super::print_json;
use crate::error::Result;

/// Run the scan command
pub fn run_scan(options: ManagerOptions, force: bool, json: bool) -> Result<()> {
    if force {
        ConfigCache::new(options.cache_file.as_path()).invalidate()?;
    }
    let manager = ExtensionManager::new(options)?;
    let outcome = manager.last_scan();

    if json {
        return print_json(outcome);
    }
    print_outcome(outcome, &manager.cache().path().to_string());
    Ok(())
}

fn print_outcome(outcome: &ScanOutcome, cache_path: &str) {
    println!("{}", "Scan".bold());
    println!();

    if outcome.changes.is_empty() {
        println!("  {} cache is up to date", "=".dimmed());
    }
    for (name, kind) in &outcome.changes {
        let marker = match kind {
            ChangeKind::Removed => "-".red(),
            _ if outcome.failures.contains_key(name) => "!".red(),
            _ => "~".yellow(),
        };
        println!("  {} {} ({})", marker, name.cyan(), kind.to_string().dimmed());
    }

    if !outcome.failures.is_empty() {
        println!();
        println!("{}:", "Failures".bold());
        for (name, reason) in &outcome.failures {
            println!("  {} {}: {}", "!".red(), name.cyan(), reason);
        }
    }

    if !outcome.anomalies.is_empty() {
        println!();
        println!("{}:", "Anomalies".bold());
        for (name, anomalies) in &outcome.anomalies {
            for anomaly in anomalies {
                println!("  {} {}: {}", "?".yellow(), name.cyan(), anomaly);
            }
        }
    }

    println!();
    let cache_state = if outcome.cache_written {
        "written".green()
    } else {
        "unchanged".dimmed()
    };
    println!(
        "{} extensions, cache {} ({})",
        outcome.extensions.len(),
        cache_state,
        cache_path
    );
}
