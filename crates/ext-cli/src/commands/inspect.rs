//! Read-only lookups: list, show, private, paths

use colored::Colorize;
use ext_manager::{ExtensionManager, ManagerOptions};
use serde::Serialize;

use super::print_json;
use crate::error::{CliError, Result};

#[derive(Debug, Serialize)]
struct ListEntry<'a> {
    name: &'a str,
    enabled: bool,
    component: bool,
}

/// Run the list command
pub fn run_list(options: ManagerOptions, enabled_only: bool, json: bool) -> Result<()> {
    let manager = ExtensionManager::new(options)?;
    let entries: Vec<ListEntry<'_>> = manager
        .extensions()
        .iter()
        .filter(|(_, config)| !enabled_only || config.enabled())
        .map(|(name, config)| ListEntry {
            name,
            enabled: config.enabled(),
            component: manager.is_component_registered(name),
        })
        .collect();

    if json {
        return print_json(&entries);
    }

    println!("{}", "Extensions".bold());
    println!();
    if entries.is_empty() {
        println!("  {}", "None".dimmed());
    }
    for entry in &entries {
        let marker = if entry.enabled {
            "+".green()
        } else {
            "-".dimmed()
        };
        let kind = if entry.component { " (component)" } else { "" };
        println!("  {} {}{}", marker, entry.name.cyan(), kind.dimmed());
    }
    println!();
    println!("{} registered", entries.len());
    Ok(())
}

/// Run the show command
pub fn run_show(options: ManagerOptions, name: &str, module: Option<&str>) -> Result<()> {
    let manager = ExtensionManager::new(options)?;
    let config = manager
        .extension_config(name)
        .ok_or_else(|| CliError::user(format!("extension '{name}' is not registered")))?;

    match module {
        Some(module) => print_json(&*config.for_module(module)),
        None => print_json(config),
    }
}

/// Run the private command
pub fn run_private(options: ManagerOptions, name: &str) -> Result<()> {
    let manager = ExtensionManager::new(options)?;
    print_json(&manager.private_config(name)?)
}

#[derive(Debug, Serialize)]
struct Paths {
    directory: String,
    templates: String,
    helpers: Option<String>,
    url: String,
}

/// Run the paths command
pub fn run_paths(options: ManagerOptions, name: &str, json: bool) -> Result<()> {
    let manager = ExtensionManager::new(options)?;
    let paths = Paths {
        directory: manager.extension_path(Some(name)),
        templates: manager.component_template_path(name)?,
        helpers: manager.component_helper_path(name)?,
        url: manager.component_url(name)?,
    };

    if json {
        return print_json(&paths);
    }

    println!("{}", name.bold());
    println!();
    println!("{}: {}", "Directory".dimmed(), paths.directory);
    println!("{}: {}", "Templates".dimmed(), paths.templates);
    match &paths.helpers {
        Some(helpers) => println!("{}:   {}", "Helpers".dimmed(), helpers),
        None => println!("{}:   {}", "Helpers".dimmed(), "none".dimmed()),
    }
    println!("{}:       {}", "URL".dimmed(), paths.url.cyan());
    Ok(())
}
