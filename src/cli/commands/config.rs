//! `swx config` command - Configuration inspection
//!
//! Configuration is read-only from the CLI; edit the YAML files directly.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::Path;

use crate::cli::helpers::load_config;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration values
    Show {
        /// Show only this key's value
        key: Option<String>,
    },

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("base_url", "Upstream API root (env: SWX_BASE_URL)"),
    ("people_path", "Character listing path below base_url"),
    ("max_pages", "Listing pages fetched per refresh (env: SWX_MAX_PAGES)"),
    ("timeout_secs", "Per-request timeout (env: SWX_TIMEOUT_SECS)"),
    ("max_concurrent_fetches", "Concurrent name lookups"),
    ("cache_path", "SQLite cache file (env: SWX_CACHE_PATH)"),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show { key } => run_show(key.as_deref(), global),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(key: Option<&str>, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;

    if let Some(key) = key {
        return match config.get(key) {
            Some(v) => {
                println!("{}", v);
                Ok(())
            }
            None => Err(miette::miette!(
                help = "Run 'swx config keys' to list valid keys",
                "Unknown configuration key '{}'",
                key
            )),
        };
    }

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&config).into_diagnostic()?);
        }
        _ => {
            println!("{}", style("Effective Configuration").bold().underlined());
            println!();
            for (key, _) in VALID_KEYS {
                if let Some(value) = config.get(key) {
                    println!("  {}: {}", style(key).cyan(), style(value).yellow());
                }
            }

            println!();
            println!("{}", style("Config Sources (in priority order):").dim());
            println!("  1. Command-line flags (--cache, --base-url)");
            println!("  2. Environment variables (SWX_BASE_URL, SWX_CACHE_PATH, ...)");
            println!("  3. Project config (.swx/config.yaml)");
            println!("  4. Global config (~/.config/swx/config.yaml)");
        }
    }

    Ok(())
}

fn run_path() -> Result<()> {
    println!("{}", style("Configuration file paths:").bold());
    println!();

    match Config::global_config_path() {
        Some(path) => print_path("Global:", &path),
        None => println!(
            "  {} {}",
            style("Global:").cyan(),
            style("(no home directory)").dim()
        ),
    }
    println!();
    print_path("Project:", &Config::project_config_path());

    Ok(())
}

fn print_path(label: &str, path: &Path) {
    println!("  {} {}", style(label).cyan(), path.display());
    if path.exists() {
        println!("          {}", style("(exists)").green());
    } else {
        println!("          {}", style("(not created)").dim());
    }
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, description) in VALID_KEYS {
        println!("  {:<24} {}", style(key).cyan(), style(description).dim());
    }

    Ok(())
}
