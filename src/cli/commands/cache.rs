//! `swx cache` command - Inspect and reset the local cache
//!
//! The cache is a local SQLite database that stores:
//! - The normalized, enriched character listing
//! - Reference URL -> display name mappings
//!
//! Names survive listing refreshes; only `swx cache clear` drops them.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::args::OutputFormat;
use crate::cli::helpers::load_config;
use crate::cli::GlobalOpts;
use crate::core::ReferenceCache;

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache statistics
    Status,

    /// List cached reference names
    Names,

    /// Execute SQL query against cache (read-only)
    Query {
        /// SQL query to execute
        sql: String,
    },

    /// Clear the cache completely
    Clear,
}

pub fn run(cmd: CacheCommands, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let cache_path = config.cache_path();

    match cmd {
        CacheCommands::Status => {
            let cache = ReferenceCache::open(&cache_path)?;
            run_status(&cache)
        }
        CacheCommands::Names => {
            let cache = ReferenceCache::open(&cache_path)?;
            run_names(&cache, global.format)
        }
        CacheCommands::Query { sql } => {
            let cache = ReferenceCache::open(&cache_path)?;
            run_query(&cache, &sql, global.format)
        }
        CacheCommands::Clear => {
            if !cache_path.exists() {
                println!("No cache to clear");
                return Ok(());
            }
            let mut cache = ReferenceCache::open(&cache_path)?;
            cache.clear()?;
            if !global.quiet {
                println!("{} Cache cleared", style("✓").green());
            }
            Ok(())
        }
    }
}

fn run_status(cache: &ReferenceCache) -> Result<()> {
    let stats = cache.statistics()?;

    println!("{}", style("Cache Status").bold());
    println!("{}", style("─".repeat(40)).dim());
    if let Some(path) = cache.path() {
        println!("  Location:        {}", path.display());
    }
    println!("  Characters:      {}", style(stats.total_characters).cyan());
    println!("  Resolved names:  {}", style(stats.total_names).cyan());
    println!(
        "  Database size:   {} KB",
        style(stats.db_size_bytes / 1024).cyan()
    );
    match stats.last_refresh {
        Some(at) => println!(
            "  Last refresh:    {}",
            at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        None => println!("  Last refresh:    {}", style("never").dim()),
    }

    Ok(())
}

fn run_names(cache: &ReferenceCache, format: OutputFormat) -> Result<()> {
    let names = cache.all_names()?;
    let rows: Vec<Vec<String>> = names.into_iter().map(|(url, name)| vec![url, name]).collect();
    print_rows(&["url".to_string(), "name".to_string()], &rows, format)
}

fn run_query(cache: &ReferenceCache, sql: &str, format: OutputFormat) -> Result<()> {
    let columns = cache.query_columns(sql)?;
    let rows = cache.query_raw(sql)?;
    print_rows(&columns, &rows, format)
}

fn print_rows(columns: &[String], rows: &[Vec<String>], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let objects: Vec<serde_json::Value> = rows
                .iter()
                .map(|row| {
                    let obj: serde_json::Map<String, serde_json::Value> = columns
                        .iter()
                        .zip(row)
                        .map(|(col, val)| (col.clone(), serde_json::Value::String(val.clone())))
                        .collect();
                    serde_json::Value::Object(obj)
                })
                .collect();
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&objects).into_diagnostic()?);
            } else {
                print!("{}", serde_yml::to_string(&objects).into_diagnostic()?);
            }
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer.write_record(columns).into_diagnostic()?;
            for row in rows {
                writer.write_record(row).into_diagnostic()?;
            }
            writer.flush().into_diagnostic()?;
        }
        OutputFormat::Id => {
            for row in rows {
                if let Some(first) = row.first() {
                    println!("{}", first);
                }
            }
        }
        _ => {
            // Default: TSV
            println!("{}", columns.join("\t"));
            for row in rows {
                println!("{}", row.join("\t"));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_clear_keeps_file_but_drops_rows() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("cache.db");

        let mut cache = ReferenceCache::open(&path).unwrap();
        cache
            .store_names(&[("https://swapi.dev/api/planets/1/".to_string(), "Tatooine".to_string())])
            .unwrap();
        cache.clear().unwrap();
        drop(cache);

        assert!(path.exists());
        let cache = ReferenceCache::open(&path).unwrap();
        assert!(cache.all_names().unwrap().is_empty());
    }

    #[test]
    fn test_query_against_names() {
        let mut cache = ReferenceCache::open_in_memory().unwrap();
        cache
            .store_names(&[("u1".to_string(), "Tatooine".to_string())])
            .unwrap();

        let sql = "SELECT url, name FROM reference_names";
        assert_eq!(cache.query_columns(sql).unwrap(), vec!["url", "name"]);
        assert_eq!(
            cache.query_raw(sql).unwrap(),
            vec![vec!["u1".to_string(), "Tatooine".to_string()]]
        );
    }
}
