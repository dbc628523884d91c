//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    cache::CacheCommands, characters::CharactersArgs, completions::CompletionsArgs,
    config::ConfigCommands, resolve::ResolveArgs,
};

#[derive(Parser)]
#[command(name = "swx")]
#[command(author, version, about = "Star Wars Data Explorer")]
#[command(long_about = "A caching client for the SWAPI character listing: normalizes characters and resolves the planets, films, species, starships and vehicles they reference.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Cache database path (overrides config)
    #[arg(long, global = true, env = "SWX_CACHE_PATH")]
    pub cache: Option<PathBuf>,

    /// Upstream API root (overrides config)
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List characters, from cache or freshly fetched
    Characters(CharactersArgs),

    /// Resolve reference URLs to display names
    Resolve(ResolveArgs),

    /// Inspect or reset the local cache
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Show configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table for terminals
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just names, one per line
    Id,
}
