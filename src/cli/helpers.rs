//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use miette::{IntoDiagnostic, Result};

use crate::cli::GlobalOpts;
use crate::core::Config;

/// Load layered configuration and apply command-line overrides
pub fn load_config(global: &GlobalOpts) -> Result<Config> {
    let mut config = Config::load()?;
    apply_overrides(&mut config, global);
    Ok(config)
}

/// Command-line flags take precedence over every file and env layer
fn apply_overrides(config: &mut Config, global: &GlobalOpts) {
    if let Some(ref cache) = global.cache {
        config.cache_path = Some(cache.clone());
    }
    if let Some(ref base_url) = global.base_url {
        config.base_url = base_url.clone();
    }
}

/// Runtime for the async core; commands block on a single request
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .into_diagnostic()
}

/// Format an optional number for display, empty when absent
pub fn format_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Join display names for a single table cell
pub fn join_names(names: &[String]) -> String {
    names.join("; ")
}

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
