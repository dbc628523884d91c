//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::yaml::diagnostics::{YamlError, YamlSyntaxError};

/// Project-local configuration directory, relative to the working directory
pub const PROJECT_CONFIG_DIR: &str = ".swx";

/// SWX configuration with layered hierarchy
///
/// Every component receives the values it needs from this struct at
/// construction; nothing reads configuration from ambient state.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Upstream API root, e.g. `https://swapi.dev/api`
    pub base_url: String,

    /// Listing path below `base_url`
    pub people_path: String,

    /// Hard ceiling on listing pages fetched per refresh
    pub max_pages: usize,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Upper bound on in-flight name lookups
    pub max_concurrent_fetches: usize,

    /// SQLite cache file (default: user cache directory)
    pub cache_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://swapi.dev/api".to_string(),
            people_path: "people/".to_string(),
            max_pages: 10,
            timeout_secs: 10,
            max_concurrent_fetches: 16,
            cache_path: None,
        }
    }
}

/// A partially specified config file; unset keys leave lower layers alone
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigLayer {
    base_url: Option<String>,
    people_path: Option<String>,
    max_pages: Option<usize>,
    timeout_secs: Option<u64>,
    max_concurrent_fetches: Option<usize>,
    cache_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    ///
    /// A config file that exists but cannot be parsed is an error, reported
    /// with its source location.
    pub fn load() -> Result<Self, YamlError> {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/swx/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            config.merge_file(&global_path)?;
        }

        // 3. Project config (.swx/config.yaml)
        config.merge_file(&Self::project_config_path())?;

        // 4. Environment variables
        config.apply_env(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "swx")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Get the path to the project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(PROJECT_CONFIG_DIR).join("config.yaml")
    }

    fn default_cache_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "swx")
            .map(|dirs| dirs.cache_dir().join("cache.db"))
            .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_DIR).join("cache.db"))
    }

    /// Merge a YAML config file if it exists
    fn merge_file(&mut self, path: &Path) -> Result<(), YamlError> {
        if !path.exists() {
            return Ok(());
        }
        let contents = std::fs::read_to_string(path)?;
        self.merge_str(&contents, &path.display().to_string())
    }

    /// Merge YAML config text (other takes precedence)
    pub fn merge_str(&mut self, contents: &str, filename: &str) -> Result<(), YamlError> {
        if contents.trim().is_empty() {
            return Ok(());
        }
        let layer: ConfigLayer = serde_yml::from_str(contents)
            .map_err(|e| YamlSyntaxError::from_serde_error(&e, contents, filename))?;

        if let Some(v) = layer.base_url {
            self.base_url = v;
        }
        if let Some(v) = layer.people_path {
            self.people_path = v;
        }
        if let Some(v) = layer.max_pages {
            self.max_pages = v;
        }
        if let Some(v) = layer.timeout_secs {
            self.timeout_secs = v;
        }
        if let Some(v) = layer.max_concurrent_fetches {
            self.max_concurrent_fetches = v;
        }
        if layer.cache_path.is_some() {
            self.cache_path = layer.cache_path;
        }
        Ok(())
    }

    /// Apply `SWX_*` environment overrides; unparsable numbers are ignored
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("SWX_BASE_URL") {
            self.base_url = url;
        }
        if let Some(path) = var("SWX_CACHE_PATH") {
            self.cache_path = Some(PathBuf::from(path));
        }
        if let Some(pages) = var("SWX_MAX_PAGES").and_then(|v| v.parse().ok()) {
            self.max_pages = pages;
        }
        if let Some(secs) = var("SWX_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.timeout_secs = secs;
        }
    }

    /// Absolute listing URL the pagination walk starts from
    pub fn people_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.people_path.trim_start_matches('/')
        )
    }

    /// Cache file location, falling back to the user cache directory
    pub fn cache_path(&self) -> PathBuf {
        self.cache_path
            .clone()
            .unwrap_or_else(Self::default_cache_path)
    }

    /// Look up a single key for `swx config show <key>`
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "base_url" => Some(self.base_url.clone()),
            "people_path" => Some(self.people_path.clone()),
            "max_pages" => Some(self.max_pages.to_string()),
            "timeout_secs" => Some(self.timeout_secs.to_string()),
            "max_concurrent_fetches" => Some(self.max_concurrent_fetches.to_string()),
            "cache_path" => Some(self.cache_path().display().to_string()),
            _ => None,
        }
    }
}
