//! Integration tests for the swx CLI
//!
//! These tests exercise the CLI end-to-end using assert_cmd. None of them
//! reach the network: upstream calls are pointed at a closed local port.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get an swx command isolated from the user's config and env
fn swx(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("swx").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("XDG_CACHE_HOME", home.path().join(".cache"))
        .env_remove("SWX_BASE_URL")
        .env_remove("SWX_CACHE_PATH")
        .env_remove("SWX_MAX_PAGES")
        .env_remove("SWX_TIMEOUT_SECS")
        .env_remove("SWX_LOG")
        .env_remove("RUST_LOG");
    cmd
}

fn cache_arg(home: &TempDir) -> String {
    home.path().join("cache.db").display().to_string()
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    swx(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("SWAPI"))
        .stdout(predicate::str::contains("characters"))
        .stdout(predicate::str::contains("resolve"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    swx(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("swx"));
}

#[test]
fn test_unknown_command_fails() {
    let tmp = TempDir::new().unwrap();
    swx(&tmp).arg("planets").assert().failure();
}

#[test]
fn test_invalid_sort_field_fails() {
    let tmp = TempDir::new().unwrap();
    swx(&tmp)
        .args(["characters", "--sort-by", "age"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("age"));
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_keys_lists_all_keys() {
    let tmp = TempDir::new().unwrap();
    swx(&tmp)
        .args(["config", "keys"])
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url"))
        .stdout(predicate::str::contains("max_pages"))
        .stdout(predicate::str::contains("cache_path"));
}

#[test]
fn test_config_show_default_value() {
    let tmp = TempDir::new().unwrap();
    swx(&tmp)
        .args(["config", "show", "max_pages"])
        .assert()
        .success()
        .stdout("10\n");
}

#[test]
fn test_config_show_unknown_key_fails() {
    let tmp = TempDir::new().unwrap();
    swx(&tmp)
        .args(["config", "show", "colour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("colour"));
}

#[test]
fn test_project_config_overrides_default() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join(".swx")).unwrap();
    fs::write(tmp.path().join(".swx/config.yaml"), "max_pages: 3\n").unwrap();

    swx(&tmp)
        .args(["config", "show", "max_pages"])
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn test_env_overrides_project_config() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join(".swx")).unwrap();
    fs::write(
        tmp.path().join(".swx/config.yaml"),
        "base_url: http://from-file/api\n",
    )
    .unwrap();

    swx(&tmp)
        .env("SWX_BASE_URL", "http://from-env/api")
        .args(["config", "show", "base_url"])
        .assert()
        .success()
        .stdout("http://from-env/api\n");
}

#[test]
fn test_bad_project_config_is_reported() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join(".swx")).unwrap();
    fs::write(tmp.path().join(".swx/config.yaml"), "colour: red\n").unwrap();

    swx(&tmp)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config"));
}

#[test]
fn test_config_show_json() {
    let tmp = TempDir::new().unwrap();
    swx(&tmp)
        .args(["config", "show", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"people_path\": \"people/\""));
}

// ============================================================================
// Cache Tests
// ============================================================================

#[test]
fn test_cache_status_on_fresh_cache() {
    let tmp = TempDir::new().unwrap();
    swx(&tmp)
        .args(["--cache", &cache_arg(&tmp), "cache", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Characters:"))
        .stdout(predicate::str::contains("never"));

    assert!(tmp.path().join("cache.db").exists());
}

#[test]
fn test_cache_query_reads_tables() {
    let tmp = TempDir::new().unwrap();
    swx(&tmp)
        .args([
            "--cache",
            &cache_arg(&tmp),
            "cache",
            "query",
            "SELECT COUNT(*) AS n FROM characters",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("n\n0"));
}

#[test]
fn test_cache_query_rejects_writes() {
    let tmp = TempDir::new().unwrap();
    swx(&tmp)
        .args([
            "--cache",
            &cache_arg(&tmp),
            "cache",
            "query",
            "DELETE FROM reference_names",
        ])
        .assert()
        .failure();
}

#[test]
fn test_cache_clear_without_cache() {
    let tmp = TempDir::new().unwrap();
    swx(&tmp)
        .args(["--cache", &cache_arg(&tmp), "cache", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No cache to clear"));
}

#[test]
fn test_cache_clear_existing_cache() {
    let tmp = TempDir::new().unwrap();
    swx(&tmp)
        .args(["--cache", &cache_arg(&tmp), "cache", "status"])
        .assert()
        .success();
    swx(&tmp)
        .args(["--cache", &cache_arg(&tmp), "cache", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache cleared"));
}

// ============================================================================
// Upstream Failure Tests
// ============================================================================

#[test]
fn test_characters_unreachable_upstream() {
    let tmp = TempDir::new().unwrap();
    swx(&tmp)
        .args([
            "--cache",
            &cache_arg(&tmp),
            "--base-url",
            "http://127.0.0.1:9/api",
            "characters",
        ])
        .env("SWX_TIMEOUT_SECS", "2")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unable to reach SWAPI"));
}

#[test]
fn test_resolve_with_no_urls_is_empty() {
    let tmp = TempDir::new().unwrap();
    swx(&tmp)
        .args(["resolve", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"film_titles\": []"));
}

#[test]
fn test_resolve_unreachable_upstream_is_best_effort() {
    let tmp = TempDir::new().unwrap();
    swx(&tmp)
        .args([
            "--cache",
            &cache_arg(&tmp),
            "--base-url",
            "http://127.0.0.1:9/api",
            "resolve",
            "-f",
            "json",
            "--film",
            "http://127.0.0.1:9/api/films/1/",
        ])
        .env("SWX_TIMEOUT_SECS", "2")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"film_titles\": []"));
}

// ============================================================================
// Completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    swx(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("swx"));
}
