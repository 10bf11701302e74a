//! Configuration system tests
//!
//! Tests for config paths and settings loading/merging.

use std::path::PathBuf;

use textman::cli::{CliArgs, StartupMode};
use textman::config_paths;
use textman::{Settings, TextEngine};

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_returns_some() {
    assert!(config_paths::config_dir().is_some());
}

#[test]
fn test_config_dir_contains_textman() {
    let dir = config_paths::config_dir().unwrap();
    assert!(dir.to_string_lossy().contains("textman"));
}

#[test]
fn test_config_file_ends_with_yaml() {
    let path = config_paths::config_file().unwrap();
    assert!(path.to_string_lossy().ends_with("config.yaml"));
    assert_eq!(Settings::default_file(), Some(path));
}

#[test]
fn test_logs_and_plugins_dirs_are_under_config_dir() {
    let dir = config_paths::config_dir().unwrap();
    assert!(config_paths::logs_dir().unwrap().starts_with(&dir));
    assert!(config_paths::plugins_dir().unwrap().starts_with(&dir));
}

// ========================================================================
// Settings layering
// ========================================================================

#[test]
fn test_file_then_env_then_cli() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(
        &path,
        "max_history: 10\nencoding: latin1\ndisabled_plugins: [format]\n",
    )
    .unwrap();

    let mut settings = Settings::load_from_file(&path).unwrap();
    assert_eq!(settings.max_history, 10);

    settings.apply_env(|key| match key {
        "TEXTMAN_MAX_HISTORY" => Some("20".to_string()),
        "TEXTMAN_ENCODING" => Some("utf-8".to_string()),
        _ => None,
    });
    assert_eq!(settings.max_history, 20);
    assert_eq!(settings.encoding, "utf-8");

    let cli = CliArgs {
        log_level: "info".to_string(),
        max_history: Some(30),
        ..CliArgs::default()
    };
    let config = cli.into_config(settings).unwrap();
    assert_eq!(config.settings.max_history, 30);
    assert_eq!(config.settings.disabled_plugins, vec!["format"]);
    assert_eq!(config.mode, StartupMode::Interactive);

    let engine = TextEngine::from_settings(&config.settings);
    assert_eq!(engine.history().max_size(), 30);
    assert_eq!(engine.registry().is_enabled("format"), Some(false));
}

#[test]
fn test_json_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{"plugin_search_paths": ["/srv/plugins"], "load_builtin_plugins": false}"#,
    )
    .unwrap();

    let settings = Settings::load_from_file(&path).unwrap();
    assert_eq!(settings.plugin_search_paths, vec![PathBuf::from("/srv/plugins")]);
    assert!(!settings.load_builtin_plugins);
    assert_eq!(settings.max_history, 50);
}
