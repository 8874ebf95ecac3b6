//! Unit tests for configuration loading and graceful degradation
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate DMRIQC_CONFIG are marked with #[serial].

use dmriqc_common::config::{
    load_config, load_toml_config, resolve_config_path, TomlConfig, CONFIG_ENV_VAR,
};
use dmriqc_common::Error;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
#[serial]
fn test_env_var_config_path_has_priority() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("custom.toml");
    fs::write(&config_path, "[logging]\nlevel = \"debug\"\n").unwrap();

    env::set_var(CONFIG_ENV_VAR, &config_path);
    let resolved = resolve_config_path();
    let config = load_config().unwrap();
    env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(resolved, Some(config_path));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.aggregator.binary, "eddy_squad");
}

#[test]
#[serial]
fn test_missing_explicit_config_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("does-not-exist.toml");

    env::set_var(CONFIG_ENV_VAR, &missing);
    let config = load_config();
    env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(config.unwrap(), TomlConfig::default());
}

#[test]
#[serial]
fn test_malformed_config_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("broken.toml");
    fs::write(&config_path, "[logging\nlevel = ").unwrap();

    env::set_var(CONFIG_ENV_VAR, &config_path);
    let result = load_config();
    env::remove_var(CONFIG_ENV_VAR);

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_load_toml_config_missing_file_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let result = load_toml_config(&temp_dir.path().join("nope.toml"));
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[test]
fn test_unreadable_config_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = load_toml_config(temp_dir.path());
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_toml_round_trip_of_defaults() {
    let config = TomlConfig::default();
    let serialized = toml::to_string(&config).unwrap();
    let parsed: TomlConfig = toml::from_str(&serialized).unwrap();
    assert_eq!(parsed, config);
}
