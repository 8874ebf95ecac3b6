//! Configuration loading and config file resolution
//!
//! Bootstrap configuration is a small TOML file. Every field has a built-in
//! default, so a missing file is never fatal. A present but malformed file is.
//!
//! Config file resolution order:
//! 1. `DMRIQC_CONFIG` environment variable (highest priority)
//! 2. User config directory (`~/.config/dmriqc/config.toml` on Linux)
//! 3. System config (`/etc/dmriqc/config.toml`, Linux only)
//! 4. None: compiled defaults

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "DMRIQC_CONFIG";

/// Default group-QC aggregator executable
pub const DEFAULT_AGGREGATOR_BINARY: &str = "eddy_squad";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// External aggregator configuration (optional)
    #[serde(default)]
    pub aggregator: AggregatorConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// External group-QC aggregator settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AggregatorConfig {
    /// Executable name (looked up in PATH) or absolute path
    #[serde(default = "default_aggregator_binary")]
    pub binary: String,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            binary: default_aggregator_binary(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_aggregator_binary() -> String {
    DEFAULT_AGGREGATOR_BINARY.to_string()
}

/// Locate the config file to load, if any
///
/// An explicit `DMRIQC_CONFIG` path is returned even when it does not exist,
/// so that [`load_config`] can report it instead of silently using defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    let user_config = dirs::config_dir().map(|d| d.join("dmriqc").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/dmriqc/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound(format!("Config file not found: {}", path.display()))
        } else {
            Error::Config(format!("Read TOML failed: {} ({})", path.display(), e))
        }
    })?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed: {} ({})", path.display(), e)))
}

/// Resolve and load bootstrap configuration
///
/// Missing files fall back to compiled defaults with a warning. Parse errors
/// are returned.
pub fn load_config() -> Result<TomlConfig> {
    let Some(path) = resolve_config_path() else {
        info!("No config file found, using compiled defaults");
        return Ok(TomlConfig::default());
    };

    match load_toml_config(&path) {
        Ok(config) => {
            info!(config = %path.display(), "Loaded configuration");
            Ok(config)
        }
        Err(Error::NotFound(msg)) => {
            warn!("{}; using compiled defaults", msg);
            Ok(TomlConfig::default())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(config, TomlConfig::default());
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_none());
        assert_eq!(config.aggregator.binary, "eddy_squad");
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config: TomlConfig = toml::from_str(
            r#"
            [aggregator]
            binary = "/opt/fsl/bin/eddy_squad"

            [logging]
            file = "/tmp/squad.log"
            "#,
        )
        .unwrap();

        assert_eq!(config.aggregator.binary, "/opt/fsl/bin/eddy_squad");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, Some(PathBuf::from("/tmp/squad.log")));
    }
}
