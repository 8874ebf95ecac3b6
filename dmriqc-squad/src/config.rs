//! Configuration resolution for dmriqc-squad
//!
//! Aggregator binary priority: ENV → TOML → compiled default.

use dmriqc_common::config::{TomlConfig, DEFAULT_AGGREGATOR_BINARY};
use tracing::{info, warn};

/// Environment variable overriding the aggregator binary
pub const AGGREGATOR_ENV_VAR: &str = "DMRIQC_SQUAD_BINARY";

/// Resolve the aggregator executable to run
pub fn resolve_aggregator_binary(toml_config: &TomlConfig) -> String {
    let env_binary = std::env::var(AGGREGATOR_ENV_VAR)
        .ok()
        .filter(|b| is_valid_binary(b));
    let toml_binary = Some(toml_config.aggregator.binary.as_str())
        .filter(|b| is_valid_binary(b) && *b != DEFAULT_AGGREGATOR_BINARY);

    if let (Some(env), Some(toml)) = (&env_binary, toml_binary) {
        if env != toml {
            warn!(
                "Aggregator binary set in both environment ({}) and TOML ({}). Using environment.",
                env, toml
            );
        }
    }

    if let Some(binary) = env_binary {
        info!(binary = %binary, "Aggregator binary from environment variable");
        return binary.trim().to_string();
    }

    if let Some(binary) = toml_binary {
        info!(binary = %binary, "Aggregator binary from TOML config");
        return binary.trim().to_string();
    }

    DEFAULT_AGGREGATOR_BINARY.to_string()
}

/// Non-empty, non-whitespace
pub fn is_valid_binary(binary: &str) -> bool {
    !binary.trim().is_empty()
}
