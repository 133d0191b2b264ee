// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Sapa conversational router.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides.

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{
    AgentConfig, ClassifierConfig, GatewayConfig, RouterConfig, SapaConfig, StorageConfig,
};
pub use validation::{render_errors, ConfigError};

/// Load configuration from the XDG hierarchy and validate it.
///
/// The high-level entry point: loads config from TOML files + env vars via
/// Figment, then runs post-deserialization range validation.
pub fn load_and_validate() -> Result<SapaConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError {
            key: "<load>".to_string(),
            message: err.to_string(),
        }]),
    }
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<SapaConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError {
            key: "<inline>".to_string(),
            message: err.to_string(),
        }]),
    }
}
