// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation of configuration values.

use crate::model::SapaConfig;

/// A single configuration validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// Dotted path of the offending key, e.g. `router.confidence_threshold`.
    pub key: String,
    /// Human-readable description of what is wrong.
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

/// Validate value ranges that serde cannot express.
pub fn validate_config(config: &SapaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !(config.router.confidence_threshold > 0.0 && config.router.confidence_threshold <= 1.0) {
        errors.push(ConfigError {
            key: "router.confidence_threshold".to_string(),
            message: format!(
                "must be in (0.0, 1.0], got {}",
                config.router.confidence_threshold
            ),
        });
    }

    if config.router.escalation_window == 0 {
        errors.push(ConfigError {
            key: "router.escalation_window".to_string(),
            message: "must be at least 1".to_string(),
        });
    }

    if config.router.escalation_trigger == 0
        || config.router.escalation_trigger > config.router.escalation_window
    {
        errors.push(ConfigError {
            key: "router.escalation_trigger".to_string(),
            message: format!(
                "must be between 1 and escalation_window ({})",
                config.router.escalation_window
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError {
            key: "storage.database_path".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError {
            key: "agent.log_level".to_string(),
            message: format!(
                "must be one of {valid_levels:?}, got '{}'",
                config.agent.log_level
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Print validation errors to stderr, one per line.
pub fn render_errors(errors: &[ConfigError]) {
    for err in errors {
        eprintln!("sapa: config error: {err}");
    }
}
