// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Sapa conversational router.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Sapa configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SapaConfig {
    /// Agent identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Intent classifier settings.
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Confidence gate and escalation settings.
    #[serde(default)]
    pub router: RouterConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Agent identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the assistant, used in greetings and the help menu.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "sapa".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL journal mode.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: true,
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|d| d.join("sapa/sapa.db").display().to_string())
        .unwrap_or_else(|| "sapa.db".to_string())
}

fn default_true() -> bool {
    true
}

/// Intent classifier configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Path where the trained model is persisted. `None` disables
    /// persistence; the model is rebuilt from the corpus on every start.
    #[serde(default = "default_model_path")]
    pub model_path: Option<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
        }
    }
}

fn default_model_path() -> Option<String> {
    dirs::data_dir().map(|d| d.join("sapa/model.json").display().to_string())
}

/// Confidence gate and escalation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// Classifications at or above this confidence are trusted and dispatched.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// How many recent turns the escalation window examines.
    #[serde(default = "default_escalation_window")]
    pub escalation_window: usize,

    /// How many low-confidence turns within the window trigger the
    /// contact-a-human offer.
    #[serde(default = "default_escalation_trigger")]
    pub escalation_trigger: usize,

    /// Phone number offered in the escalation reply.
    #[serde(default)]
    pub contact_phone: Option<String>,

    /// Email address offered in the escalation reply.
    #[serde(default)]
    pub contact_email: Option<String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            escalation_window: default_escalation_window(),
            escalation_trigger: default_escalation_trigger(),
            contact_phone: None,
            contact_email: None,
        }
    }
}

fn default_confidence_threshold() -> f64 {
    0.6
}

fn default_escalation_window() -> usize {
    4
}

fn default_escalation_trigger() -> usize {
    3
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bearer token for API auth (`None` = auth disabled, e.g. in tests).
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bearer_token: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8642
}
