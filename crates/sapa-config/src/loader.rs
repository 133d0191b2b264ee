// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./sapa.toml` > `~/.config/sapa/sapa.toml` >
//! `/etc/sapa/sapa.toml` with environment variable overrides via `SAPA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SapaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/sapa/sapa.toml` (system-wide)
/// 3. `~/.config/sapa/sapa.toml` (user XDG config)
/// 4. `./sapa.toml` (local directory)
/// 5. `SAPA_*` environment variables
pub fn load_config() -> Result<SapaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SapaConfig::default()))
        .merge(Toml::file("/etc/sapa/sapa.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("sapa/sapa.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("sapa.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<SapaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SapaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SapaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SapaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `SAPA_STORAGE_DATABASE_PATH` must map to
/// `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("SAPA_").map(|key| {
        // Figment hands over the key case-preserved (`ROUTER_ESCALATION_TRIGGER`);
        // lowercase before matching section prefixes.
        let key_str = key.as_str().to_lowercase();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("classifier_", "classifier.", 1)
            .replacen("router_", "router.", 1)
            .replacen("gateway_", "gateway.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_from_str_overrides_defaults() {
        let config = load_config_from_str(
            r#"
            [router]
            confidence_threshold = 0.7
            contact_phone = "+62-812-0000-0000"

            [gateway]
            port = 9000
            "#,
        )
        .unwrap();
        assert_eq!(config.router.confidence_threshold, 0.7);
        assert_eq!(
            config.router.contact_phone.as_deref(),
            Some("+62-812-0000-0000")
        );
        assert_eq!(config.gateway.port, 9000);
        // Untouched sections keep their defaults.
        assert_eq!(config.router.escalation_window, 4);
        assert_eq!(config.agent.name, "sapa");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = load_config_from_str(
            r#"
            [router]
            confidnce_threshold = 0.7
            "#,
        );
        assert!(result.is_err(), "typo'd key should be rejected");
    }

    #[test]
    #[serial_test::serial]
    fn env_override_maps_section_keys() {
        // SAFETY: test is serialized; no other thread reads the environment.
        unsafe { std::env::set_var("SAPA_ROUTER_ESCALATION_TRIGGER", "2") };
        let config = Figment::new()
            .merge(Serialized::defaults(SapaConfig::default()))
            .merge(env_provider())
            .extract::<SapaConfig>()
            .unwrap();
        unsafe { std::env::remove_var("SAPA_ROUTER_ESCALATION_TRIGGER") };
        assert_eq!(config.router.escalation_trigger, 2);
    }
}
