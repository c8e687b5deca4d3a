// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./haulio.toml` > `~/.config/haulio/haulio.toml`
//! > `/etc/haulio/haulio.toml`, with environment variable overrides via the
//! `HAULIO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::HaulioConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/haulio/haulio.toml` (system-wide)
/// 3. `~/.config/haulio/haulio.toml` (user XDG config)
/// 4. `./haulio.toml` (local directory)
/// 5. `HAULIO_*` environment variables
pub fn load_config() -> Result<HaulioConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<HaulioConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HaulioConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HaulioConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HaulioConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(HaulioConfig::default()))
        .merge(Toml::file("/etc/haulio/haulio.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("haulio/haulio.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("haulio.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because several key names
/// themselves contain underscores: `HAULIO_AUTH_API_KEY` must map to
/// `auth.api_key`, not `auth.api.key`.
fn env_provider() -> Env {
    Env::prefixed("HAULIO_").map(|key| {
        // `key` is the lowercased env var name with the prefix stripped.
        // Example: HAULIO_AUTH_API_KEY -> "auth_api_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("client_", "client.", 1)
            .replacen("auth_", "auth.", 1)
            .replacen("store_", "store.", 1)
            .replacen("dispatch_", "dispatch.", 1)
            .replacen("session_", "session.", 1)
            .replacen("limits_", "limits.", 1)
            .replacen("polling_", "polling.", 1);
        mapped.into()
    })
}
