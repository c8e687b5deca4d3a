// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the haulio quote client.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so unrecognized keys are
//! rejected at startup with an actionable diagnostic.

use serde::{Deserialize, Serialize};

/// Top-level haulio configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HaulioConfig {
    /// Client identity and logging.
    #[serde(default)]
    pub client: ClientConfig,

    /// Hosted auth service endpoint.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Hosted row store endpoint.
    #[serde(default)]
    pub store: StoreConfig,

    /// Quote backend (call placement) endpoint.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Persisted session and refresh behavior.
    #[serde(default)]
    pub session: SessionConfig,

    /// Client-side attempt limits for credential flows.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Inquiry polling cadence.
    #[serde(default)]
    pub polling: PollingConfig,
}

/// Client identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Auth service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Base URL of the auth service.
    #[serde(default = "default_platform_url")]
    pub url: String,

    /// Publishable API key sent as the `apikey` header on every request.
    #[serde(default)]
    pub api_key: String,

    /// Service-role key for the administrative password-update endpoint used
    /// by the security-question recovery flow. Optional; recovery is refused
    /// without it.
    #[serde(default)]
    pub service_key: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            url: default_platform_url(),
            api_key: String::new(),
            service_key: None,
        }
    }
}

/// Row store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Base URL of the row store.
    #[serde(default = "default_platform_url")]
    pub url: String,

    /// Publishable API key sent as the `apikey` header on every request.
    #[serde(default)]
    pub api_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_platform_url(),
            api_key: String::new(),
        }
    }
}

fn default_platform_url() -> String {
    "http://127.0.0.1:54321".to_string()
}

/// Quote backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Base URL of the quote backend.
    #[serde(default = "default_dispatch_url")]
    pub url: String,

    /// Request timeout in seconds. Search submission can take a while on the
    /// backend side, so this is generous by default.
    #[serde(default = "default_dispatch_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            url: default_dispatch_url(),
            timeout_secs: default_dispatch_timeout_secs(),
        }
    }
}

fn default_dispatch_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_dispatch_timeout_secs() -> u64 {
    60
}

/// Session persistence and refresh configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Override for the session blob path. Defaults to
    /// `<data_dir>/haulio/session.json`.
    #[serde(default)]
    pub file: Option<String>,

    /// A restore triggers a refresh when the session expires within this
    /// many seconds.
    #[serde(default = "default_refresh_buffer_secs")]
    pub refresh_buffer_secs: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file: None,
            refresh_buffer_secs: default_refresh_buffer_secs(),
        }
    }
}

fn default_refresh_buffer_secs() -> i64 {
    300
}

/// Client-side credential attempt limits.
///
/// These guard the UI flows only; authoritative throttling must also exist
/// server-side.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Failed sign-in attempts allowed inside the window before lockout.
    #[serde(default = "default_sign_in_max_attempts")]
    pub sign_in_max_attempts: u32,

    /// Failed sign-up attempts allowed inside the window before lockout.
    #[serde(default = "default_sign_up_max_attempts")]
    pub sign_up_max_attempts: u32,

    /// Lockout window in seconds.
    #[serde(default = "default_lockout_window_secs")]
    pub window_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            sign_in_max_attempts: default_sign_in_max_attempts(),
            sign_up_max_attempts: default_sign_up_max_attempts(),
            window_secs: default_lockout_window_secs(),
        }
    }
}

fn default_sign_in_max_attempts() -> u32 {
    5
}

fn default_sign_up_max_attempts() -> u32 {
    3
}

fn default_lockout_window_secs() -> u64 {
    300
}

/// Inquiry polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PollingConfig {
    /// Seconds between inquiry re-fetches.
    #[serde(default = "default_poll_interval_secs")]
    pub interval_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval_secs(),
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_policy() {
        let config = HaulioConfig::default();
        assert_eq!(config.session.refresh_buffer_secs, 300);
        assert_eq!(config.limits.sign_in_max_attempts, 5);
        assert_eq!(config.limits.sign_up_max_attempts, 3);
        assert_eq!(config.limits.window_secs, 300);
        assert_eq!(config.polling.interval_secs, 5);
        assert_eq!(config.client.log_level, "info");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<HaulioConfig, _> =
            toml::from_str("[polling]\ninterval_seconds = 5\n");
        assert!(result.is_err(), "typo'd key should not deserialize");
    }
}
