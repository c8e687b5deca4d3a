// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes: URLs that actually look like URLs, positive intervals, and
//! non-zero attempt limits.

use crate::diagnostic::ConfigError;
use crate::model::HaulioConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &HaulioConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    for (key, url) in [
        ("auth.url", &config.auth.url),
        ("store.url", &config.store.url),
        ("dispatch.url", &config.dispatch.url),
    ] {
        if url.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        } else if !url.starts_with("http://") && !url.starts_with("https://") {
            errors.push(ConfigError::Validation {
                message: format!("{key} must start with http:// or https://, got `{url}`"),
            });
        }
    }

    if config.dispatch.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "dispatch.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.polling.interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "polling.interval_secs must be at least 1".to_string(),
        });
    }

    if config.session.refresh_buffer_secs < 0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "session.refresh_buffer_secs must be non-negative, got {}",
                config.session.refresh_buffer_secs
            ),
        });
    }

    if config.limits.sign_in_max_attempts == 0 {
        errors.push(ConfigError::Validation {
            message: "limits.sign_in_max_attempts must be at least 1".to_string(),
        });
    }

    if config.limits.sign_up_max_attempts == 0 {
        errors.push(ConfigError::Validation {
            message: "limits.sign_up_max_attempts must be at least 1".to_string(),
        });
    }

    if config.limits.window_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "limits.window_secs must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
