// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the haulio quote client.

use thiserror::Error;

/// The primary error type used across all haulio backend clients and core operations.
#[derive(Debug, Error)]
pub enum HaulioError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport-level failure: no HTTP response was received at all.
    #[error("network error: {message}")]
    Network {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The backend answered with a non-2xx status.
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    /// A response body could not be decoded into the expected shape.
    #[error("decode error: {message}")]
    Decode {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Client-side input rejected before any request was made.
    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// Authentication and registration failures.
    #[error("auth error: {0}")]
    Auth(AuthFailure),

    /// An expected row was absent (e.g. zero-row profile fetch).
    #[error("not found: {what}")]
    NotFound { what: String },

    /// Local session persistence errors (unreadable data dir, write failure).
    #[error("storage error: {message}")]
    Storage {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// The ways an auth-path operation can fail, mirrored in user-facing messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// The auth service rejected the email/password pair.
    InvalidCredentials,
    /// The client-side attempt counter has reached its threshold.
    RateLimited { retry_after_secs: u64 },
    /// A refresh was attempted with an expired or revoked token.
    SessionExpired,
    /// The auth service refused a registration (e.g. duplicate email).
    RegistrationFailed(String),
}

impl std::fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthFailure::InvalidCredentials => write!(f, "invalid email or password"),
            AuthFailure::RateLimited { retry_after_secs } => {
                write!(f, "too many attempts, retry in {retry_after_secs}s")
            }
            AuthFailure::SessionExpired => write!(f, "session expired, sign in again"),
            AuthFailure::RegistrationFailed(reason) => {
                write!(f, "registration failed: {reason}")
            }
        }
    }
}

impl HaulioError {
    /// Shorthand for a [`HaulioError::Network`] wrapping a transport error.
    pub fn network(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        HaulioError::Network {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Shorthand for a [`HaulioError::Decode`] wrapping a deserialization error.
    pub fn decode(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        HaulioError::Decode {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// True for failures of a non-critical read that a polling loop may
    /// swallow and retry; anything else should surface to the caller.
    pub fn is_transient_read_failure(&self) -> bool {
        matches!(
            self,
            HaulioError::Network { .. } | HaulioError::Server { .. } | HaulioError::Decode { .. }
        )
    }
}
