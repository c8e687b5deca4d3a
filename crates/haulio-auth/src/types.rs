// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the auth service's token endpoints.

use serde::Deserialize;

/// Successful response from the password, signup, and refresh endpoints.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Absolute expiry as epoch seconds; some deployments only send `expires_in`.
    #[serde(default)]
    pub expires_at: Option<i64>,
    /// Token lifetime in seconds, fallback when `expires_at` is absent.
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: AuthUser,
}

/// The identity embedded in a token response.
#[derive(Debug, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Error body shape; the service emits either `error`/`error_description`
/// pairs or a bare `msg` depending on the endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
}

impl ApiErrorResponse {
    /// Best-effort human-readable message from whichever fields are present.
    pub fn message(&self) -> String {
        self.error_description
            .clone()
            .or_else(|| self.msg.clone())
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "unknown auth error".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_prefers_description() {
        let body: ApiErrorResponse = serde_json::from_str(
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        )
        .unwrap();
        assert_eq!(body.message(), "Invalid login credentials");
    }

    #[test]
    fn error_body_falls_back_to_msg() {
        let body: ApiErrorResponse =
            serde_json::from_str(r#"{"msg":"User already registered"}"#).unwrap();
        assert_eq!(body.message(), "User already registered");
    }

    #[test]
    fn error_body_survives_unknown_shape() {
        let body: ApiErrorResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(body.message(), "unknown auth error");
    }
}
