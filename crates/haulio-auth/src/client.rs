// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the hosted auth service.
//!
//! Provides [`AuthClient`], which implements [`AuthBackend`] against a
//! GoTrue-style REST surface: password grant, signup, refresh grant, logout,
//! and the administrative password update used by the recovery flow.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use haulio_config::model::AuthConfig;
use haulio_core::error::{AuthFailure, HaulioError};
use haulio_core::traits::AuthBackend;
use haulio_core::types::Session;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::types::{ApiErrorResponse, TokenResponse};

/// Which flow a token request belongs to; failures map differently per flow.
#[derive(Debug, Clone, Copy)]
enum TokenFlow {
    SignIn,
    SignUp,
    Refresh,
}

/// HTTP client for auth service communication.
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
    service_key: Option<String>,
}

impl AuthClient {
    /// Creates a new auth client from configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, HaulioError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(&config.api_key)
                .map_err(|e| HaulioError::Config(format!("invalid auth.api_key: {e}")))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| HaulioError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            service_key: config.service_key.clone(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn token_request(
        &self,
        path: &str,
        body: serde_json::Value,
        flow: TokenFlow,
    ) -> Result<Session, HaulioError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(&body)
            .send()
            .await
            .map_err(HaulioError::network)?;

        let status = response.status();
        debug!(status = %status, ?flow, "auth token response received");

        let text = response.text().await.map_err(HaulioError::network)?;

        if status.is_success() {
            let token: TokenResponse =
                serde_json::from_str(&text).map_err(HaulioError::decode)?;
            return Ok(session_from_token(token));
        }

        Err(map_failure(status, &text, flow))
    }
}

/// Builds a [`Session`] from a token response, computing the absolute expiry
/// when the service only sent a relative lifetime.
fn session_from_token(token: TokenResponse) -> Session {
    let expires_at = token
        .expires_at
        .unwrap_or_else(|| Utc::now().timestamp() + token.expires_in.unwrap_or(3600));
    Session {
        user_id: token.user.id,
        email: token.user.email,
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        expires_at,
    }
}

/// Maps a non-2xx token response onto the error taxonomy.
///
/// Client errors (4xx) carry flow-specific meaning; everything else is a
/// plain server error.
fn map_failure(status: StatusCode, body: &str, flow: TokenFlow) -> HaulioError {
    if status.is_client_error() {
        let parsed: ApiErrorResponse = serde_json::from_str(body).unwrap_or_default();
        return match flow {
            TokenFlow::SignIn => HaulioError::Auth(AuthFailure::InvalidCredentials),
            TokenFlow::SignUp => {
                HaulioError::Auth(AuthFailure::RegistrationFailed(parsed.message()))
            }
            TokenFlow::Refresh => HaulioError::Auth(AuthFailure::SessionExpired),
        };
    }
    HaulioError::Server {
        status: status.as_u16(),
        body: body.to_string(),
    }
}

#[async_trait]
impl AuthBackend for AuthClient {
    async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, HaulioError> {
        self.token_request(
            "/auth/v1/token?grant_type=password",
            serde_json::json!({
                "email": email,
                "password": password.expose_secret(),
            }),
            TokenFlow::SignIn,
        )
        .await
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, HaulioError> {
        self.token_request(
            "/auth/v1/signup",
            serde_json::json!({
                "email": email,
                "password": password.expose_secret(),
            }),
            TokenFlow::SignUp,
        )
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, HaulioError> {
        self.token_request(
            "/auth/v1/token?grant_type=refresh_token",
            serde_json::json!({ "refresh_token": refresh_token }),
            TokenFlow::Refresh,
        )
        .await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), HaulioError> {
        let response = self
            .client
            .post(self.endpoint("/auth/v1/logout"))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(HaulioError::network)?;

        let status = response.status();
        debug!(status = %status, "auth logout response received");

        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::UNAUTHORIZED {
            // The token was already invalid; the remote session is gone either way.
            return Err(HaulioError::Auth(AuthFailure::SessionExpired));
        }
        let body = response.text().await.unwrap_or_default();
        Err(HaulioError::Server {
            status: status.as_u16(),
            body,
        })
    }

    async fn update_password(
        &self,
        user_id: &str,
        new_password: &SecretString,
    ) -> Result<(), HaulioError> {
        let service_key = self.service_key.as_deref().ok_or_else(|| {
            HaulioError::Config(
                "auth.service_key is required for password recovery".to_string(),
            )
        })?;

        let response = self
            .client
            .put(self.endpoint(&format!("/auth/v1/admin/users/{user_id}")))
            .bearer_auth(service_key)
            .json(&serde_json::json!({
                "password": new_password.expose_secret(),
            }))
            .send()
            .await
            .map_err(HaulioError::network)?;

        let status = response.status();
        debug!(status = %status, user_id, "admin password update response received");

        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(HaulioError::Server {
            status: status.as_u16(),
            body,
        })
    }
}
