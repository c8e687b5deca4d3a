// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote auth service interface.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::HaulioError;
use crate::types::Session;

/// Password-based auth service exposing sign-in/sign-up, token refresh, and
/// revocation. Returns opaque token pairs with an epoch expiry.
#[async_trait]
pub trait AuthBackend: Send + Sync + 'static {
    /// Exchanges an email/password pair for a session.
    async fn sign_in(&self, email: &str, password: &SecretString)
        -> Result<Session, HaulioError>;

    /// Creates an account and returns its initial session.
    async fn sign_up(&self, email: &str, password: &SecretString)
        -> Result<Session, HaulioError>;

    /// Exchanges a refresh token for a fresh session.
    async fn refresh(&self, refresh_token: &str) -> Result<Session, HaulioError>;

    /// Revokes the session behind the given access token.
    async fn sign_out(&self, access_token: &str) -> Result<(), HaulioError>;

    /// Administrative password update, used by the security-question
    /// recovery path after the answer has been verified. Never requires the
    /// old password.
    async fn update_password(
        &self,
        user_id: &str,
        new_password: &SecretString,
    ) -> Result<(), HaulioError>;
}
