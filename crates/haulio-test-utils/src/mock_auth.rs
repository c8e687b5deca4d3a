// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock auth backend for deterministic testing.
//!
//! Scripted results are popped from FIFO queues per operation; when a queue
//! is empty a canned success is returned. Every call is counted so tests can
//! assert that rate limiting really short-circuits the network.

use std::collections::VecDeque;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;

use haulio_core::error::HaulioError;
use haulio_core::traits::AuthBackend;
use haulio_core::types::Session;

/// Builds a fully-populated test session for `user_id`.
pub fn test_session(user_id: &str) -> Session {
    Session {
        user_id: user_id.into(),
        email: Some(format!("{user_id}@example.com")),
        access_token: format!("access-{user_id}"),
        refresh_token: format!("refresh-{user_id}"),
        expires_at: 4_102_444_800, // far future
    }
}

/// Call counters exposed for assertions.
#[derive(Debug, Default, Clone)]
pub struct AuthCallCounts {
    pub sign_in: u32,
    pub sign_up: u32,
    pub refresh: u32,
    pub sign_out: u32,
    pub update_password: u32,
}

/// A mock auth service with scripted per-operation outcomes.
#[derive(Default)]
pub struct MockAuthBackend {
    sign_in_results: Mutex<VecDeque<Result<Session, HaulioError>>>,
    sign_up_results: Mutex<VecDeque<Result<Session, HaulioError>>>,
    refresh_results: Mutex<VecDeque<Result<Session, HaulioError>>>,
    sign_out_results: Mutex<VecDeque<Result<(), HaulioError>>>,
    counts: Mutex<AuthCallCounts>,
    password_updates: Mutex<Vec<(String, String)>>,
}

impl MockAuthBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an outcome for the next `sign_in` call.
    pub async fn push_sign_in(&self, result: Result<Session, HaulioError>) {
        self.sign_in_results.lock().await.push_back(result);
    }

    /// Queue an outcome for the next `sign_up` call.
    pub async fn push_sign_up(&self, result: Result<Session, HaulioError>) {
        self.sign_up_results.lock().await.push_back(result);
    }

    /// Queue an outcome for the next `refresh` call.
    pub async fn push_refresh(&self, result: Result<Session, HaulioError>) {
        self.refresh_results.lock().await.push_back(result);
    }

    /// Queue an outcome for the next `sign_out` call.
    pub async fn push_sign_out(&self, result: Result<(), HaulioError>) {
        self.sign_out_results.lock().await.push_back(result);
    }

    /// Snapshot of how many times each operation ran.
    pub async fn counts(&self) -> AuthCallCounts {
        self.counts.lock().await.clone()
    }

    /// `(user_id, new_password)` pairs recorded by `update_password`.
    pub async fn password_updates(&self) -> Vec<(String, String)> {
        self.password_updates.lock().await.clone()
    }
}

#[async_trait]
impl AuthBackend for MockAuthBackend {
    async fn sign_in(
        &self,
        _email: &str,
        _password: &SecretString,
    ) -> Result<Session, HaulioError> {
        self.counts.lock().await.sign_in += 1;
        self.sign_in_results
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(test_session("mock-user")))
    }

    async fn sign_up(
        &self,
        _email: &str,
        _password: &SecretString,
    ) -> Result<Session, HaulioError> {
        self.counts.lock().await.sign_up += 1;
        self.sign_up_results
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(test_session("mock-user")))
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<Session, HaulioError> {
        self.counts.lock().await.refresh += 1;
        self.refresh_results
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(test_session("mock-user")))
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), HaulioError> {
        self.counts.lock().await.sign_out += 1;
        self.sign_out_results
            .lock()
            .await
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn update_password(
        &self,
        user_id: &str,
        new_password: &SecretString,
    ) -> Result<(), HaulioError> {
        self.counts.lock().await.update_password += 1;
        self.password_updates
            .lock()
            .await
            .push((user_id.to_string(), new_password.expose_secret().to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haulio_core::error::AuthFailure;

    #[tokio::test]
    async fn scripted_results_pop_in_order() {
        let auth = MockAuthBackend::new();
        auth.push_sign_in(Err(HaulioError::Auth(AuthFailure::InvalidCredentials)))
            .await;
        auth.push_sign_in(Ok(test_session("u2"))).await;

        let first = auth.sign_in("a", &SecretString::from("p")).await;
        assert!(first.is_err());
        let second = auth.sign_in("a", &SecretString::from("p")).await.unwrap();
        assert_eq!(second.user_id, "u2");
        // Queue exhausted, falls back to the canned session.
        let third = auth.sign_in("a", &SecretString::from("p")).await.unwrap();
        assert_eq!(third.user_id, "mock-user");

        assert_eq!(auth.counts().await.sign_in, 3);
    }

    #[tokio::test]
    async fn password_updates_are_recorded() {
        let auth = MockAuthBackend::new();
        auth.update_password("u1", &SecretString::from("fresh"))
            .await
            .unwrap();
        assert_eq!(
            auth.password_updates().await,
            vec![("u1".to_string(), "fresh".to_string())]
        );
    }
}
