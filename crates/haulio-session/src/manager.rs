// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The session manager: exactly one authenticated session at a time,
//! persisted across restarts, kept fresh, and guarded against credential
//! guessing.
//!
//! All mutation of the shared [`SessionHandle`] happens here; every other
//! component only reads snapshots. Failures during session-critical
//! operations (sign-in, refresh, restore) always clear partial state rather
//! than leaving a half-valid session behind.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use haulio_config::model::{LimitsConfig, SessionConfig};
use haulio_core::error::{AuthFailure, HaulioError};
use haulio_core::session::SessionHandle;
use haulio_core::traits::{AuthBackend, RowStore};
use haulio_core::types::{Profile, ProfileUpdate, Session};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::answer_hash;
use crate::persist::SessionFile;
use crate::ratelimit::AttemptCounter;

/// Everything a new account needs; passwords and answers stay wrapped until
/// the last possible moment.
pub struct Registration {
    pub email: String,
    pub password: SecretString,
    pub full_name: String,
    pub security_question: String,
    pub security_answer: SecretString,
}

/// Owns the authenticated session lifecycle.
pub struct SessionManager {
    auth: Arc<dyn AuthBackend>,
    store: Arc<dyn RowStore>,
    handle: Arc<SessionHandle>,
    file: SessionFile,
    sign_in_attempts: Mutex<AttemptCounter>,
    sign_up_attempts: Mutex<AttemptCounter>,
    refresh_buffer_secs: i64,
}

impl SessionManager {
    pub fn new(
        auth: Arc<dyn AuthBackend>,
        store: Arc<dyn RowStore>,
        handle: Arc<SessionHandle>,
        file: SessionFile,
        limits: &LimitsConfig,
        session: &SessionConfig,
    ) -> Self {
        let window = Duration::from_secs(limits.window_secs);
        Self {
            auth,
            store,
            handle,
            file,
            sign_in_attempts: Mutex::new(AttemptCounter::new(
                limits.sign_in_max_attempts,
                window,
            )),
            sign_up_attempts: Mutex::new(AttemptCounter::new(
                limits.sign_up_max_attempts,
                window,
            )),
            refresh_buffer_secs: session.refresh_buffer_secs,
        }
    }

    /// The shared snapshot handle readers should hold.
    pub fn handle(&self) -> Arc<SessionHandle> {
        Arc::clone(&self.handle)
    }

    /// Signs in with an email/password pair.
    ///
    /// Fails fast with `RateLimited` -- no network call -- once the attempt
    /// counter has locked. Only credential rejections count toward the lock;
    /// transport failures do not.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, HaulioError> {
        if let Err(retry_after_secs) = self.sign_in_attempts.lock().await.check() {
            return Err(HaulioError::Auth(AuthFailure::RateLimited {
                retry_after_secs,
            }));
        }

        match self.auth.sign_in(email, password).await {
            Ok(session) => {
                self.sign_in_attempts.lock().await.reset();
                info!(user_id = %session.user_id, "signed in");
                self.adopt(session)
            }
            Err(err @ HaulioError::Auth(AuthFailure::InvalidCredentials)) => {
                self.sign_in_attempts.lock().await.record_failure();
                Err(err)
            }
            Err(other) => Err(other),
        }
    }

    /// Registers a new account: validates inputs before any network call,
    /// creates the auth account, stores the profile with a hashed security
    /// answer, and adopts the returned session.
    pub async fn sign_up(&self, registration: Registration) -> Result<Session, HaulioError> {
        validate_registration(&registration)?;

        if let Err(retry_after_secs) = self.sign_up_attempts.lock().await.check() {
            return Err(HaulioError::Auth(AuthFailure::RateLimited {
                retry_after_secs,
            }));
        }

        let email = registration.email.trim().to_string();
        match self.auth.sign_up(&email, &registration.password).await {
            Ok(session) => {
                self.sign_up_attempts.lock().await.reset();

                let profile = Profile {
                    user_id: session.user_id.clone(),
                    full_name: Some(registration.full_name.trim().to_string()),
                    email: Some(email),
                    security_question: Some(registration.security_question.clone()),
                    security_answer_hash: Some(answer_hash::hash_answer(
                        &registration.security_answer,
                    )?),
                };
                self.store.insert_profile(&profile).await?;

                info!(user_id = %session.user_id, "account registered");
                self.adopt(session)
            }
            Err(err @ HaulioError::Auth(AuthFailure::RegistrationFailed(_))) => {
                self.sign_up_attempts.lock().await.record_failure();
                Err(err)
            }
            Err(other) => Err(other),
        }
    }

    /// Restores the persisted session, refreshing it when it expires within
    /// the configured buffer.
    ///
    /// Never errors: malformed blobs, incomplete sessions, and refresh
    /// failures all clear the persisted state and yield `None`, forcing a
    /// fresh sign-in.
    pub async fn restore_session(&self) -> Option<Session> {
        let session = self.file.load()?;

        let now = Utc::now().timestamp();
        if !session.expires_within(self.refresh_buffer_secs, now) {
            debug!(user_id = %session.user_id, "persisted session still fresh");
            self.handle.publish(session.clone());
            return Some(session);
        }

        // Exactly one refresh attempt; on failure, force re-login rather
        // than retrying with a token of unknown state.
        debug!(user_id = %session.user_id, "persisted session near expiry, refreshing");
        match self.auth.refresh(&session.refresh_token).await {
            Ok(fresh) => match self.adopt(fresh) {
                Ok(fresh) => Some(fresh),
                Err(e) => {
                    warn!(error = %e, "failed to persist refreshed session");
                    self.discard();
                    None
                }
            },
            Err(e) => {
                warn!(error = %e, "session refresh failed, forcing re-login");
                self.discard();
                None
            }
        }
    }

    /// Signs out: revokes the remote session when possible, then clears all
    /// local state unconditionally.
    pub async fn sign_out(&self) {
        let token = self
            .handle
            .access_token()
            .or_else(|| self.file.load().map(|s| s.access_token));

        if let Some(token) = token {
            if let Err(e) = self.auth.sign_out(&token).await {
                warn!(error = %e, "remote sign-out failed, clearing local state anyway");
            }
        }
        self.discard();
        info!("signed out");
    }

    /// Fetches the user's profile, creating an empty row on first access.
    pub async fn profile(&self, user_id: &str) -> Result<Profile, HaulioError> {
        if let Some(profile) = self.store.profile_by_user_id(user_id).await? {
            return Ok(profile);
        }

        debug!(user_id, "no profile row yet, creating one");
        let profile = Profile {
            user_id: user_id.to_string(),
            full_name: None,
            email: self.handle.snapshot().and_then(|s| s.email.clone()),
            security_question: None,
            security_answer_hash: None,
        };
        self.store.insert_profile(&profile).await?;
        Ok(profile)
    }

    /// Self-service profile mutation.
    pub async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<(), HaulioError> {
        self.store.update_profile(user_id, update).await
    }

    /// Re-enrolls the security question and answer; only the hash is stored.
    pub async fn update_security_question(
        &self,
        user_id: &str,
        question: &str,
        answer: &SecretString,
    ) -> Result<(), HaulioError> {
        if answer.expose_secret().trim().is_empty() {
            return Err(HaulioError::Validation {
                field: "security_answer",
                message: "must not be empty".into(),
            });
        }
        let update = ProfileUpdate {
            security_question: Some(question.to_string()),
            security_answer_hash: Some(answer_hash::hash_answer(answer)?),
            ..ProfileUpdate::default()
        };
        self.store.update_profile(user_id, &update).await
    }

    /// Persists and publishes a session atomically from the caller's view.
    fn adopt(&self, session: Session) -> Result<Session, HaulioError> {
        self.file.save(&session)?;
        self.handle.publish(session.clone());
        Ok(session)
    }

    fn discard(&self) {
        self.file.clear();
        self.handle.clear();
    }
}

/// Input checks that must fail before any network round trip.
fn validate_registration(registration: &Registration) -> Result<(), HaulioError> {
    if !registration.email.contains('@') {
        return Err(HaulioError::Validation {
            field: "email",
            message: "must contain @".into(),
        });
    }
    if registration.password.expose_secret().chars().count() < 8 {
        return Err(HaulioError::Validation {
            field: "password",
            message: "must be at least 8 characters".into(),
        });
    }
    if registration.security_answer.expose_secret().trim().is_empty() {
        return Err(HaulioError::Validation {
            field: "security_answer",
            message: "must not be empty".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use haulio_test_utils::{test_session, MockAuthBackend, MockRowStore};
    use tempfile::tempdir;

    struct Fixture {
        auth: Arc<MockAuthBackend>,
        store: Arc<MockRowStore>,
        manager: SessionManager,
        _dir: tempfile::TempDir,
    }

    fn fixture() -> Fixture {
        let auth = Arc::new(MockAuthBackend::new());
        let store = Arc::new(MockRowStore::new());
        let dir = tempdir().unwrap();
        let manager = SessionManager::new(
            Arc::clone(&auth) as Arc<dyn AuthBackend>,
            Arc::clone(&store) as Arc<dyn RowStore>,
            Arc::new(SessionHandle::new()),
            SessionFile::new(dir.path().join("session.json")),
            &LimitsConfig::default(),
            &SessionConfig::default(),
        );
        Fixture {
            auth,
            store,
            manager,
            _dir: dir,
        }
    }

    fn registration() -> Registration {
        Registration {
            email: "mover@example.com".into(),
            password: SecretString::from("longenough"),
            full_name: "Mo Ver".into(),
            security_question: "What was your first car's make and model?".into(),
            security_answer: SecretString::from("Civic"),
        }
    }

    fn invalid_credentials() -> HaulioError {
        HaulioError::Auth(AuthFailure::InvalidCredentials)
    }

    #[tokio::test]
    async fn sign_in_persists_and_publishes() {
        let f = fixture();
        let session = f
            .manager
            .sign_in("mover@example.com", &SecretString::from("hunter22"))
            .await
            .unwrap();

        assert_eq!(f.manager.handle().user_id(), Some(session.user_id.clone()));
        // A fresh manager over the same file restores the session.
        assert_eq!(f.manager.restore_session().await, Some(session));
    }

    #[tokio::test]
    async fn sixth_sign_in_fails_fast_without_network() {
        let f = fixture();
        for _ in 0..5 {
            f.auth.push_sign_in(Err(invalid_credentials())).await;
        }

        for _ in 0..5 {
            let err = f
                .manager
                .sign_in("mover@example.com", &SecretString::from("wrong"))
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                HaulioError::Auth(AuthFailure::InvalidCredentials)
            ));
        }

        let err = f
            .manager
            .sign_in("mover@example.com", &SecretString::from("wrong"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            HaulioError::Auth(AuthFailure::RateLimited { .. })
        ));
        // The sixth attempt never reached the auth service.
        assert_eq!(f.auth.counts().await.sign_in, 5);
    }

    #[tokio::test]
    async fn transport_failures_do_not_count_toward_lockout() {
        let f = fixture();
        for _ in 0..5 {
            f.auth
                .push_sign_in(Err(HaulioError::Network {
                    message: "connection refused".into(),
                    source: None,
                }))
                .await;
        }
        for _ in 0..5 {
            let err = f
                .manager
                .sign_in("mover@example.com", &SecretString::from("hunter22"))
                .await
                .unwrap_err();
            assert!(matches!(err, HaulioError::Network { .. }));
        }

        // Still not locked: the next attempt goes through to the backend.
        f.manager
            .sign_in("mover@example.com", &SecretString::from("hunter22"))
            .await
            .unwrap();
        assert_eq!(f.auth.counts().await.sign_in, 6);
    }

    #[tokio::test]
    async fn success_resets_the_attempt_counter() {
        let f = fixture();
        for _ in 0..4 {
            f.auth.push_sign_in(Err(invalid_credentials())).await;
        }
        for _ in 0..4 {
            let _ = f
                .manager
                .sign_in("mover@example.com", &SecretString::from("wrong"))
                .await;
        }
        f.manager
            .sign_in("mover@example.com", &SecretString::from("right"))
            .await
            .unwrap();

        // Four more rejections fit before the lock engages again.
        for _ in 0..4 {
            f.auth.push_sign_in(Err(invalid_credentials())).await;
        }
        for _ in 0..4 {
            let err = f
                .manager
                .sign_in("mover@example.com", &SecretString::from("wrong"))
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                HaulioError::Auth(AuthFailure::InvalidCredentials)
            ));
        }
    }

    #[tokio::test]
    async fn short_password_fails_before_any_network_call() {
        let f = fixture();
        let mut reg = registration();
        reg.password = SecretString::from("short");

        let err = f.manager.sign_up(reg).await.unwrap_err();
        match err {
            HaulioError::Validation { field, .. } => assert_eq!(field, "password"),
            other => panic!("expected Validation, got {other:?}"),
        }
        assert_eq!(f.auth.counts().await.sign_up, 0);
    }

    #[tokio::test]
    async fn email_without_at_sign_is_rejected() {
        let f = fixture();
        let mut reg = registration();
        reg.email = "not-an-email".into();

        let err = f.manager.sign_up(reg).await.unwrap_err();
        assert!(matches!(
            err,
            HaulioError::Validation { field: "email", .. }
        ));
    }

    #[tokio::test]
    async fn empty_security_answer_is_rejected() {
        let f = fixture();
        let mut reg = registration();
        reg.security_answer = SecretString::from("   ");

        let err = f.manager.sign_up(reg).await.unwrap_err();
        assert!(matches!(
            err,
            HaulioError::Validation {
                field: "security_answer",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn sign_up_stores_a_hashed_answer_never_plaintext() {
        let f = fixture();
        f.auth.push_sign_up(Ok(test_session("new-user"))).await;

        f.manager.sign_up(registration()).await.unwrap();

        let profile = f
            .store
            .profile_by_user_id("new-user")
            .await
            .unwrap()
            .expect("profile row inserted");
        let hash = profile.security_answer_hash.unwrap();
        assert!(!hash.contains("Civic"));
        assert!(crate::answer_hash::verify_answer(
            &SecretString::from("Civic"),
            &hash
        ));
    }

    #[tokio::test]
    async fn fourth_sign_up_attempt_is_rate_limited() {
        let f = fixture();
        for _ in 0..3 {
            f.auth
                .push_sign_up(Err(HaulioError::Auth(AuthFailure::RegistrationFailed(
                    "duplicate email".into(),
                ))))
                .await;
        }
        for _ in 0..3 {
            let _ = f.manager.sign_up(registration()).await;
        }

        let err = f.manager.sign_up(registration()).await.unwrap_err();
        assert!(matches!(
            err,
            HaulioError::Auth(AuthFailure::RateLimited { .. })
        ));
        assert_eq!(f.auth.counts().await.sign_up, 3);
    }

    #[tokio::test]
    async fn restore_with_no_file_is_none() {
        let f = fixture();
        assert!(f.manager.restore_session().await.is_none());
        assert_eq!(f.auth.counts().await.refresh, 0);
    }

    #[tokio::test]
    async fn restore_of_fresh_session_skips_refresh() {
        let f = fixture();
        f.manager
            .sign_in("mover@example.com", &SecretString::from("hunter22"))
            .await
            .unwrap();

        let restored = f.manager.restore_session().await.unwrap();
        assert_eq!(restored.user_id, "mock-user");
        assert_eq!(f.auth.counts().await.refresh, 0);
    }

    #[tokio::test]
    async fn restore_near_expiry_refreshes_exactly_once() {
        let f = fixture();
        let mut stale = test_session("mock-user");
        stale.expires_at = Utc::now().timestamp() + 60; // inside the 300s buffer
        f.auth.push_sign_in(Ok(stale)).await;
        f.manager
            .sign_in("mover@example.com", &SecretString::from("hunter22"))
            .await
            .unwrap();

        let mut fresh = test_session("mock-user");
        fresh.access_token = "access-fresh".into();
        f.auth.push_refresh(Ok(fresh)).await;

        let restored = f.manager.restore_session().await.unwrap();
        assert_eq!(restored.access_token, "access-fresh");
        assert_eq!(f.auth.counts().await.refresh, 1);

        // The refreshed session was persisted: restoring again needs no refresh.
        let again = f.manager.restore_session().await.unwrap();
        assert_eq!(again.access_token, "access-fresh");
        assert_eq!(f.auth.counts().await.refresh, 1);
    }

    #[tokio::test]
    async fn failed_refresh_clears_everything() {
        let f = fixture();
        let mut stale = test_session("mock-user");
        stale.expires_at = 1_000; // long past
        f.auth.push_sign_in(Ok(stale)).await;
        f.manager
            .sign_in("mover@example.com", &SecretString::from("hunter22"))
            .await
            .unwrap();

        f.auth
            .push_refresh(Err(HaulioError::Auth(AuthFailure::SessionExpired)))
            .await;

        assert!(f.manager.restore_session().await.is_none());
        assert!(f.manager.handle().snapshot().is_none());
        // Nothing persisted either: the next restore does not attempt a refresh.
        assert!(f.manager.restore_session().await.is_none());
        assert_eq!(f.auth.counts().await.refresh, 1);
    }

    #[tokio::test]
    async fn sign_out_clears_local_state_even_when_remote_fails() {
        let f = fixture();
        f.manager
            .sign_in("mover@example.com", &SecretString::from("hunter22"))
            .await
            .unwrap();
        f.auth
            .push_sign_out(Err(HaulioError::Network {
                message: "offline".into(),
                source: None,
            }))
            .await;

        f.manager.sign_out().await;

        assert!(f.manager.handle().snapshot().is_none());
        assert!(f.manager.restore_session().await.is_none());
        assert_eq!(f.auth.counts().await.sign_out, 1);
    }

    #[tokio::test]
    async fn profile_is_created_lazily_on_first_fetch() {
        let f = fixture();
        f.manager
            .sign_in("mover@example.com", &SecretString::from("hunter22"))
            .await
            .unwrap();

        let profile = f.manager.profile("mock-user").await.unwrap();
        assert_eq!(profile.user_id, "mock-user");
        assert!(profile.security_question.is_none());

        // The row now exists in the store.
        assert!(f
            .store
            .profile_by_user_id("mock-user")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn update_security_question_stores_a_fresh_hash() {
        let f = fixture();
        f.auth.push_sign_up(Ok(test_session("new-user"))).await;
        f.manager.sign_up(registration()).await.unwrap();

        f.manager
            .update_security_question(
                "new-user",
                "What was your childhood home street address?",
                &SecretString::from("12 Maple"),
            )
            .await
            .unwrap();

        let profile = f
            .store
            .profile_by_user_id("new-user")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            profile.security_question.as_deref(),
            Some("What was your childhood home street address?")
        );
        assert!(crate::answer_hash::verify_answer(
            &SecretString::from("12 Maple"),
            &profile.security_answer_hash.unwrap()
        ));
    }
}
