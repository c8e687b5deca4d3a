// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Security-question password recovery.
//!
//! This path never requires the old password: the caller proves identity by
//! answering the enrolled security question, and only then is the auth
//! service's administrative password update invoked.

use std::sync::Arc;

use haulio_core::error::{AuthFailure, HaulioError};
use haulio_core::traits::{AuthBackend, RowStore};
use haulio_core::types::Profile;
use secrecy::SecretString;
use tracing::{info, warn};

use crate::answer_hash;

/// Shown when a profile exists but never enrolled a question.
const NO_QUESTION_SET: &str = "No security question set";

/// The unauthenticated password-recovery flow.
pub struct PasswordRecovery {
    auth: Arc<dyn AuthBackend>,
    store: Arc<dyn RowStore>,
}

impl PasswordRecovery {
    pub fn new(auth: Arc<dyn AuthBackend>, store: Arc<dyn RowStore>) -> Self {
        Self { auth, store }
    }

    /// The security question enrolled for `email`.
    pub async fn security_question(&self, email: &str) -> Result<String, HaulioError> {
        let profile = self.profile(email).await?;
        Ok(profile
            .security_question
            .unwrap_or_else(|| NO_QUESTION_SET.to_string()))
    }

    /// Whether `answer` matches the enrolled answer for `email`.
    ///
    /// An account without an enrolled answer verifies as false.
    pub async fn verify_answer(
        &self,
        email: &str,
        answer: &SecretString,
    ) -> Result<bool, HaulioError> {
        let profile = self.profile(email).await?;
        Ok(match profile.security_answer_hash.as_deref() {
            Some(stored) => answer_hash::verify_answer(answer, stored),
            None => false,
        })
    }

    /// Resets the password after verifying the security answer.
    pub async fn reset_password(
        &self,
        email: &str,
        answer: &SecretString,
        new_password: &SecretString,
    ) -> Result<(), HaulioError> {
        use secrecy::ExposeSecret;
        if new_password.expose_secret().chars().count() < 8 {
            return Err(HaulioError::Validation {
                field: "password",
                message: "must be at least 8 characters".into(),
            });
        }

        let profile = self.profile(email).await?;
        let verified = match profile.security_answer_hash.as_deref() {
            Some(stored) => answer_hash::verify_answer(answer, stored),
            None => false,
        };
        if !verified {
            warn!(email, "password reset refused: wrong security answer");
            return Err(HaulioError::Auth(AuthFailure::InvalidCredentials));
        }

        self.auth
            .update_password(&profile.user_id, new_password)
            .await?;
        info!(user_id = %profile.user_id, "password reset via security answer");
        Ok(())
    }

    async fn profile(&self, email: &str) -> Result<Profile, HaulioError> {
        self.store
            .profile_by_email(email)
            .await?
            .ok_or_else(|| HaulioError::NotFound {
                what: format!("profile for {email}"),
            })
    }
}
