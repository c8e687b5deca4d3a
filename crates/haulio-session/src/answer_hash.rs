// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Security-answer hashing with Argon2id.
//!
//! Answers are stored as PHC strings with a per-record random salt.
//! Plaintext answers never leave this module; hashes in the retired
//! unsalted hex format never verify and force a re-enrollment.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use haulio_core::error::HaulioError;
use secrecy::{ExposeSecret, SecretString};

/// Hashes a security answer into a PHC string.
///
/// Answers are whitespace-trimmed before hashing so " Main Street" and
/// "Main Street" enroll identically; case is preserved.
pub fn hash_answer(answer: &SecretString) -> Result<String, HaulioError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(answer.expose_secret().trim().as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| HaulioError::Internal(format!("answer hashing failed: {e}")))
}

/// Verifies an answer against a stored PHC string.
///
/// Unparseable stored hashes (including hashes in the retired unsalted
/// format) verify as false rather than erroring.
pub fn verify_answer(answer: &SecretString, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(answer.expose_secret().trim().as_bytes(), &parsed)
        .is_ok()
}
