// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session lifecycle for the haulio quote client.
//!
//! [`SessionManager`] owns the one authenticated session: sign-in/sign-up
//! with client-side lockout, persisted restore with expiry-buffer refresh,
//! unconditional sign-out, and profile upkeep. [`PasswordRecovery`] is the
//! unauthenticated security-question reset path.

pub mod answer_hash;
pub mod manager;
pub mod persist;
pub mod ratelimit;
pub mod recovery;

pub use manager::{Registration, SessionManager};
pub use persist::SessionFile;
pub use recovery::PasswordRecovery;
