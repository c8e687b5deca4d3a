// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Auth service client crate.
//!
//! [`AuthClient`] implements [`haulio_core::AuthBackend`] against the hosted
//! auth service's REST surface. Token material never appears in logs; the
//! session manager owns what happens to the returned sessions.

pub mod client;
pub mod types;

pub use client::AuthClient;
