// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for the three external backends the client consumes.
//!
//! Concrete implementations live in `haulio-auth`, `haulio-store`, and
//! `haulio-dispatch`; `haulio-test-utils` provides scripted mocks. The
//! session manager and inquiry synchronizer only ever see these traits,
//! never a concrete client.

pub mod auth;
pub mod dispatch;
pub mod store;

pub use auth::AuthBackend;
pub use dispatch::CallDispatch;
pub use store::RowStore;
