// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic mock backends for haulio tests.
//!
//! Scripted, in-memory implementations of the three backend traits so the
//! session manager and inquiry synchronizer can be tested without a network.

pub mod mock_auth;
pub mod mock_dispatch;
pub mod mock_store;

pub use mock_auth::{test_session, MockAuthBackend};
pub use mock_dispatch::{MockCallDispatch, PlacedCall};
pub use mock_store::{test_inquiry, MockRowStore};
