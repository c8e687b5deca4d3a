// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the haulio moving-quote client.
//!
//! This crate provides the error taxonomy, domain types, the shared session
//! handle, and the trait definitions for the three external backends (auth
//! service, row store, quote backend). The backend client crates and the
//! session/sync managers all build on what is defined here.

pub mod error;
pub mod session;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{AuthFailure, HaulioError};
pub use session::SessionHandle;
pub use types::{
    CandidateIds, InquiryStatus, MovingCompany, MovingInquiry, MovingQuery, Price, Profile,
    SearchParams, Session,
};

// Re-export the backend traits at crate root.
pub use traits::{AuthBackend, CallDispatch, RowStore};
