// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quote backend client crate.
//!
//! [`DispatchClient`] implements [`haulio_core::CallDispatch`]: search
//! submission and outbound call placement. Everything after submission is
//! asynchronous on the backend side and observed via polling, never here.

pub mod client;

pub use client::DispatchClient;
