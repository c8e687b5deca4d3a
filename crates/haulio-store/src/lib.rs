// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row store client crate.
//!
//! [`StoreClient`] implements [`haulio_core::RowStore`] against the hosted
//! row store's REST surface. Only the four tables the client consumes are
//! exposed: `profiles`, `moving_query`, `moving_inquiry`, `moving_company`.

pub mod client;

pub use client::StoreClient;
