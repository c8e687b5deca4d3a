// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inquiry synchronization for the haulio quote client.
//!
//! Turns server-authoritative `moving_inquiry` rows into local view state
//! without a push channel: [`InquirySynchronizer`] issues the commands
//! (submit search, place call) and one-shot reads; [`InquiryPoller`] owns
//! the fixed-interval re-fetch loop and its cancellation.

pub mod poller;
pub mod synchronizer;

pub use poller::{InquiryPoller, PollHandle};
pub use synchronizer::{InquirySynchronizer, SearchDraft};
