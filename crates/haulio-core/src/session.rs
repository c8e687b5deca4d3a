// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared read access to the one authenticated session.
//!
//! The session is single-writer (the session manager) with many readers
//! (anything issuing backend requests). Readers take an `Arc` snapshot and
//! never hold it across a mutation; no lock is involved.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::types::Session;

/// Lock-free cell holding the current session, if any.
#[derive(Debug, Default)]
pub struct SessionHandle {
    current: ArcSwapOption<Session>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self {
            current: ArcSwapOption::const_empty(),
        }
    }

    /// Returns a snapshot of the current session. The snapshot stays valid
    /// even if the writer replaces or clears the session afterwards.
    pub fn snapshot(&self) -> Option<Arc<Session>> {
        self.current.load_full()
    }

    /// Replaces the session wholesale. Writer-side only.
    pub fn publish(&self, session: Session) {
        self.current.store(Some(Arc::new(session)));
    }

    /// Clears the session. Writer-side only.
    pub fn clear(&self) {
        self.current.store(None);
    }

    /// Convenience: the current user id, if signed in.
    pub fn user_id(&self) -> Option<String> {
        self.snapshot().map(|s| s.user_id.clone())
    }

    /// Convenience: the current bearer token, if signed in.
    pub fn access_token(&self) -> Option<String> {
        self.snapshot().map(|s| s.access_token.clone())
    }
}
