// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quote backend interface: the service that fans a search out to candidate
//! companies and places the actual outbound calls.

use async_trait::async_trait;

use crate::error::HaulioError;
use crate::types::SearchParams;

/// The asynchronous call-placement backend.
///
/// `submit_search` returns only the new query id -- candidate rows appear in
/// the row store as the backend's fan-out completes, and call results arrive
/// later still. Completion is never learned synchronously; callers poll.
#[async_trait]
pub trait CallDispatch: Send + Sync + 'static {
    /// Submits trip parameters and returns the created `moving_query` id.
    async fn submit_search(&self, params: &SearchParams) -> Result<i64, HaulioError>;

    /// Triggers an outbound call for one company/inquiry pair. The response
    /// body is opaque and returned only for diagnostic logging.
    async fn place_call(
        &self,
        phone_number: &str,
        moving_company_id: i64,
        moving_query_id: i64,
    ) -> Result<String, HaulioError>;
}
