// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock quote backend for deterministic testing.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use haulio_core::error::HaulioError;
use haulio_core::traits::CallDispatch;
use haulio_core::types::SearchParams;

/// A recorded `place_call` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedCall {
    pub phone_number: String,
    pub moving_company_id: i64,
    pub moving_query_id: i64,
}

/// A mock quote backend recording every call-placement request.
#[derive(Default)]
pub struct MockCallDispatch {
    submit_results: Mutex<VecDeque<Result<i64, HaulioError>>>,
    placed: Mutex<Vec<PlacedCall>>,
}

impl MockCallDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an outcome for the next `submit_search` call.
    pub async fn push_submit(&self, result: Result<i64, HaulioError>) {
        self.submit_results.lock().await.push_back(result);
    }

    /// Every call placed so far, in order.
    pub async fn placed_calls(&self) -> Vec<PlacedCall> {
        self.placed.lock().await.clone()
    }
}

#[async_trait]
impl CallDispatch for MockCallDispatch {
    async fn submit_search(&self, _params: &SearchParams) -> Result<i64, HaulioError> {
        self.submit_results
            .lock()
            .await
            .pop_front()
            .unwrap_or(Ok(1))
    }

    async fn place_call(
        &self,
        phone_number: &str,
        moving_company_id: i64,
        moving_query_id: i64,
    ) -> Result<String, HaulioError> {
        self.placed.lock().await.push(PlacedCall {
            phone_number: phone_number.to_string(),
            moving_company_id,
            moving_query_id,
        });
        Ok("mock call queued".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SearchParams {
        SearchParams {
            location_from: "St. Louis".into(),
            location_to: "Boston".into(),
            created_at: "2025-02-18T09:30:00Z".into(),
            items: "Small".into(),
            items_details: "2 boxes".into(),
            availability: "2025-02-20T10:00:00Z".into(),
            user_id: Some("u1".into()),
            inquiries: vec![],
        }
    }

    #[tokio::test]
    async fn scripted_submit_then_default() {
        let dispatch = MockCallDispatch::new();
        dispatch.push_submit(Ok(9)).await;

        assert_eq!(dispatch.submit_search(&params()).await.unwrap(), 9);
        assert_eq!(dispatch.submit_search(&params()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn placed_calls_are_recorded_in_order() {
        let dispatch = MockCallDispatch::new();
        dispatch.place_call("+13145550100", 4, 9).await.unwrap();
        dispatch.place_call("+13145550101", 7, 9).await.unwrap();

        let calls = dispatch.placed_calls().await;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].moving_company_id, 4);
        assert_eq!(calls[1].phone_number, "+13145550101");
    }
}
