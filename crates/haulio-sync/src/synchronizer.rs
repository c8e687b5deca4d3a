// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The inquiry synchronizer: search submission, fan-out discovery, and the
//! call-placement command.
//!
//! The backend never answers synchronously with results. `submit_search`
//! returns only the new query id; candidate inquiry rows appear in the row
//! store as the fan-out completes and are discovered with
//! `fetch_candidate_ids`, then watched via [`crate::poller::InquiryPoller`].

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use haulio_core::error::{AuthFailure, HaulioError};
use haulio_core::session::SessionHandle;
use haulio_core::traits::{CallDispatch, RowStore};
use haulio_core::types::{
    CandidateIds, InquiryStatus, MovingCompany, MovingInquiry, MovingQuery, SearchParams,
};
use tracing::{debug, info, warn};

/// Trip details as entered by the user; submission fills in the timestamp
/// and the caller's identity.
#[derive(Debug, Clone)]
pub struct SearchDraft {
    pub location_from: String,
    pub location_to: String,
    pub items: String,
    pub items_details: String,
    pub availability: String,
}

/// Issues commands against the quote backend and reads fan-out state from
/// the row store, on behalf of the signed-in user.
pub struct InquirySynchronizer {
    store: Arc<dyn RowStore>,
    dispatch: Arc<dyn CallDispatch>,
    session: Arc<SessionHandle>,
}

impl InquirySynchronizer {
    pub fn new(
        store: Arc<dyn RowStore>,
        dispatch: Arc<dyn CallDispatch>,
        session: Arc<SessionHandle>,
    ) -> Self {
        Self {
            store,
            dispatch,
            session,
        }
    }

    /// Submits a search and returns the created query id.
    pub async fn submit_search(&self, draft: SearchDraft) -> Result<i64, HaulioError> {
        let user_id = self
            .session
            .user_id()
            .ok_or(HaulioError::Auth(AuthFailure::SessionExpired))?;

        let params = SearchParams {
            location_from: draft.location_from,
            location_to: draft.location_to,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            items: draft.items,
            items_details: draft.items_details,
            availability: draft.availability,
            user_id: Some(user_id),
            inquiries: Vec::new(),
        };

        let moving_query_id = self.dispatch.submit_search(&params).await?;
        info!(
            moving_query_id,
            from = %params.location_from,
            to = %params.location_to,
            "search submitted"
        );
        Ok(moving_query_id)
    }

    /// The company/inquiry id pairs the fan-out created for a query.
    pub async fn fetch_candidate_ids(
        &self,
        moving_query_id: i64,
    ) -> Result<CandidateIds, HaulioError> {
        let ids = self.store.candidate_ids(moving_query_id).await?;
        debug!(moving_query_id, candidates = ids.len(), "fan-out candidates fetched");
        Ok(ids)
    }

    /// Company detail rows for the given ids.
    pub async fn fetch_companies(
        &self,
        company_ids: &[i64],
    ) -> Result<Vec<MovingCompany>, HaulioError> {
        self.store.companies_by_ids(company_ids).await
    }

    /// Full current state of the given inquiry rows, one-shot.
    pub async fn fetch_inquiries(
        &self,
        inquiry_ids: &[i64],
    ) -> Result<Vec<MovingInquiry>, HaulioError> {
        self.store.inquiries_by_ids(inquiry_ids).await
    }

    /// The signed-in user's past searches, newest first.
    pub async fn past_searches(&self) -> Result<Vec<MovingQuery>, HaulioError> {
        let user_id = self
            .session
            .user_id()
            .ok_or(HaulioError::Auth(AuthFailure::SessionExpired))?;
        self.store.queries_by_user(&user_id).await
    }

    /// Places the outbound call for one inquiry, then optimistically marks it
    /// in progress locally and remotely.
    ///
    /// Idempotent at the state-machine level: an inquiry already `InProgress`
    /// or `Completed` is returned unchanged without touching the network, so
    /// repeated invocations can never regress state.
    pub async fn place_call(
        &self,
        inquiry: &MovingInquiry,
    ) -> Result<MovingInquiry, HaulioError> {
        if inquiry.status() != InquiryStatus::NotStarted {
            debug!(
                inquiry_id = inquiry.id,
                status = %inquiry.status(),
                "call already placed, ignoring"
            );
            return Ok(inquiry.clone());
        }

        let ack = self
            .dispatch
            .place_call(
                &inquiry.phone_number,
                inquiry.moving_company_id,
                inquiry.moving_query_id,
            )
            .await?;
        info!(inquiry_id = inquiry.id, ack = %ack, "outbound call placed");

        // The call is already in flight; if the remote flag write fails the
        // next poll reconciles, so this must not fail the whole command.
        if let Err(e) = self.store.set_inquiry_in_progress(inquiry.id).await {
            warn!(inquiry_id = inquiry.id, error = %e, "failed to mark inquiry in progress remotely");
        }

        let mut updated = inquiry.clone();
        updated.in_progress = true;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haulio_core::types::{Price, Session};
    use haulio_test_utils::{test_inquiry, MockCallDispatch, MockRowStore};

    fn draft() -> SearchDraft {
        SearchDraft {
            location_from: "St. Louis".into(),
            location_to: "Boston".into(),
            items: "Small".into(),
            items_details: "2 boxes".into(),
            availability: "2025-02-20T10:00:00Z".into(),
        }
    }

    fn signed_in_handle() -> Arc<SessionHandle> {
        let handle = Arc::new(SessionHandle::new());
        handle.publish(Session {
            user_id: "u1".into(),
            email: None,
            access_token: "at".into(),
            refresh_token: "rt".into(),
            expires_at: 4_102_444_800,
        });
        handle
    }

    struct Fixture {
        store: Arc<MockRowStore>,
        dispatch: Arc<MockCallDispatch>,
        sync: InquirySynchronizer,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MockRowStore::new());
        let dispatch = Arc::new(MockCallDispatch::new());
        let sync = InquirySynchronizer::new(
            Arc::clone(&store) as Arc<dyn RowStore>,
            Arc::clone(&dispatch) as Arc<dyn CallDispatch>,
            signed_in_handle(),
        );
        Fixture {
            store,
            dispatch,
            sync,
        }
    }

    #[tokio::test]
    async fn submit_search_then_fetch_candidates() {
        let f = fixture();
        f.dispatch.push_submit(Ok(9)).await;
        // Simulate the backend's fan-out creating rows for query 9.
        f.store.seed_inquiry(test_inquiry(101, 4, 9)).await;
        f.store.seed_inquiry(test_inquiry(102, 7, 9)).await;

        let query_id = f.sync.submit_search(draft()).await.unwrap();
        assert_eq!(query_id, 9);

        let ids = f.sync.fetch_candidate_ids(query_id).await.unwrap();
        assert!(!ids.is_empty());
        assert_eq!(ids.inquiry_ids.len(), ids.company_ids.len());
        assert_eq!(ids.inquiry_ids, vec![101, 102]);
    }

    #[tokio::test]
    async fn submit_search_requires_a_session() {
        let store = Arc::new(MockRowStore::new());
        let dispatch = Arc::new(MockCallDispatch::new());
        let sync = InquirySynchronizer::new(
            store as Arc<dyn RowStore>,
            dispatch as Arc<dyn CallDispatch>,
            Arc::new(SessionHandle::new()),
        );

        let err = sync.submit_search(draft()).await.unwrap_err();
        assert!(matches!(
            err,
            HaulioError::Auth(AuthFailure::SessionExpired)
        ));
    }

    #[tokio::test]
    async fn place_call_flips_the_flag_without_touching_price() {
        let f = fixture();
        f.store.seed_inquiry(test_inquiry(101, 4, 9)).await;
        let before = f.store.inquiry(101).await.unwrap();
        assert_eq!(before.status(), InquiryStatus::NotStarted);

        let updated = f.sync.place_call(&before).await.unwrap();
        assert!(updated.in_progress);
        assert_eq!(updated.price, Price::Unknown);
        assert_eq!(updated.status(), InquiryStatus::InProgress);

        // The remote row was updated too.
        let remote = f.store.inquiry(101).await.unwrap();
        assert!(remote.in_progress);
        assert_eq!(remote.price, Price::Unknown);

        let calls = f.dispatch.placed_calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].moving_company_id, 4);
        assert_eq!(calls[0].moving_query_id, 9);
    }

    #[tokio::test]
    async fn place_call_is_a_no_op_once_in_progress() {
        let f = fixture();
        let mut inquiry = test_inquiry(101, 4, 9);
        inquiry.in_progress = true;
        f.store.seed_inquiry(inquiry.clone()).await;

        let result = f.sync.place_call(&inquiry).await.unwrap();
        assert_eq!(result, inquiry);
        assert!(f.dispatch.placed_calls().await.is_empty());
    }

    #[tokio::test]
    async fn place_call_is_a_no_op_once_completed() {
        let f = fixture();
        let mut inquiry = test_inquiry(101, 4, 9);
        inquiry.in_progress = true;
        inquiry.price = Price::Priced(450);
        f.store.seed_inquiry(inquiry.clone()).await;

        let result = f.sync.place_call(&inquiry).await.unwrap();
        assert_eq!(result.status(), InquiryStatus::Completed);
        assert!(f.dispatch.placed_calls().await.is_empty());
    }

    #[tokio::test]
    async fn past_searches_are_scoped_to_the_user() {
        let f = fixture();
        f.store
            .seed_query(MovingQuery {
                id: 9,
                location_from: "St. Louis".into(),
                location_to: "Boston".into(),
                created_at: "2025-02-18T09:30:00Z".into(),
                items: "Small".into(),
                items_details: "2 boxes".into(),
                availability: "2025-02-20T10:00:00Z".into(),
                user_id: "u1".into(),
            })
            .await;
        f.store
            .seed_query(MovingQuery {
                id: 10,
                location_from: "Austin".into(),
                location_to: "Denver".into(),
                created_at: "2025-02-19T09:30:00Z".into(),
                items: "Large".into(),
                items_details: "whole house".into(),
                availability: "2025-03-01T08:00:00Z".into(),
                user_id: "someone-else".into(),
            })
            .await;

        let searches = f.sync.past_searches().await.unwrap();
        assert_eq!(searches.len(), 1);
        assert_eq!(searches[0].id, 9);
    }
}
