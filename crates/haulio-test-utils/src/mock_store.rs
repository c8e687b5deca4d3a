// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory row store for deterministic testing.
//!
//! Behaves like the hosted store's tables: profiles keyed by user id,
//! inquiries and companies keyed by row id. `fail_reads(n)` injects `n`
//! transient failures into subsequent reads, for exercising the polling
//! loop's swallow-and-retry behavior.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use haulio_core::error::HaulioError;
use haulio_core::traits::RowStore;
use haulio_core::types::{
    CandidateIds, MovingCompany, MovingInquiry, MovingQuery, Price, Profile, ProfileUpdate,
};

/// Builds a fan-out inquiry row in the `NotStarted` state.
pub fn test_inquiry(id: i64, company_id: i64, query_id: i64) -> MovingInquiry {
    MovingInquiry {
        id,
        moving_company_id: company_id,
        moving_query_id: query_id,
        created_at: "2025-02-20T10:00:00Z".into(),
        phone_number: format!("+1314555{id:04}"),
        price: Price::Unknown,
        in_progress: false,
        call_duration: None,
        summary: None,
        transcript: None,
        recording_url: None,
    }
}

/// A mock row store backed by in-memory tables.
#[derive(Default)]
pub struct MockRowStore {
    profiles: Mutex<HashMap<String, Profile>>,
    inquiries: Mutex<HashMap<i64, MovingInquiry>>,
    companies: Mutex<HashMap<i64, MovingCompany>>,
    queries: Mutex<Vec<MovingQuery>>,
    pending_read_failures: Mutex<u32>,
}

impl MockRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an inquiry row (as the backend's fan-out would).
    pub async fn seed_inquiry(&self, inquiry: MovingInquiry) {
        self.inquiries.lock().await.insert(inquiry.id, inquiry);
    }

    /// Seed a company row.
    pub async fn seed_company(&self, company: MovingCompany) {
        self.companies.lock().await.insert(company.id, company);
    }

    /// Seed a past query row.
    pub async fn seed_query(&self, query: MovingQuery) {
        self.queries.lock().await.push(query);
    }

    /// Overwrite an inquiry wholesale (as the backend's call pipeline would).
    pub async fn complete_inquiry(&self, inquiry: MovingInquiry) {
        self.inquiries.lock().await.insert(inquiry.id, inquiry);
    }

    /// Make the next `n` reads fail with a transient server error.
    pub async fn fail_reads(&self, n: u32) {
        *self.pending_read_failures.lock().await = n;
    }

    /// Current state of one inquiry, for assertions.
    pub async fn inquiry(&self, id: i64) -> Option<MovingInquiry> {
        self.inquiries.lock().await.get(&id).cloned()
    }

    async fn check_read_failure(&self) -> Result<(), HaulioError> {
        let mut pending = self.pending_read_failures.lock().await;
        if *pending > 0 {
            *pending -= 1;
            return Err(HaulioError::Server {
                status: 503,
                body: "injected failure".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RowStore for MockRowStore {
    async fn profile_by_email(&self, email: &str) -> Result<Option<Profile>, HaulioError> {
        self.check_read_failure().await?;
        Ok(self
            .profiles
            .lock()
            .await
            .values()
            .find(|p| p.email.as_deref() == Some(email))
            .cloned())
    }

    async fn profile_by_user_id(&self, user_id: &str) -> Result<Option<Profile>, HaulioError> {
        self.check_read_failure().await?;
        Ok(self.profiles.lock().await.get(user_id).cloned())
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<(), HaulioError> {
        self.profiles
            .lock()
            .await
            .insert(profile.user_id.clone(), profile.clone());
        Ok(())
    }

    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<(), HaulioError> {
        let mut profiles = self.profiles.lock().await;
        let profile = profiles
            .entry(user_id.to_string())
            .or_insert_with(|| Profile {
                user_id: user_id.to_string(),
                full_name: None,
                email: None,
                security_question: None,
                security_answer_hash: None,
            });
        if let Some(full_name) = &update.full_name {
            profile.full_name = Some(full_name.clone());
        }
        if let Some(email) = &update.email {
            profile.email = Some(email.clone());
        }
        if let Some(question) = &update.security_question {
            profile.security_question = Some(question.clone());
        }
        if let Some(hash) = &update.security_answer_hash {
            profile.security_answer_hash = Some(hash.clone());
        }
        Ok(())
    }

    async fn candidate_ids(&self, moving_query_id: i64) -> Result<CandidateIds, HaulioError> {
        self.check_read_failure().await?;
        let inquiries = self.inquiries.lock().await;
        let mut rows: Vec<&MovingInquiry> = inquiries
            .values()
            .filter(|i| i.moving_query_id == moving_query_id)
            .collect();
        rows.sort_by_key(|i| i.id);

        let mut ids = CandidateIds::default();
        for row in rows {
            ids.inquiry_ids.push(row.id);
            ids.company_ids.push(row.moving_company_id);
        }
        Ok(ids)
    }

    async fn inquiries_by_ids(&self, ids: &[i64]) -> Result<Vec<MovingInquiry>, HaulioError> {
        self.check_read_failure().await?;
        let inquiries = self.inquiries.lock().await;
        Ok(ids
            .iter()
            .filter_map(|id| inquiries.get(id).cloned())
            .collect())
    }

    async fn companies_by_ids(&self, ids: &[i64]) -> Result<Vec<MovingCompany>, HaulioError> {
        self.check_read_failure().await?;
        let companies = self.companies.lock().await;
        Ok(ids
            .iter()
            .filter_map(|id| companies.get(id).cloned())
            .collect())
    }

    async fn queries_by_user(&self, user_id: &str) -> Result<Vec<MovingQuery>, HaulioError> {
        self.check_read_failure().await?;
        let mut queries: Vec<MovingQuery> = self
            .queries
            .lock()
            .await
            .iter()
            .filter(|q| q.user_id == user_id)
            .cloned()
            .collect();
        queries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(queries)
    }

    async fn set_inquiry_in_progress(&self, inquiry_id: i64) -> Result<(), HaulioError> {
        let mut inquiries = self.inquiries.lock().await;
        match inquiries.get_mut(&inquiry_id) {
            Some(inquiry) => {
                inquiry.in_progress = true;
                Ok(())
            }
            None => Err(HaulioError::NotFound {
                what: format!("moving_inquiry {inquiry_id}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeded_inquiries_produce_parallel_candidate_ids() {
        let store = MockRowStore::new();
        store.seed_inquiry(test_inquiry(101, 4, 9)).await;
        store.seed_inquiry(test_inquiry(102, 7, 9)).await;
        store.seed_inquiry(test_inquiry(201, 5, 10)).await;

        let ids = store.candidate_ids(9).await.unwrap();
        assert_eq!(ids.inquiry_ids, vec![101, 102]);
        assert_eq!(ids.company_ids, vec![4, 7]);
    }

    #[tokio::test]
    async fn injected_failures_are_consumed() {
        let store = MockRowStore::new();
        store.seed_inquiry(test_inquiry(101, 4, 9)).await;
        store.fail_reads(1).await;

        assert!(store.inquiries_by_ids(&[101]).await.is_err());
        assert_eq!(store.inquiries_by_ids(&[101]).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn set_in_progress_flips_only_the_flag() {
        let store = MockRowStore::new();
        store.seed_inquiry(test_inquiry(101, 4, 9)).await;

        store.set_inquiry_in_progress(101).await.unwrap();
        let inquiry = store.inquiry(101).await.unwrap();
        assert!(inquiry.in_progress);
        assert_eq!(inquiry.price, Price::Unknown);
    }
}
