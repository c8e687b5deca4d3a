// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row store interface: the hosted, row-oriented data store holding
//! `profiles`, `moving_query`, `moving_inquiry`, and `moving_company`.

use async_trait::async_trait;

use crate::error::HaulioError;
use crate::types::{
    CandidateIds, MovingCompany, MovingInquiry, MovingQuery, Profile, ProfileUpdate,
};

/// Equality/membership-filtered access to the four backend tables.
///
/// The client only reads and issues targeted updates; row creation for
/// queries and inquiries happens server-side during fan-out.
#[async_trait]
pub trait RowStore: Send + Sync + 'static {
    /// Single-row profile lookup by email. `Ok(None)` when absent.
    async fn profile_by_email(&self, email: &str) -> Result<Option<Profile>, HaulioError>;

    /// Single-row profile lookup by user id. `Ok(None)` when absent.
    async fn profile_by_user_id(&self, user_id: &str) -> Result<Option<Profile>, HaulioError>;

    /// Inserts a new profile row. Optional fields serialize as nulls.
    async fn insert_profile(&self, profile: &Profile) -> Result<(), HaulioError>;

    /// Applies a partial update to the profile row matching `user_id`.
    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<(), HaulioError>;

    /// The company/inquiry id pairs created by the fan-out for one query.
    async fn candidate_ids(&self, moving_query_id: i64) -> Result<CandidateIds, HaulioError>;

    /// Full current state of the given inquiry rows.
    async fn inquiries_by_ids(&self, ids: &[i64]) -> Result<Vec<MovingInquiry>, HaulioError>;

    /// Company detail rows for the given ids.
    async fn companies_by_ids(&self, ids: &[i64]) -> Result<Vec<MovingCompany>, HaulioError>;

    /// All queries previously submitted by a user, newest first.
    async fn queries_by_user(&self, user_id: &str) -> Result<Vec<MovingQuery>, HaulioError>;

    /// Optimistically marks an inquiry's call as started.
    async fn set_inquiry_in_progress(&self, inquiry_id: i64) -> Result<(), HaulioError>;
}
