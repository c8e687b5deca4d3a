// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the hosted row store.
//!
//! Provides [`StoreClient`], which implements [`RowStore`] over a
//! PostgREST-style surface: equality filters (`col=eq.v`), membership
//! filters (`id=in.(1,2)`), inserts, and filtered updates. Requests carry
//! the publishable API key; when a user session is present its bearer token
//! is attached so row-level policies see the caller's identity.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use haulio_config::model::StoreConfig;
use haulio_core::error::HaulioError;
use haulio_core::session::SessionHandle;
use haulio_core::traits::RowStore;
use haulio_core::types::{
    CandidateIds, MovingCompany, MovingInquiry, MovingQuery, Profile, ProfileUpdate,
};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

/// HTTP client for row store communication.
#[derive(Debug, Clone)]
pub struct StoreClient {
    client: reqwest::Client,
    base_url: String,
    session: Arc<SessionHandle>,
}

/// Projection used by the candidate-id fetch: one row per fan-out inquiry.
#[derive(Debug, Deserialize)]
struct CandidateRow {
    id: i64,
    moving_company_id: i64,
}

impl StoreClient {
    /// Creates a new row store client from configuration.
    ///
    /// `session` is read-only here; the session manager owns writes to it.
    pub fn new(config: &StoreConfig, session: Arc<SessionHandle>) -> Result<Self, HaulioError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(&config.api_key)
                .map_err(|e| HaulioError::Config(format!("invalid store.api_key: {e}")))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| HaulioError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    /// Attaches the caller's bearer token when signed in.
    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.access_token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn select_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, HaulioError> {
        let response = self
            .authorize(self.client.get(self.table_url(table)).query(query))
            .send()
            .await
            .map_err(HaulioError::network)?;

        let status = response.status();
        debug!(table, status = %status, "row select response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HaulioError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await.map_err(HaulioError::network)?;
        serde_json::from_str(&text).map_err(HaulioError::decode)
    }

    async fn write(
        &self,
        req: reqwest::RequestBuilder,
        table: &str,
    ) -> Result<(), HaulioError> {
        let response = self
            .authorize(req.header("prefer", "return=minimal"))
            .send()
            .await
            .map_err(HaulioError::network)?;

        let status = response.status();
        debug!(table, status = %status, "row write response received");

        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(HaulioError::Server {
            status: status.as_u16(),
            body,
        })
    }
}

/// Renders a PostgREST membership filter: `in.(1,2,3)`.
fn membership(ids: &[i64]) -> String {
    let joined = ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("in.({joined})")
}

#[async_trait]
impl RowStore for StoreClient {
    async fn profile_by_email(&self, email: &str) -> Result<Option<Profile>, HaulioError> {
        let rows: Vec<Profile> = self
            .select_rows(
                "profiles",
                &[
                    ("email", format!("eq.{email}")),
                    ("select", "*".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn profile_by_user_id(&self, user_id: &str) -> Result<Option<Profile>, HaulioError> {
        let rows: Vec<Profile> = self
            .select_rows(
                "profiles",
                &[
                    ("user_id", format!("eq.{user_id}")),
                    ("select", "*".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<(), HaulioError> {
        self.write(
            self.client.post(self.table_url("profiles")).json(profile),
            "profiles",
        )
        .await
    }

    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<(), HaulioError> {
        self.write(
            self.client
                .patch(self.table_url("profiles"))
                .query(&[("user_id", format!("eq.{user_id}"))])
                .json(update),
            "profiles",
        )
        .await
    }

    async fn candidate_ids(&self, moving_query_id: i64) -> Result<CandidateIds, HaulioError> {
        let rows: Vec<CandidateRow> = self
            .select_rows(
                "moving_inquiry",
                &[
                    ("moving_query_id", format!("eq.{moving_query_id}")),
                    ("select", "id,moving_company_id".to_string()),
                ],
            )
            .await?;

        // One source row per pair keeps the two arrays parallel by construction.
        let mut ids = CandidateIds::default();
        for row in rows {
            ids.inquiry_ids.push(row.id);
            ids.company_ids.push(row.moving_company_id);
        }
        Ok(ids)
    }

    async fn inquiries_by_ids(&self, ids: &[i64]) -> Result<Vec<MovingInquiry>, HaulioError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.select_rows(
            "moving_inquiry",
            &[("id", membership(ids)), ("select", "*".to_string())],
        )
        .await
    }

    async fn companies_by_ids(&self, ids: &[i64]) -> Result<Vec<MovingCompany>, HaulioError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.select_rows(
            "moving_company",
            &[("id", membership(ids)), ("select", "*".to_string())],
        )
        .await
    }

    async fn queries_by_user(&self, user_id: &str) -> Result<Vec<MovingQuery>, HaulioError> {
        self.select_rows(
            "moving_query",
            &[
                ("user_id", format!("eq.{user_id}")),
                ("select", "*".to_string()),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }

    async fn set_inquiry_in_progress(&self, inquiry_id: i64) -> Result<(), HaulioError> {
        self.write(
            self.client
                .patch(self.table_url("moving_inquiry"))
                .query(&[("id", format!("eq.{inquiry_id}"))])
                .json(&serde_json::json!({ "in_progress": true })),
            "moving_inquiry",
        )
        .await
    }
}
