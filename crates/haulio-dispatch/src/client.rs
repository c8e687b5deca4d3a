// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the quote backend.
//!
//! Provides [`DispatchClient`], which implements [`CallDispatch`]: submitting
//! a search (the backend fans it out to candidate companies asynchronously)
//! and triggering an outbound call for one company/inquiry pair.

use std::time::Duration;

use async_trait::async_trait;
use haulio_config::model::DispatchConfig;
use haulio_core::error::HaulioError;
use haulio_core::traits::CallDispatch;
use haulio_core::types::SearchParams;
use serde::Deserialize;
use tracing::debug;

/// Response from the search endpoint; only the created query id matters to
/// the client, candidate rows appear in the row store later.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    moving_query_id: i64,
}

/// HTTP client for quote backend communication.
#[derive(Debug, Clone)]
pub struct DispatchClient {
    client: reqwest::Client,
    base_url: String,
}

impl DispatchClient {
    /// Creates a new quote backend client from configuration.
    ///
    /// The timeout is configurable because search submission blocks on the
    /// backend's candidate lookup before it answers.
    pub fn new(config: &DispatchConfig) -> Result<Self, HaulioError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HaulioError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl CallDispatch for DispatchClient {
    async fn submit_search(&self, params: &SearchParams) -> Result<i64, HaulioError> {
        let response = self
            .client
            .post(format!("{}/get_moving_companies/", self.base_url))
            .json(params)
            .send()
            .await
            .map_err(HaulioError::network)?;

        let status = response.status();
        debug!(status = %status, from = %params.location_from, to = %params.location_to,
            "search submission response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HaulioError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await.map_err(HaulioError::network)?;
        let parsed: SearchResponse =
            serde_json::from_str(&text).map_err(HaulioError::decode)?;
        Ok(parsed.moving_query_id)
    }

    async fn place_call(
        &self,
        phone_number: &str,
        moving_company_id: i64,
        moving_query_id: i64,
    ) -> Result<String, HaulioError> {
        let response = self
            .client
            .post(format!("{}/call_moving_companies/", self.base_url))
            .query(&[
                ("moving_company_number", phone_number.to_string()),
                ("moving_company_id", moving_company_id.to_string()),
                ("moving_query_id", moving_query_id.to_string()),
            ])
            .send()
            .await
            .map_err(HaulioError::network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HaulioError::Server {
                status: status.as_u16(),
                body,
            });
        }

        // The body is an opaque acknowledgement, kept only for diagnostics.
        let body = response.text().await.map_err(HaulioError::network)?;
        debug!(moving_company_id, moving_query_id, body = %body,
            "call placement acknowledged");
        Ok(body)
    }
}
