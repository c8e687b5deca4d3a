// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the haulio workspace.
//!
//! Wire field names follow the hosted row store's columns
//! (`moving_inquiry.phone_call_transcript`, `moving_query.location_from`, ...)
//! so these types serialize directly into backend requests and responses.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumString};

/// An authenticated user's token pair plus expiry, the unit of identity used
/// for all backend calls.
///
/// A session is either fully populated or treated as absent; partially
/// populated blobs are rejected at load time (see [`Session::is_complete`]).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub access_token: String,
    pub refresh_token: String,
    /// Expiry as epoch seconds.
    pub expires_at: i64,
}

impl Session {
    /// True when every identity-bearing field is populated.
    pub fn is_complete(&self) -> bool {
        !self.user_id.is_empty() && !self.access_token.is_empty() && !self.refresh_token.is_empty()
    }

    /// True when the session expires within `buffer_secs` of `now_epoch`
    /// (or is already past expiry).
    pub fn expires_within(&self, buffer_secs: i64, now_epoch: i64) -> bool {
        self.expires_at < now_epoch + buffer_secs
    }
}

// Token material must never leak through Debug output.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// A quoted price, replacing the row store's `-1` sentinel with a tagged state.
///
/// On the wire `Unknown` is written as `-1` and read from either `-1` or
/// `null`, so existing rows decode unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Price {
    #[default]
    Unknown,
    Priced(i64),
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Price::Unknown => serializer.serialize_i64(-1),
            Price::Priced(amount) => serializer.serialize_i64(*amount),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<i64>::deserialize(deserializer)?;
        Ok(match raw {
            None | Some(-1) => Price::Unknown,
            Some(amount) => Price::Priced(amount),
        })
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Price::Unknown => write!(f, "pending"),
            Price::Priced(amount) => write!(f, "${amount}"),
        }
    }
}

/// Where an inquiry sits in its call lifecycle.
///
/// Transitions are monotonic: `NotStarted -> InProgress` is caused by placing
/// a call, `InProgress -> Completed` only by the backend's own pipeline
/// writing a price. There is no way back to `NotStarted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum InquiryStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// One moving-company contact attempt, tied to one search and one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingInquiry {
    pub id: i64,
    pub moving_company_id: i64,
    pub moving_query_id: i64,
    pub created_at: String,
    pub phone_number: String,
    #[serde(default)]
    pub price: Price,
    pub in_progress: bool,
    #[serde(default)]
    pub call_duration: Option<f32>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(rename = "phone_call_transcript", default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub recording_url: Option<String>,
}

impl MovingInquiry {
    /// Derives the lifecycle state from the persisted flags.
    ///
    /// A priced row is `Completed` regardless of `in_progress` -- once the
    /// backend has written a result the call cannot be re-placed.
    pub fn status(&self) -> InquiryStatus {
        match (self.in_progress, self.price) {
            (false, Price::Unknown) => InquiryStatus::NotStarted,
            (true, Price::Unknown) => InquiryStatus::InProgress,
            (_, Price::Priced(_)) => InquiryStatus::Completed,
        }
    }
}

/// One search submission. Immutable after creation; many inquiries reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovingQuery {
    pub id: i64,
    pub location_from: String,
    pub location_to: String,
    pub created_at: String,
    pub items: String,
    pub items_details: String,
    pub availability: String,
    pub user_id: String,
}

/// A candidate moving company as stored in the row store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingCompany {
    pub id: i64,
    pub name: String,
    pub phone_number: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub user_ratings_total: Option<i64>,
}

/// Per-user profile row; exactly one per user, created lazily on first fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub security_question: Option<String>,
    #[serde(default)]
    pub security_answer_hash: Option<String>,
}

/// Self-service profile mutation; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_answer_hash: Option<String>,
}

/// Trip parameters submitted to the quote backend's search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    pub location_from: String,
    pub location_to: String,
    /// ISO-8601 submission timestamp.
    pub created_at: String,
    pub items: String,
    pub items_details: String,
    pub availability: String,
    pub user_id: Option<String>,
    pub inquiries: Vec<i64>,
}

/// Parallel id arrays produced by the backend's fan-out, used to know what to poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateIds {
    pub company_ids: Vec<i64>,
    pub inquiry_ids: Vec<i64>,
}

impl CandidateIds {
    pub fn is_empty(&self) -> bool {
        self.inquiry_ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inquiry_ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inquiry(in_progress: bool, price: Price) -> MovingInquiry {
        MovingInquiry {
            id: 7,
            moving_company_id: 3,
            moving_query_id: 11,
            created_at: "2025-02-20T10:00:00Z".into(),
            phone_number: "+13145550100".into(),
            price,
            in_progress,
            call_duration: None,
            summary: None,
            transcript: None,
            recording_url: None,
        }
    }

    #[test]
    fn status_follows_flags() {
        assert_eq!(
            inquiry(false, Price::Unknown).status(),
            InquiryStatus::NotStarted
        );
        assert_eq!(
            inquiry(true, Price::Unknown).status(),
            InquiryStatus::InProgress
        );
        assert_eq!(
            inquiry(true, Price::Priced(450)).status(),
            InquiryStatus::Completed
        );
        // A priced row is terminal even if the flag was never flipped.
        assert_eq!(
            inquiry(false, Price::Priced(450)).status(),
            InquiryStatus::Completed
        );
    }

    #[test]
    fn price_unknown_round_trips_as_sentinel() {
        let json = serde_json::to_string(&Price::Unknown).unwrap();
        assert_eq!(json, "-1");
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Price::Unknown);
    }

    #[test]
    fn price_decodes_null_as_unknown() {
        let back: Price = serde_json::from_str("null").unwrap();
        assert_eq!(back, Price::Unknown);
        let priced: Price = serde_json::from_str("450").unwrap();
        assert_eq!(priced, Price::Priced(450));
    }

    #[test]
    fn inquiry_round_trips_field_for_field() {
        let original = MovingInquiry {
            call_duration: Some(92.5),
            summary: Some("quoted $450 for a studio move".into()),
            transcript: Some("Agent: Hello ...".into()),
            recording_url: Some("https://recordings.example/7.mp3".into()),
            ..inquiry(true, Price::Priced(450))
        };
        let json = serde_json::to_string(&original).unwrap();
        let back: MovingInquiry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn inquiry_decodes_row_store_shape() {
        // Shape as returned by the row store, sentinel price and wire-named transcript.
        let json = r#"{
            "id": 42,
            "moving_company_id": 5,
            "moving_query_id": 9,
            "created_at": "2025-02-20T10:00:00Z",
            "phone_number": "+16175550188",
            "price": -1,
            "in_progress": false,
            "phone_call_transcript": null,
            "call_duration": null,
            "summary": null
        }"#;
        let inquiry: MovingInquiry = serde_json::from_str(json).unwrap();
        assert_eq!(inquiry.price, Price::Unknown);
        assert_eq!(inquiry.status(), InquiryStatus::NotStarted);
        assert!(inquiry.transcript.is_none());
    }

    #[test]
    fn incomplete_sessions_are_detected() {
        let mut session = Session {
            user_id: "u1".into(),
            email: None,
            access_token: "at".into(),
            refresh_token: "rt".into(),
            expires_at: 1_900_000_000,
        };
        assert!(session.is_complete());

        session.user_id = String::new();
        assert!(!session.is_complete());
    }

    #[test]
    fn session_expiry_buffer() {
        let session = Session {
            user_id: "u1".into(),
            email: None,
            access_token: "at".into(),
            refresh_token: "rt".into(),
            expires_at: 1_000,
        };
        assert!(session.expires_within(300, 800)); // 1000 < 800 + 300
        assert!(!session.expires_within(300, 600)); // 1000 >= 600 + 300
        assert!(session.expires_within(0, 1_001)); // already past
    }

    #[test]
    fn session_debug_redacts_tokens() {
        let session = Session {
            user_id: "u1".into(),
            email: Some("mover@example.com".into()),
            access_token: "secret-access".into(),
            refresh_token: "secret-refresh".into(),
            expires_at: 0,
        };
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret-access"));
        assert!(!rendered.contains("secret-refresh"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn inquiry_status_display_round_trip() {
        use std::str::FromStr;
        for status in [
            InquiryStatus::NotStarted,
            InquiryStatus::InProgress,
            InquiryStatus::Completed,
        ] {
            let s = status.to_string();
            assert_eq!(InquiryStatus::from_str(&s).unwrap(), status);
        }
    }
}
