// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Search-side subcommands: submit a search, list past searches, place a
//! call, show a transcript.

use clap::{Args, ValueEnum};
use haulio_core::error::HaulioError;
use haulio_core::types::{InquiryStatus, MovingInquiry};
use haulio_sync::{InquirySynchronizer, SearchDraft};

/// How much is being moved; the labels match what the quote backend expects.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum MoveSize {
    #[default]
    Small,
    Medium,
    Large,
}

impl MoveSize {
    fn label(self) -> &'static str {
        match self {
            MoveSize::Small => "Small (1-10 small items)",
            MoveSize::Medium => "Medium (1-5 small items, 1-3 large items)",
            MoveSize::Large => "Large (5+ all large items)",
        }
    }
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Where the move starts.
    #[arg(long)]
    pub from: String,

    /// Where the move ends.
    #[arg(long)]
    pub to: String,

    /// Size of the move.
    #[arg(long, value_enum, default_value = "small")]
    pub size: MoveSize,

    /// Free-form description of the items.
    #[arg(long)]
    pub details: String,

    /// When you are available, ISO-8601.
    #[arg(long)]
    pub date: String,
}

pub async fn run_search(
    sync: &InquirySynchronizer,
    args: SearchArgs,
) -> Result<(), HaulioError> {
    let query_id = sync
        .submit_search(SearchDraft {
            location_from: args.from.clone(),
            location_to: args.to.clone(),
            items: args.size.label().to_string(),
            items_details: args.details,
            availability: args.date,
        })
        .await?;

    let candidates = sync.fetch_candidate_ids(query_id).await?;
    if candidates.is_empty() {
        println!(
            "search {query_id} submitted; no candidates yet -- try `haulio watch {query_id}`"
        );
        return Ok(());
    }

    let companies = sync.fetch_companies(&candidates.company_ids).await?;
    println!(
        "search {query_id}: {} candidate companies for {} -> {}",
        candidates.len(),
        args.from,
        args.to
    );
    for (inquiry_id, company_id) in candidates
        .inquiry_ids
        .iter()
        .zip(candidates.company_ids.iter())
    {
        let name = companies
            .iter()
            .find(|c| c.id == *company_id)
            .map(|c| c.name.as_str())
            .unwrap_or("(unknown company)");
        println!("  inquiry {inquiry_id}  {name}");
    }
    println!("place a call with `haulio call <inquiry-id>`, then `haulio watch {query_id}`");
    Ok(())
}

pub async fn run_past(sync: &InquirySynchronizer) -> Result<(), HaulioError> {
    let searches = sync.past_searches().await?;
    if searches.is_empty() {
        println!("no past searches");
        return Ok(());
    }
    for query in searches {
        println!(
            "{}  {} -> {}  ({})",
            query.id, query.location_from, query.location_to, query.created_at
        );
    }
    Ok(())
}

pub async fn run_call(sync: &InquirySynchronizer, inquiry_id: i64) -> Result<(), HaulioError> {
    let inquiry = fetch_one(sync, inquiry_id).await?;

    match inquiry.status() {
        InquiryStatus::NotStarted => {
            let updated = sync.place_call(&inquiry).await?;
            println!(
                "calling company {} for inquiry {} -- watch query {} for the quote",
                updated.moving_company_id, updated.id, updated.moving_query_id
            );
        }
        status => {
            // The action is disabled once a call is under way; saying so beats
            // silently doing nothing.
            println!("inquiry {inquiry_id} is already {status}, nothing to do");
        }
    }
    Ok(())
}

pub async fn run_transcript(
    sync: &InquirySynchronizer,
    inquiry_id: i64,
) -> Result<(), HaulioError> {
    let inquiry = fetch_one(sync, inquiry_id).await?;

    println!("inquiry {} ({})", inquiry.id, inquiry.status());
    println!("price: {}", inquiry.price);
    if let Some(duration) = inquiry.call_duration {
        println!("call duration: {duration:.0}s");
    }
    if let Some(summary) = &inquiry.summary {
        println!("\nsummary:\n{summary}");
    }
    match &inquiry.transcript {
        Some(transcript) => println!("\ntranscript:\n{transcript}"),
        None => println!("\nno transcript yet"),
    }
    if let Some(url) = &inquiry.recording_url {
        println!("\nrecording: {url}");
    }
    Ok(())
}

async fn fetch_one(
    sync: &InquirySynchronizer,
    inquiry_id: i64,
) -> Result<MovingInquiry, HaulioError> {
    sync.fetch_inquiries(&[inquiry_id])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| HaulioError::NotFound {
            what: format!("inquiry {inquiry_id}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_size_labels_match_backend_vocabulary() {
        assert_eq!(MoveSize::Small.label(), "Small (1-10 small items)");
        assert_eq!(
            MoveSize::Medium.label(),
            "Medium (1-5 small items, 1-3 large items)"
        );
        assert_eq!(MoveSize::Large.label(), "Large (5+ all large items)");
    }
}
