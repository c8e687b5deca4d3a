// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `haulio watch` -- live view of a search's inquiries.
//!
//! Starts a poll subscription over the search's inquiry rows and reprints
//! the snapshot whenever it changes, until SIGINT/SIGTERM cancels the poll.

use haulio_core::error::HaulioError;
use haulio_core::types::{InquiryStatus, MovingInquiry};
use haulio_sync::{InquiryPoller, InquirySynchronizer};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Installs handlers for SIGTERM and SIGINT (Ctrl+C).
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is
/// received.
fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm =
                signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

            tokio::select! {
                _ = ctrl_c => {
                    info!("received SIGINT (Ctrl+C), stopping watch");
                }
                _ = sigterm.recv() => {
                    info!("received SIGTERM, stopping watch");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, stopping watch");
        }

        token_clone.cancel();
        debug!("watch signal handler completed");
    });

    token
}

pub async fn run_watch(
    sync: &InquirySynchronizer,
    poller: &InquiryPoller,
    moving_query_id: i64,
) -> Result<(), HaulioError> {
    let candidates = sync.fetch_candidate_ids(moving_query_id).await?;
    if candidates.is_empty() {
        println!("no inquiries for search {moving_query_id} yet -- the fan-out may still be running");
        return Ok(());
    }

    println!(
        "watching {} inquiries for search {moving_query_id} (Ctrl+C to stop)",
        candidates.len()
    );

    let handle = poller.start(candidates.inquiry_ids.clone());
    let mut rx = handle.subscribe();
    let stop = install_signal_handler();

    loop {
        tokio::select! {
            _ = stop.cancelled() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                print_snapshot(&snapshot);
                if snapshot
                    .iter()
                    .all(|i| i.status() == InquiryStatus::Completed)
                {
                    println!("all quotes are in");
                    break;
                }
            }
        }
    }

    handle.stop().await;
    Ok(())
}

fn print_snapshot(snapshot: &[MovingInquiry]) {
    println!("---");
    for inquiry in snapshot {
        println!(
            "inquiry {}  company {}  {}  {}",
            inquiry.id,
            inquiry.moving_company_id,
            inquiry.status(),
            inquiry.price,
        );
    }
}
