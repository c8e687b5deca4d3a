// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-interval inquiry polling.
//!
//! There is no push channel from the backend: the poller re-fetches the full
//! state of the watched inquiry rows every tick and republishes them
//! wholesale through a `watch` channel. Cycles are serialized -- the fetch
//! runs inline in the interval loop with skip-tick semantics, so a slow
//! round trip drops ticks instead of overlapping publishes. A tick that
//! fails transiently is logged and swallowed; the loop retries on the next
//! tick.

use std::sync::Arc;
use std::time::Duration;

use haulio_core::traits::RowStore;
use haulio_core::types::MovingInquiry;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, warn};

/// Spawns polling tasks over a row store.
pub struct InquiryPoller {
    store: Arc<dyn RowStore>,
    interval: Duration,
}

/// A running poll subscription.
///
/// Cancelling (or dropping) the handle deterministically stops the task, so
/// a dismissed screen can never leak its timer.
pub struct PollHandle {
    token: CancellationToken,
    rx: watch::Receiver<Vec<MovingInquiry>>,
    task: JoinHandle<()>,
    _cancel_on_drop: DropGuard,
}

impl PollHandle {
    /// A receiver for published snapshots. The initial value is empty until
    /// the first fetch completes.
    pub fn subscribe(&self) -> watch::Receiver<Vec<MovingInquiry>> {
        self.rx.clone()
    }

    /// Stops the polling task.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Cancels and waits for the task to finish.
    pub async fn stop(self) {
        self.token.cancel();
        let _ = self.task.await;
    }
}

impl InquiryPoller {
    pub fn new(store: Arc<dyn RowStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Starts polling the given inquiry rows until the handle is cancelled.
    pub fn start(&self, inquiry_ids: Vec<i64>) -> PollHandle {
        let (tx, rx) = watch::channel(Vec::new());
        let token = CancellationToken::new();
        let task = tokio::spawn(poll_loop(
            Arc::clone(&self.store),
            inquiry_ids,
            self.interval,
            tx,
            token.clone(),
        ));
        PollHandle {
            rx,
            task,
            _cancel_on_drop: token.clone().drop_guard(),
            token,
        }
    }
}

async fn poll_loop(
    store: Arc<dyn RowStore>,
    inquiry_ids: Vec<i64>,
    interval: Duration,
    tx: watch::Sender<Vec<MovingInquiry>>,
    token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    // A tick that fires while the previous fetch is still in flight is
    // dropped; cycles never overlap and snapshots publish in order.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                debug!("inquiry polling cancelled");
                return;
            }
            _ = ticker.tick() => {
                match store.inquiries_by_ids(&inquiry_ids).await {
                    Ok(snapshot) => {
                        debug!(count = snapshot.len(), "inquiry snapshot fetched");
                        if tx.send(snapshot).is_err() {
                            // Every receiver is gone; nothing left to publish to.
                            debug!("all poll subscribers dropped, stopping");
                            return;
                        }
                    }
                    Err(e) if e.is_transient_read_failure() => {
                        warn!(error = %e, "inquiry poll tick failed, will retry");
                    }
                    Err(e) => {
                        // Anything other than a transport hiccup (an expired
                        // session, a misconfigured store) will not heal on
                        // its own; retrying every tick would just spam.
                        warn!(error = %e, "inquiry polling stopped");
                        return;
                    }
                }
            }
        }
    }
}
