// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync queue manager.
//!
//! Captured requests are persisted in the local store under `sync_queue`
//! and replayed in enqueue order. Only one replay pass may run at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use offsync_core::{SyncFailure, SyncQueueItem};

use crate::api::ApiClient;
use crate::notify::ClientNotifier;
use crate::store::{LocalStore, StoreError};

/// Error type for queue operations.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Another replay pass has not finished yet.
    #[error("replay already in progress")]
    ReplayInProgress,
}

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Outcome of one replay pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Items delivered and removed.
    pub synced: usize,
    /// Items that failed and stay queued.
    pub retried: usize,
    /// Items dropped after their last allowed attempt.
    pub abandoned: Vec<SyncFailure>,
}

/// Clears the in-flight flag when a pass ends, including on cancellation.
struct ReplayGuard<'a>(&'a AtomicBool);

impl Drop for ReplayGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Persisted queue of failed POSTs awaiting replay.
pub struct SyncQueue {
    store: LocalStore,
    api: ApiClient,
    notifier: Arc<ClientNotifier>,
    max_attempts: u32,
    replaying: AtomicBool,
    replay_requested: AtomicBool,
}

impl SyncQueue {
    pub fn new(
        store: LocalStore,
        api: ApiClient,
        notifier: Arc<ClientNotifier>,
        max_attempts: u32,
    ) -> Self {
        SyncQueue {
            store,
            api,
            notifier,
            max_attempts: max_attempts.max(1),
            replaying: AtomicBool::new(false),
            replay_requested: AtomicBool::new(false),
        }
    }

    /// Persist a failed request for later replay.
    ///
    /// Also asks for a replay once connectivity returns and tells the user
    /// the request was saved.
    pub fn capture(
        &self,
        target_url: &str,
        body: serde_json::Value,
    ) -> QueueResult<SyncQueueItem> {
        let item = SyncQueueItem::new(target_url, body, Utc::now());
        self.store.push_queue_item(item.clone())?;
        self.replay_requested.store(true, Ordering::Release);
        tracing::info!("queued {} for replay as {}", target_url, item.id);

        self.notifier.notify(self.notifier.notification(
            "Saved offline",
            "Your request will be sent when the connection returns.",
            "sync-queued",
        ));
        Ok(item)
    }

    /// Replay every queued item once.
    ///
    /// Outcomes are applied to the queue as it is at that moment, so items
    /// captured while the pass is running are kept.
    pub async fn replay_all(&self) -> QueueResult<ReplayReport> {
        if self
            .replaying
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(QueueError::ReplayInProgress);
        }
        let _guard = ReplayGuard(&self.replaying);
        self.replay_requested.store(false, Ordering::Release);

        let snapshot = self.store.queue()?;
        let mut report = ReplayReport::default();
        if snapshot.is_empty() {
            return Ok(report);
        }
        tracing::info!("replaying {} queued request(s)", snapshot.len());

        for item in snapshot {
            match self.api.post_json(&item.target_url, &item.body).await {
                Ok(_) => {
                    self.remove(&item.id)?;
                    report.synced += 1;
                    tracing::debug!("replayed {}", item.id);
                }
                Err(e) => match self.record_failure(&item.id)? {
                    Some(updated) if updated.is_exhausted(self.max_attempts) => {
                        tracing::error!(
                            "DATA LOSS: dropping queued request {} to {} after {} failed attempts: {}",
                            updated.id,
                            updated.target_url,
                            updated.attempts,
                            e
                        );
                        report.abandoned.push(SyncFailure::QueueExhausted {
                            id: updated.id,
                            target_url: updated.target_url,
                            attempts: updated.attempts,
                        });
                    }
                    Some(updated) => {
                        tracing::warn!(
                            "replay of {} failed (attempt {}/{}): {}",
                            updated.id,
                            updated.attempts,
                            self.max_attempts,
                            e
                        );
                        report.retried += 1;
                    }
                    None => {}
                },
            }
        }

        if report.synced > 0 {
            self.notifier.notify(
                self.notifier.notification(
                    "Sync complete",
                    &format!("{} item(s) synchronized.", report.synced),
                    "sync-complete",
                ),
            );
            self.notifier
                .broadcast(&offsync_core::WorkerMessage::sync_complete(report.synced));
        }
        Ok(report)
    }

    fn remove(&self, id: &str) -> QueueResult<()> {
        self.store.update_queue(|items| {
            let before = items.len();
            items.retain(|i| i.id != id);
            (items.len() != before).then_some(())
        })?;
        Ok(())
    }

    /// Count a failure against the live copy of `id`, dropping it once
    /// exhausted. Returns the updated item, or `None` if it is gone.
    fn record_failure(&self, id: &str) -> QueueResult<Option<SyncQueueItem>> {
        let max_attempts = self.max_attempts;
        let updated = self.store.update_queue(|items| {
            let pos = items.iter().position(|i| i.id == id)?;
            items[pos].record_failure();
            if items[pos].is_exhausted(max_attempts) {
                Some(items.remove(pos))
            } else {
                Some(items[pos].clone())
            }
        })?;
        Ok(updated)
    }

    pub fn pending_count(&self) -> QueueResult<usize> {
        Ok(self.store.queue()?.len())
    }

    pub fn items(&self) -> QueueResult<Vec<SyncQueueItem>> {
        Ok(self.store.queue()?)
    }

    /// Consume a pending replay request.
    pub fn take_replay_request(&self) -> bool {
        self.replay_requested.swap(false, Ordering::AcqRel)
    }

    pub fn is_replaying(&self) -> bool {
        self.replaying.load(Ordering::Acquire)
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
