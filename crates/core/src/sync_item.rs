// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Mutating requests captured while offline, awaiting replay.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id;

/// Number of failed replays after which a queued request is abandoned.
pub const MAX_REPLAY_ATTEMPTS: u32 = 3;

/// A captured POST waiting to be replayed against the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncQueueItem {
    pub id: String,
    pub target_url: String,
    pub body: serde_json::Value,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub attempts: u32,
}

impl SyncQueueItem {
    /// A fresh item with no replay attempts.
    pub fn new(
        target_url: impl Into<String>,
        body: serde_json::Value,
        created_at: DateTime<Utc>,
    ) -> Self {
        SyncQueueItem {
            id: id::queue_item_id(&created_at),
            target_url: target_url.into(),
            body,
            created_at,
            attempts: 0,
        }
    }

    /// Count one failed replay. Returns the new attempt count.
    pub fn record_failure(&mut self) -> u32 {
        self.attempts = self.attempts.saturating_add(1);
        self.attempts
    }

    /// True once the item has failed `max_attempts` times.
    pub fn is_exhausted(&self, max_attempts: u32) -> bool {
        self.attempts >= max_attempts
    }
}

#[cfg(test)]
#[path = "sync_item_tests.rs"]
mod tests;
