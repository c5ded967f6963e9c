// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::protocol::NetworkStatus;

/// Last known reachability of the remote API.
///
/// Recomputed by probing; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectivityState {
    pub reachable: bool,
    pub last_checked_at: Option<DateTime<Utc>>,
}

impl ConnectivityState {
    /// Record the outcome of a check made at `at`.
    pub fn checked(reachable: bool, at: DateTime<Utc>) -> Self {
        ConnectivityState {
            reachable,
            last_checked_at: Some(at),
        }
    }

    pub fn status(&self) -> NetworkStatus {
        if self.reachable {
            NetworkStatus::Online
        } else {
            NetworkStatus::Offline
        }
    }
}
