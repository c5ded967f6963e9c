// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reachability checks against the remote API.
//!
//! The platform's link-layer online flag says nothing about whether the API
//! answers, so reachability is decided by a `HEAD` request to the health
//! endpoint with a hard deadline.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::Utc;
use offsync_core::ConnectivityState;

use crate::net::{Network, Request};

/// Probes the health endpoint and remembers the last result.
pub struct ConnectivityProber {
    network: Arc<dyn Network>,
    health_url: String,
    timeout: Duration,
    state: RwLock<ConnectivityState>,
}

impl ConnectivityProber {
    pub fn new(network: Arc<dyn Network>, health_url: impl Into<String>, timeout: Duration) -> Self {
        ConnectivityProber {
            network,
            health_url: health_url.into(),
            timeout,
            state: RwLock::new(ConnectivityState::default()),
        }
    }

    /// Check reachability now.
    ///
    /// Network errors, timeouts, and non-success statuses all yield `false`.
    pub async fn probe(&self) -> bool {
        let request = Request::head(&self.health_url).with_header("Cache-Control", "no-store");
        let reachable = match tokio::time::timeout(self.timeout, self.network.fetch(request)).await
        {
            Ok(Ok(response)) => {
                if !response.is_success() {
                    tracing::debug!("health check returned {}", response.status);
                }
                response.is_success()
            }
            Ok(Err(e)) => {
                tracing::debug!("health check failed: {}", e);
                false
            }
            Err(_) => {
                tracing::debug!("health check timed out after {:?}", self.timeout);
                false
            }
        };
        self.record(reachable);
        reachable
    }

    /// Record a platform offline transition without sending a request.
    pub fn mark_offline(&self) {
        self.record(false);
    }

    /// The last probe result.
    pub fn state(&self) -> ConnectivityState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_reachable(&self) -> bool {
        self.state().reachable
    }

    fn record(&self, reachable: bool) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.reachable != reachable {
            tracing::info!(
                "remote API is now {}",
                if reachable { "reachable" } else { "unreachable" }
            );
        }
        *state = ConnectivityState::checked(reachable, Utc::now());
    }
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
