// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity and pending-work reporting.

use chrono::{DateTime, Utc};
use offsync_core::NetworkStatus;
use serde::Serialize;

use crate::colors::Level;
use crate::error::Result;

use super::Session;

/// Counts of work that has not reached the remote yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCounts {
    pub messages: usize,
    pub pdfs: usize,
    pub queued_requests: usize,
}

impl PendingCounts {
    pub fn total(&self) -> usize {
        self.messages + self.pdfs + self.queued_requests
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    status: NetworkStatus,
    api: String,
    checked_at: Option<DateTime<Utc>>,
    pending: PendingCounts,
}

/// Read pending counts, treating unreadable collections as empty.
pub fn pending_counts(session: &Session) -> PendingCounts {
    let ctx = session.ctx();
    let store = ctx.store();
    let count = |what: &str, n: std::result::Result<usize, String>| {
        n.unwrap_or_else(|e| {
            tracing::warn!("reading pending {} failed: {}", what, e);
            0
        })
    };
    PendingCounts {
        messages: count(
            "messages",
            store.pending_messages().map(|v| v.len()).map_err(|e| e.to_string()),
        ),
        pdfs: count(
            "PDFs",
            store.pending_pdfs().map(|v| v.len()).map_err(|e| e.to_string()),
        ),
        queued_requests: count(
            "queue",
            ctx.queue().pending_count().map_err(|e| e.to_string()),
        ),
    }
}

pub async fn status(session: &Session) -> Result<()> {
    let ctx = session.ctx();
    let status = ctx.check_network_status().await;
    let report = StatusReport {
        status,
        api: ctx.config().api_base_url.clone(),
        checked_at: ctx.prober().state().last_checked_at,
        pending: pending_counts(session),
    };

    if !session.emit(&report)? {
        println!("API: {}", report.api);
        println!("Pending messages: {}", report.pending.messages);
        println!("Pending PDFs: {}", report.pending.pdfs);
        println!("Queued requests: {}", report.pending.queued_requests);
    }
    match status {
        NetworkStatus::Online => session.notice(Level::Success, "online"),
        NetworkStatus::Offline => {
            session.notice(Level::Warning, "offline: the remote API is unreachable")
        }
    }
    Ok(())
}

pub fn pending(session: &Session) -> Result<()> {
    let counts = pending_counts(session);
    if !session.emit(&counts)? {
        println!("Pending messages: {}", counts.messages);
        println!("Pending PDFs: {}", counts.pdfs);
        println!("Queued requests: {}", counts.queued_requests);
    }
    if counts.total() == 0 {
        session.notice(Level::Success, "nothing pending");
    } else {
        session.notice(
            Level::Info,
            &format!("{} item(s) waiting to sync", counts.total()),
        );
    }
    Ok(())
}
