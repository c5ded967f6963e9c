// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Push pending work and pull server records.

use offsync_core::SyncFailure;
use serde_json::json;

use crate::colors::Level;
use crate::data::ConflictStrategy;
use crate::error::Result;

use super::Session;

/// Push pending records, then replay the sync queue.
pub async fn sync(session: &Session) -> Result<()> {
    let ctx = session.ctx();
    let summary = ctx.data_manager().sync_pending_data().await;
    let unreachable = summary.errors.contains(&SyncFailure::Unreachable);
    let replay = if unreachable {
        None
    } else {
        ctx.replay().await
    };

    let queue = replay.as_ref().map(|r| {
        let abandoned: Vec<String> = r.abandoned.iter().map(|f| f.to_string()).collect();
        json!({
            "synced": r.synced,
            "retried": r.retried,
            "abandoned": abandoned,
        })
    });
    let emitted = session.emit(&json!({ "records": summary, "queue": queue }))?;
    if !emitted {
        println!("Messages synced: {}", summary.messages_synced);
        println!("PDFs synced: {}", summary.pdfs_synced);
        if let Some(report) = &replay {
            println!("Queued requests replayed: {}", report.synced);
        }
        for failure in &summary.errors {
            println!("  {}", failure);
        }
    }

    if unreachable {
        session.notice(Level::Warning, "offline: nothing was synced");
        return Ok(());
    }

    let (retried, abandoned) = replay
        .as_ref()
        .map(|r| (r.retried, r.abandoned.len()))
        .unwrap_or((0, 0));
    if abandoned > 0 {
        session.notice(
            Level::Error,
            &format!("{} queued request(s) dropped after repeated failures", abandoned),
        );
    } else if !summary.errors.is_empty() || retried > 0 {
        session.notice(
            Level::Warning,
            &format!(
                "{} item(s) failed and will be retried",
                summary.errors.len() + retried
            ),
        );
    } else {
        let synced = summary.messages_synced
            + summary.pdfs_synced
            + replay.as_ref().map(|r| r.synced).unwrap_or(0);
        session.notice(Level::Success, &format!("{} item(s) synced", synced));
    }
    Ok(())
}

/// Replace local collections with the server's records.
pub async fn merge(session: &Session, strategy: ConflictStrategy) -> Result<()> {
    let data = session.ctx().data_manager();
    data.set_conflict_strategy(strategy);
    let summary = data.merge_server_data().await;
    if !session.emit(&summary)? {
        let show = |n: Option<usize>| n.map_or("unchanged".to_string(), |n| n.to_string());
        println!("Conflict strategy: {}", data.conflict_strategy());
        println!("Messages: {}", show(summary.messages));
        println!("PDFs: {}", show(summary.pdfs));
    }
    match (summary.messages, summary.pdfs) {
        (Some(_), Some(_)) => session.notice(Level::Success, "merged server data"),
        (None, None) => session.notice(
            Level::Warning,
            "could not read server data; local records unchanged",
        ),
        _ => session.notice(Level::Warning, "merged partially; see counts above"),
    }
    Ok(())
}
