// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Foreground background-context loop.
//!
//! Installs and activates the context, then until Ctrl-C:
//! - the context probes every `probe_interval_secs` and replays the queue
//!   when the API becomes reachable again
//! - pending records are pushed every `sync_interval_secs` while reachable
//! - broadcasts to application instances are printed as they arrive

use std::future::Future;

use offsync_core::WorkerMessage;

use crate::colors::Level;
use crate::context::AppClient;
use crate::error::Result;

use super::Session;

pub async fn run(session: &Session) -> Result<()> {
    run_until(session, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("listening for Ctrl-C failed: {}", e);
        }
    })
    .await
}

/// Run the loop until `shutdown` resolves.
pub async fn run_until(session: &Session, shutdown: impl Future<Output = ()>) -> Result<()> {
    let ctx = session.ctx();
    let install = ctx.install().await;
    if !install.is_complete() {
        tracing::warn!("{} asset(s) could not be cached", install.failed.len());
    }
    let activate = ctx.activate().await?;
    tracing::info!(
        "activated {} with {} cached entries",
        ctx.interceptor().cache_name(),
        activate.entries
    );

    let handle = ctx.spawn_message_loop();
    let origin = ctx.interceptor().resolve("./");
    let mut client = AppClient::connect(ctx, handle, &origin);
    let data = ctx.data_manager();

    session.notice(
        Level::Info,
        &format!(
            "running against {} ({}); press Ctrl-C to stop",
            ctx.config().api_base_url,
            ctx.prober().state().status()
        ),
    );

    let mut sync_ticker = tokio::time::interval(ctx.config().sync_interval());
    sync_ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    sync_ticker.tick().await;

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = sync_ticker.tick() => {
                if ctx.prober().is_reachable() {
                    let summary = data.sync_pending_data().await;
                    let synced = summary.messages_synced + summary.pdfs_synced;
                    if synced > 0 {
                        tracing::info!("periodic sync pushed {} record(s)", synced);
                    }
                }
            }
            event = client.next_event() => match event {
                Some(message) => print_event(session, &message)?,
                None => break,
            },
        }
    }

    ctx.teardown();
    session.notice(Level::Success, "stopped");
    Ok(())
}

fn print_event(session: &Session, message: &WorkerMessage) -> Result<()> {
    if session.json() {
        println!("{}", message.to_json()?);
        return Ok(());
    }
    match message {
        WorkerMessage::NetworkStatus { status, timestamp } => {
            println!("[{}] network {}", timestamp.format("%H:%M:%S"), status)
        }
        WorkerMessage::SyncComplete { count, .. } => {
            println!("sync complete: {} queued request(s) delivered", count)
        }
        WorkerMessage::ShowNotification(n) => println!("notification: {} - {}", n.title, n.body),
        other => println!("{:?}", other),
    }
    Ok(())
}
