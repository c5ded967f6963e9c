// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

mod common;
use common::*;

use offsync::net::Method;
use offsync::{PlatformSignal, Request, Source};
use offsync_core::{ClientRequest, Record, WorkerMessage};
use serde_json::json;

fn messages_url() -> String {
    format!("{}/messages", API)
}

#[tokio::test]
async fn offline_save_then_sync_marks_uploaded() {
    let server = FakeServer::new();
    server.set_up(false);
    let ctx = context(&server);
    let data = ctx.data_manager();

    let saved = data.save_message("hello").await.unwrap();
    assert!(!saved.online);
    let local = ctx.store().messages().unwrap();
    assert_eq!(local.len(), 1);
    assert_eq!(local[0].msg, "hello");
    assert!(!local[0].uploaded);
    assert_eq!(server.count(Method::Post, &messages_url()), 0);

    server.set_up(true);
    let summary = data.sync_pending_data().await;
    assert_eq!(summary.messages_synced, 1);
    assert_eq!(summary.pdfs_synced, 0);
    assert!(summary.errors.is_empty());
    assert!(ctx.store().messages().unwrap()[0].is_uploaded());
    assert_eq!(server.remote_messages().len(), 1);
}

#[tokio::test]
async fn online_save_lists_from_api_without_duplicates() {
    let server = FakeServer::new();
    let ctx = context(&server);
    let data = ctx.data_manager();

    let saved = data.save_message("from the office").await.unwrap();
    assert!(saved.online);
    assert!(saved.record.uploaded);

    let listing = data.messages().await;
    assert_eq!(listing.source, Source::Api);
    assert_eq!(listing.records.len(), 1);
}

#[tokio::test]
async fn captured_posts_are_counted_then_replayed() {
    let server = FakeServer::new();
    let ctx = context(&server);
    server.set_up(false);
    for i in 0..2 {
        let response = ctx
            .handle_fetch(Request::post_json(messages_url(), &json!({"msg": i})))
            .await
            .unwrap();
        assert_eq!(response.status, 202);
    }

    let handle = ctx.spawn_message_loop();
    let reply = handle
        .request(ClientRequest::GetPendingSyncCount)
        .await
        .unwrap();
    assert_eq!(reply, WorkerMessage::PendingSyncCount { count: 2 });

    server.set_up(true);
    ctx.on_platform_signal(PlatformSignal::Online).await;
    assert_eq!(ctx.queue().pending_count().unwrap(), 0);
    assert_eq!(server.remote_messages().len(), 2);
    ctx.teardown();
}

#[tokio::test]
async fn failing_remote_drops_item_after_third_attempt() {
    let server = FakeServer::new();
    let ctx = context(&server);
    ctx.queue()
        .capture(&messages_url(), json!({"msg": "doomed"}))
        .unwrap();
    server.reject_posts(true);

    for expected in 1..=2 {
        let report = ctx.queue().replay_all().await.unwrap();
        assert_eq!(report.retried, 1);
        assert_eq!(ctx.queue().items().unwrap()[0].attempts, expected);
    }
    let report = ctx.queue().replay_all().await.unwrap();
    assert_eq!(report.abandoned.len(), 1);
    assert_eq!(ctx.queue().pending_count().unwrap(), 0);
}

#[tokio::test]
async fn cached_asset_survives_network_loss() {
    let server = FakeServer::new();
    server.add_asset("/assets/app.js", b"console.log('v1');");
    let ctx = context(&server);
    let url = format!("{}/assets/app.js", ORIGIN);

    let first = ctx.handle_fetch(Request::get(&url)).await.unwrap();
    server.set_up(false);
    let second = ctx.handle_fetch(Request::get(&url)).await.unwrap();

    assert_eq!(second.status, 200);
    assert_eq!(second.body, first.body);
    assert_eq!(second.body, b"console.log('v1');".to_vec());
}

#[tokio::test(start_paused = true)]
async fn warming_twice_fetches_each_asset_once() {
    let server = FakeServer::new();
    for path in ["/", "/index.html", "/offline.html", "/manifest.json"] {
        server.add_asset(path, path.as_bytes());
    }
    server.add_asset("/pwa-192x192.png", b"png");
    server.add_asset("/pwa-512x512.png", b"png");
    server.add_asset("/favicon.ico", b"ico");
    let ctx = context(&server);

    let first = ctx.install().await;
    assert!(first.is_complete());
    let second = ctx.install().await;
    assert!(second.cached.is_empty());
    assert_eq!(second.already_cached.len(), first.cached.len());
    assert_eq!(server.count(Method::Get, &format!("{}/index.html", ORIGIN)), 1);
}

#[tokio::test]
async fn navigation_offline_without_cache_is_synthetic_503() {
    let server = FakeServer::new();
    server.set_up(false);
    let ctx = context(&server);

    let response = ctx
        .handle_fetch(Request::navigate(format!("{}/", ORIGIN)))
        .await
        .unwrap();

    assert_eq!(response.status, 503);
    assert!(response.content_type().unwrap().starts_with("text/html"));
}

#[tokio::test]
async fn merge_replaces_local_with_server_records() {
    let server = FakeServer::new();
    let ctx = context(&server);
    let data = ctx.data_manager();
    data.save_message("one").await.unwrap();
    data.save_message("two").await.unwrap();

    let summary = data.merge_server_data().await;
    assert_eq!(summary.messages, Some(2));
    assert_eq!(summary.pdfs, Some(0));
    assert!(ctx.store().messages().unwrap().iter().all(|m| m.uploaded));
}

#[tokio::test]
async fn app_client_receives_sync_complete() {
    let server = FakeServer::new();
    let ctx = context(&server);
    let handle = ctx.spawn_message_loop();
    let mut app = offsync::AppClient::connect(&ctx, handle, "/");

    ctx.queue()
        .capture(&messages_url(), json!({"msg": "later"}))
        .unwrap();
    let report = ctx.replay().await.unwrap();
    assert_eq!(report.synced, 1);

    let mut saw_complete = false;
    while let Some(event) = app.try_next_event() {
        if let WorkerMessage::SyncComplete { count, .. } = event {
            assert_eq!(count, 1);
            saw_complete = true;
        }
    }
    assert!(saw_complete, "no SYNC_COMPLETE broadcast");
    ctx.teardown();
}
