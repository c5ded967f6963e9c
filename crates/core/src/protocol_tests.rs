// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use serde_json::json;
use yare::parameterized;

#[parameterized(
    pending = { r#"{"type":"GET_PENDING_SYNC_COUNT"}"#, ClientRequest::GetPendingSyncCount },
    trigger = { r#"{"type":"TRIGGER_SYNC"}"#, ClientRequest::TriggerSync },
    clear = { r#"{"type":"CLEAR_CACHE"}"#, ClientRequest::ClearCache },
    check = { r#"{"type":"CHECK_NETWORK"}"#, ClientRequest::CheckNetwork },
)]
fn client_request_wire_names(raw: &str, expected: ClientRequest) {
    assert_eq!(ClientRequest::from_json(raw).unwrap(), expected);
}

#[test]
fn update_assets_carries_asset_list() {
    let raw = r#"{"type":"UPDATE_ASSETS","assets":["/a.js","/b.css"]}"#;
    let request = ClientRequest::from_json(raw).unwrap();
    assert_eq!(
        request,
        ClientRequest::UpdateAssets {
            assets: vec!["/a.js".into(), "/b.css".into()]
        }
    );
    assert!(request.expects_reply());
}

#[test]
fn trigger_sync_expects_no_reply() {
    assert!(!ClientRequest::TriggerSync.expects_reply());
    assert!(ClientRequest::GetPendingSyncCount.expects_reply());
}

#[test]
fn network_status_wire_format() {
    let msg = WorkerMessage::network_status(NetworkStatus::Offline);
    let value: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
    assert_eq!(value["type"], "NETWORK_STATUS");
    assert_eq!(value["status"], "offline");
    assert!(value.get("timestamp").is_some());
}

#[test]
fn pending_count_reply_has_count() {
    let value = serde_json::to_value(WorkerMessage::PendingSyncCount { count: 2 }).unwrap();
    assert_eq!(value, json!({"type": "PENDING_SYNC_COUNT", "count": 2}));
}

#[test]
fn sync_complete_roundtrip() {
    let msg = WorkerMessage::sync_complete(4);
    let parsed = WorkerMessage::from_json(&msg.to_json().unwrap()).unwrap();
    assert_eq!(msg, parsed);
}

#[test]
fn notification_flattens_into_message() {
    let notification = Notification::new("Sync complete", "2 requests sent", "sync-complete");
    let value = serde_json::to_value(WorkerMessage::ShowNotification(notification)).unwrap();
    assert_eq!(value["type"], "SHOW_NOTIFICATION");
    assert_eq!(value["title"], "Sync complete");
    assert_eq!(value["icon"], DEFAULT_ICON);
    assert_eq!(value["actions"][0]["action"], OPEN_ACTION);
    assert_eq!(value["url"], "/");
}

#[test]
fn cache_cleared_omits_missing_error() {
    let msg = WorkerMessage::CacheCleared {
        success: true,
        error: None,
        timestamp: Utc::now(),
    };
    let value = serde_json::to_value(msg).unwrap();
    assert!(value.get("error").is_none());
}

#[test]
fn network_status_displays_lowercase() {
    assert_eq!(NetworkStatus::Online.to_string(), "online");
    assert_eq!(NetworkStatus::Offline.to_string(), "offline");
}
