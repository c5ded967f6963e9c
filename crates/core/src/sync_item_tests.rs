// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use serde_json::json;

#[test]
fn new_item_has_no_attempts() {
    let item = SyncQueueItem::new("http://x/api/messages", json!({"msg": "a"}), Utc::now());
    assert_eq!(item.attempts, 0);
    assert!(!item.is_exhausted(MAX_REPLAY_ATTEMPTS));
}

#[test]
fn exhausted_after_max_failures() {
    let mut item = SyncQueueItem::new("http://x/api/messages", json!({}), Utc::now());
    assert_eq!(item.record_failure(), 1);
    assert_eq!(item.record_failure(), 2);
    assert!(!item.is_exhausted(MAX_REPLAY_ATTEMPTS));
    assert_eq!(item.record_failure(), 3);
    assert!(item.is_exhausted(MAX_REPLAY_ATTEMPTS));
}

#[test]
fn serializes_with_camel_case_keys() {
    let item = SyncQueueItem::new("http://x/api/pdfs", json!({"name": "a.pdf"}), Utc::now());
    let value = serde_json::to_value(&item).unwrap();
    assert!(value.get("targetUrl").is_some());
    assert!(value.get("createdAt").is_some());
    assert_eq!(value["attempts"], 0);
}

#[test]
fn missing_attempts_defaults_to_zero() {
    let raw = r#"{"id":"1-a","targetUrl":"/api/messages","body":null,"createdAt":"2026-01-01T00:00:00Z"}"#;
    let item: SyncQueueItem = serde_json::from_str(raw).unwrap();
    assert_eq!(item.attempts, 0);
}
