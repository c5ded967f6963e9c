// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::*;
use chrono::{TimeZone, Utc};
use serde_json::json;

fn message(id: &str, msg: &str, uploaded: bool) -> StoredMessage {
    StoredMessage {
        id: id.to_string(),
        msg: msg.to_string(),
        date: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        uploaded,
    }
}

#[test]
fn missing_collections_read_as_empty() {
    let store = LocalStore::in_memory();
    assert!(store.messages().unwrap().is_empty());
    assert!(store.pdfs().unwrap().is_empty());
    assert!(store.queue().unwrap().is_empty());
}

#[test]
fn upsert_replaces_by_id() {
    let store = LocalStore::in_memory();
    store.upsert_message(message("1", "draft", false)).unwrap();
    store.upsert_message(message("2", "other", false)).unwrap();
    store.upsert_message(message("1", "final", true)).unwrap();

    let messages = store.messages().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].msg, "final");
    assert!(messages[0].uploaded);
}

#[test]
fn mark_uploaded_clears_pending() {
    let store = LocalStore::in_memory();
    store.upsert_message(message("1", "a", false)).unwrap();
    store.upsert_message(message("2", "b", false)).unwrap();

    assert!(store.mark_message_uploaded("1").unwrap());
    assert!(!store.mark_message_uploaded("nope").unwrap());

    let pending = store.pending_messages().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, "2");
}

#[test]
fn remove_is_local_only() {
    let store = LocalStore::in_memory();
    let pdf = StoredPdf::pending("a.pdf", b"%PDF-1.4", Utc::now());
    let id = pdf.id.clone();
    store.upsert_pdf(pdf).unwrap();

    assert!(store.remove_pdf(&id).unwrap());
    assert!(!store.remove_pdf(&id).unwrap());
    assert!(store.pdfs().unwrap().is_empty());
}

#[test]
fn queue_keeps_enqueue_order() {
    let store = LocalStore::in_memory();
    let first = SyncQueueItem::new("http://api/messages", json!({"n": 1}), Utc::now());
    let second = SyncQueueItem::new("http://api/messages", json!({"n": 2}), Utc::now());
    store.push_queue_item(first.clone()).unwrap();
    store.push_queue_item(second.clone()).unwrap();

    assert_eq!(store.queue().unwrap(), vec![first, second]);
}

#[test]
fn malformed_collection_is_reported_with_key() {
    let kv = Arc::new(MemoryStore::new());
    kv.set(MESSAGES_KEY, json!({"not": "a list"})).unwrap();
    let store = LocalStore::new(kv);

    match store.messages().unwrap_err() {
        StoreError::Corrupted { key, .. } => assert_eq!(key, MESSAGES_KEY),
        other => panic!("unexpected error: {other}"),
    }
    // Other collections are unaffected.
    assert!(store.pdfs().unwrap().is_empty());
}

#[test]
fn concurrent_pushes_from_clones_are_all_kept() {
    let store = LocalStore::in_memory();
    let workers: Vec<_> = (0..4)
        .map(|w| {
            let store = store.clone();
            std::thread::spawn(move || {
                for n in 0..50 {
                    let body = json!({"w": w, "n": n});
                    let item = SyncQueueItem::new("http://api/messages", body, Utc::now());
                    store.push_queue_item(item).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(store.queue().unwrap().len(), 200);
}

#[test]
fn update_queue_without_change_skips_write() {
    let kv = Arc::new(MemoryStore::new());
    let store = LocalStore::new(kv.clone());

    let outcome: Option<()> = store.update_queue(|_| None).unwrap();

    assert!(outcome.is_none());
    assert!(kv.get(SYNC_QUEUE_KEY).unwrap().is_none());
}
