// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::*;
use offsync_core::NetworkStatus;

fn notifier() -> ClientNotifier {
    ClientNotifier::new(Some(Url::parse("http://app.test").unwrap()), "/icon.png")
}

#[test]
fn broadcast_reaches_every_client() {
    let notifier = notifier();
    let (_, mut a) = notifier.connect("/");
    let (_, mut b) = notifier.connect("/messages");

    let reached = notifier.broadcast(&WorkerMessage::sync_complete(2));
    assert_eq!(reached, 2);
    assert!(matches!(a.try_recv().unwrap(), WorkerMessage::SyncComplete { count: 2, .. }));
    assert!(matches!(b.try_recv().unwrap(), WorkerMessage::SyncComplete { count: 2, .. }));
}

#[test]
fn closed_client_is_pruned_without_blocking_others() {
    let notifier = notifier();
    let (_, dropped) = notifier.connect("/");
    let (_, mut live) = notifier.connect("/");
    drop(dropped);

    let reached = notifier.broadcast(&WorkerMessage::network_status(NetworkStatus::Offline));
    assert_eq!(reached, 1);
    assert_eq!(notifier.client_count(), 1);
    assert!(live.try_recv().is_ok());
}

#[test]
fn disconnect_removes_client() {
    let notifier = notifier();
    let (id, _rx) = notifier.connect("/");
    assert!(notifier.disconnect(id));
    assert!(!notifier.disconnect(id));
    assert_eq!(notifier.broadcast(&WorkerMessage::sync_complete(1)), 0);
}

#[test]
fn notification_uses_configured_icon() {
    let notifier = notifier();
    let (_, mut rx) = notifier.connect("/");
    notifier.notify(notifier.notification("Saved offline", "Will sync later", "sync-queued"));

    match rx.try_recv().unwrap() {
        WorkerMessage::ShowNotification(n) => {
            assert_eq!(n.icon, "/icon.png");
            assert_eq!(n.tag, "sync-queued");
            assert_eq!(n.actions[0].action, OPEN_ACTION);
        }
        other => panic!("unexpected message: {other:?}"),
    }
}

#[test]
fn click_focuses_client_showing_target() {
    let notifier = notifier();
    let (_, _other) = notifier.connect("/pdfs");
    let (id, mut rx) = notifier.connect("/");

    let n = notifier.notification("Sync complete", "1 item", "sync-complete");
    assert_eq!(notifier.notification_click(&n, Some(OPEN_ACTION)), ClickOutcome::Focused(id));
    assert_eq!(
        rx.try_recv().unwrap(),
        WorkerMessage::Focus {
            url: "http://app.test/".to_string()
        }
    );
}

#[test]
fn click_opens_window_when_no_client_matches() {
    let notifier = notifier();
    let (id, _rx) = notifier.connect("/pdfs");
    let n = notifier
        .notification("Sync complete", "1 item", "sync-complete")
        .with_url("/messages");

    assert_eq!(
        notifier.notification_click(&n, None),
        ClickOutcome::Open("http://app.test/messages".to_string())
    );

    notifier.navigate(id, "/messages");
    assert_eq!(notifier.notification_click(&n, None), ClickOutcome::Focused(id));
}

#[test]
fn other_actions_dismiss() {
    let notifier = notifier();
    let n = notifier.notification("t", "b", "x");
    assert_eq!(notifier.notification_click(&n, Some("close")), ClickOutcome::Dismissed);
}
