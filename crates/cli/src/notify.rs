// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Delivery of events to connected application instances.
//!
//! Each instance registers a channel; messages are pushed to every live
//! channel. Delivery is best-effort: an instance whose receiver is gone is
//! logged and dropped from the registry without affecting the others.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use offsync_core::protocol::OPEN_ACTION;
use offsync_core::{Notification, WorkerMessage};
use tokio::sync::mpsc;
use url::Url;

/// Identifier of a connected application instance.
pub type ClientId = u64;

struct Client {
    url: String,
    tx: mpsc::UnboundedSender<WorkerMessage>,
}

/// What a notification click resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// An instance already showing the URL was asked to focus.
    Focused(ClientId),
    /// No instance shows the URL; a new window should be opened at it.
    Open(String),
    /// The click was on an action other than "open".
    Dismissed,
}

/// Registry of connected instances.
pub struct ClientNotifier {
    clients: Mutex<BTreeMap<ClientId, Client>>,
    next_id: AtomicU64,
    origin: Option<Url>,
    icon: String,
}

impl ClientNotifier {
    /// Relative notification URLs are resolved against `origin`.
    pub fn new(origin: Option<Url>, icon: impl Into<String>) -> Self {
        ClientNotifier {
            clients: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            origin,
            icon: icon.into(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<ClientId, Client>> {
        self.clients.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an instance currently showing `url`.
    pub fn connect(
        &self,
        url: impl Into<String>,
    ) -> (ClientId, mpsc::UnboundedReceiver<WorkerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let url = self.resolve(&url.into());
        tracing::debug!("client {} connected at {}", id, url);
        self.lock().insert(id, Client { url, tx });
        (id, rx)
    }

    /// Returns false if the instance was not registered.
    pub fn disconnect(&self, id: ClientId) -> bool {
        self.lock().remove(&id).is_some()
    }

    /// Record that an instance now shows a different URL.
    pub fn navigate(&self, id: ClientId, url: &str) {
        let resolved = self.resolve(url);
        if let Some(client) = self.lock().get_mut(&id) {
            client.url = resolved;
        }
    }

    pub fn client_count(&self) -> usize {
        self.lock().len()
    }

    /// Send `message` to every instance. Returns the number reached.
    pub fn broadcast(&self, message: &WorkerMessage) -> usize {
        let mut clients = self.lock();
        let mut gone = Vec::new();
        for (id, client) in clients.iter() {
            if client.tx.send(message.clone()).is_err() {
                tracing::warn!("client {} is gone, dropping it", id);
                gone.push(*id);
            }
        }
        for id in &gone {
            clients.remove(id);
        }
        clients.len()
    }

    /// Send `message` to one instance. Returns false if it is not reachable.
    pub fn send_to(&self, id: ClientId, message: WorkerMessage) -> bool {
        let mut clients = self.lock();
        let Some(client) = clients.get(&id) else {
            return false;
        };
        if client.tx.send(message).is_err() {
            tracing::warn!("client {} is gone, dropping it", id);
            clients.remove(&id);
            return false;
        }
        true
    }

    /// A notification carrying the configured icon.
    pub fn notification(&self, title: &str, body: &str, tag: &str) -> Notification {
        Notification::new(title, body, tag).with_icon(self.icon.clone())
    }

    /// Show a user-visible notification in every instance.
    pub fn notify(&self, notification: Notification) -> usize {
        tracing::info!("notification: {}: {}", notification.title, notification.body);
        self.broadcast(&WorkerMessage::ShowNotification(notification))
    }

    /// Handle a click on `notification`. `action` is `None` for a click on
    /// the notification body.
    pub fn notification_click(
        &self,
        notification: &Notification,
        action: Option<&str>,
    ) -> ClickOutcome {
        if action.is_some_and(|a| a != OPEN_ACTION) {
            return ClickOutcome::Dismissed;
        }
        let target = self.resolve(&notification.url);
        let showing = self
            .lock()
            .iter()
            .find(|(_, c)| c.url == target)
            .map(|(id, _)| *id);
        match showing {
            Some(id) if self.send_to(id, WorkerMessage::Focus { url: target.clone() }) => {
                ClickOutcome::Focused(id)
            }
            _ => ClickOutcome::Open(target),
        }
    }

    fn resolve(&self, url: &str) -> String {
        match &self.origin {
            Some(origin) => origin
                .join(url)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| url.to_string()),
            None => url.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
