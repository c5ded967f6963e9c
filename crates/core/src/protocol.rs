// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Messages exchanged between the background context and application
//! instances.
//!
//! The protocol is asynchronous message passing only:
//! - Instances send [`ClientRequest`]s, some of which expect a reply
//! - The background context broadcasts [`WorkerMessage`]s to every instance

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Icon shown on notifications unless another is configured.
pub const DEFAULT_ICON: &str = "/pwa-192x192.png";

/// Action identifier for the "open" notification button.
pub const OPEN_ACTION: &str = "open";

/// Reachability as reported to application instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkStatus {
    Online,
    Offline,
}

impl fmt::Display for NetworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NetworkStatus::Online => "online",
            NetworkStatus::Offline => "offline",
        })
    }
}

/// Messages sent from an application instance to the background context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientRequest {
    /// Ask for the sync queue length. Answered with `PENDING_SYNC_COUNT`.
    GetPendingSyncCount,

    /// Replay the sync queue now.
    TriggerSync,

    /// Drop the current cache generation and warm it again.
    ClearCache,

    /// Fetch and cache additional assets.
    UpdateAssets { assets: Vec<String> },

    /// Probe the remote API and broadcast the result.
    CheckNetwork,
}

/// Messages sent from the background context to application instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerMessage {
    /// Result of a connectivity probe or platform transition.
    NetworkStatus {
        status: NetworkStatus,
        timestamp: DateTime<Utc>,
    },

    /// A replay pass delivered `count` queued requests.
    SyncComplete {
        count: usize,
        timestamp: DateTime<Utc>,
    },

    /// Reply to `GET_PENDING_SYNC_COUNT`.
    PendingSyncCount { count: usize },

    /// Reply to `CLEAR_CACHE`.
    CacheCleared {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
        timestamp: DateTime<Utc>,
    },

    /// Reply to `UPDATE_ASSETS`.
    AssetsUpdated {
        success: bool,
        assets: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    /// A user-visible notification.
    ShowNotification(Notification),

    /// Bring the instance showing `url` to the foreground.
    Focus { url: String },
}

/// A button on a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
}

/// A user-visible notification payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub tag: String,
    pub actions: Vec<NotificationAction>,
    /// Page opened or focused when the notification is clicked.
    #[serde(default = "default_url")]
    pub url: String,
}

fn default_url() -> String {
    "/".to_string()
}

impl Notification {
    /// A notification with the default icon, an "open" action, and `/` as
    /// its target page.
    pub fn new(title: impl Into<String>, body: impl Into<String>, tag: impl Into<String>) -> Self {
        Notification {
            title: title.into(),
            body: body.into(),
            icon: DEFAULT_ICON.to_string(),
            tag: tag.into(),
            actions: vec![NotificationAction {
                action: OPEN_ACTION.to_string(),
                title: "Open".to_string(),
            }],
            url: default_url(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

impl ClientRequest {
    /// Whether the sender waits for a reply on its reply channel.
    pub fn expects_reply(&self) -> bool {
        matches!(
            self,
            ClientRequest::GetPendingSyncCount
                | ClientRequest::ClearCache
                | ClientRequest::UpdateAssets { .. }
        )
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl WorkerMessage {
    /// Creates a NetworkStatus message stamped with the current time.
    pub fn network_status(status: NetworkStatus) -> Self {
        WorkerMessage::NetworkStatus {
            status,
            timestamp: Utc::now(),
        }
    }

    /// Creates a SyncComplete message stamped with the current time.
    pub fn sync_complete(count: usize) -> Self {
        WorkerMessage::SyncComplete {
            count,
            timestamp: Utc::now(),
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
