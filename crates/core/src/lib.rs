// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! offsync-core: Shared data model for the offsync engine.
//!
//! This crate holds the types that cross boundaries between the background
//! context, application instances, and the remote API: stored records, sync
//! queue items, connectivity state, the inter-context message protocol, and
//! typed failure values. It performs no I/O.

pub mod connectivity;
pub mod error;
pub mod id;
pub mod protocol;
pub mod record;
pub mod sync_item;

pub use connectivity::ConnectivityState;
pub use error::{RemoteError, SyncFailure};
pub use protocol::{ClientRequest, NetworkStatus, Notification, NotificationAction, WorkerMessage};
pub use record::{MessageData, PdfData, Record, StoredMessage, StoredPdf};
pub use sync_item::{SyncQueueItem, MAX_REPLAY_ATTEMPTS};
