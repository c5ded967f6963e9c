// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Deferred delivery of mutating requests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐ capture ┌─────────────┐ replay_all ┌─────────────┐
//! │ Interceptor │────────►│  SyncQueue  │───────────►│  Remote API │
//! │ (POST fail) │         │ (sync_queue │            │             │
//! └─────────────┘         │  in store)  │            └─────────────┘
//!                         └─────────────┘
//!                                │ SYNC_COMPLETE
//!                                ▼
//!                         ┌─────────────┐
//!                         │  Notifier   │
//!                         └─────────────┘
//! ```
//!
//! Per item: `Pending → Synced (removed) | Pending (attempts + 1) |
//! Abandoned (removed once attempts reach the limit)`.

mod queue;

pub use queue::{QueueError, QueueResult, ReplayReport, SyncQueue};
