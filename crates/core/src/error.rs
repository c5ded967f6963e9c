// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Typed failure values shared by the engine and its callers.

use std::time::Duration;

use thiserror::Error;

/// Why a call to the remote API did not succeed.
///
/// Network failures and rejections are handled identically for caching and
/// sync purposes; the distinction exists so callers can report them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("remote rejected request with status {status}")]
    Rejected { status: u16 },

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl RemoteError {
    /// Returns true if the remote answered with a non-success status.
    pub fn is_rejection(&self) -> bool {
        matches!(self, RemoteError::Rejected { .. })
    }
}

/// A single item that could not be synchronized.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncFailure {
    #[error("not online")]
    Unreachable,

    #[error("message {id}: {error}")]
    Message { id: String, error: RemoteError },

    #[error("PDF {name}: {error}")]
    Pdf {
        id: String,
        name: String,
        error: RemoteError,
    },

    #[error("local store: {0}")]
    Store(String),

    #[error("queued request {id} to {target_url} abandoned after {attempts} attempts")]
    QueueExhausted {
        id: String,
        target_url: String,
        attempts: u32,
    },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
