// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Response cache grouped into named generations.
//!
//! Entries are keyed by absolute request URL and are immutable once stored:
//! a `put` for an existing URL replaces the entry wholesale.

mod disk;
mod memory;

pub use disk::DiskCache;
pub use memory::MemoryCache;

use std::path::PathBuf;

use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::net::Response;

/// Error type for cache storage.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("corrupted cache entry {path}: {source}")]
    Corrupted {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for cache storage.
pub type CacheResult<T> = Result<T, CacheError>;

/// Storage for cached responses.
pub trait CacheStorage: Send + Sync {
    /// Names of every generation currently stored.
    fn names(&self) -> BoxFuture<'_, CacheResult<Vec<String>>>;

    /// Drop a generation and all its entries. Returns false if it did not exist.
    fn delete<'a>(&'a self, name: &'a str) -> BoxFuture<'a, CacheResult<bool>>;

    /// The stored response for `url` in generation `name`.
    fn lookup<'a>(&'a self, name: &'a str, url: &'a str)
        -> BoxFuture<'a, CacheResult<Option<Response>>>;

    /// Store `response` for `url`, creating the generation if needed.
    fn put<'a>(
        &'a self,
        name: &'a str,
        url: &'a str,
        response: Response,
    ) -> BoxFuture<'a, CacheResult<()>>;

    /// URLs stored in generation `name`, sorted.
    fn urls<'a>(&'a self, name: &'a str) -> BoxFuture<'a, CacheResult<Vec<String>>>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
