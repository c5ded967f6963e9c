// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures_util::future::{self, BoxFuture};

use super::{CacheResult, CacheStorage};
use crate::net::Response;

type Generations = BTreeMap<String, BTreeMap<String, Response>>;

/// In-memory cache storage.
#[derive(Debug, Default)]
pub struct MemoryCache {
    generations: Mutex<Generations>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Generations> {
        self.generations.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CacheStorage for MemoryCache {
    fn names(&self) -> BoxFuture<'_, CacheResult<Vec<String>>> {
        let names = self.lock().keys().cloned().collect();
        Box::pin(future::ready(Ok(names)))
    }

    fn delete<'a>(&'a self, name: &'a str) -> BoxFuture<'a, CacheResult<bool>> {
        let existed = self.lock().remove(name).is_some();
        Box::pin(future::ready(Ok(existed)))
    }

    fn lookup<'a>(
        &'a self,
        name: &'a str,
        url: &'a str,
    ) -> BoxFuture<'a, CacheResult<Option<Response>>> {
        let hit = self.lock().get(name).and_then(|g| g.get(url)).cloned();
        Box::pin(future::ready(Ok(hit)))
    }

    fn put<'a>(
        &'a self,
        name: &'a str,
        url: &'a str,
        response: Response,
    ) -> BoxFuture<'a, CacheResult<()>> {
        self.lock()
            .entry(name.to_string())
            .or_default()
            .insert(url.to_string(), response);
        Box::pin(future::ready(Ok(())))
    }

    fn urls<'a>(&'a self, name: &'a str) -> BoxFuture<'a, CacheResult<Vec<String>>> {
        let urls = self
            .lock()
            .get(name)
            .map(|g| g.keys().cloned().collect())
            .unwrap_or_default();
        Box::pin(future::ready(Ok(urls)))
    }
}
