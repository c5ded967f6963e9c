// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Typed collections over the key-value store.

use std::sync::{Arc, Mutex, PoisonError};

use offsync_core::{Record, StoredMessage, StoredPdf, SyncQueueItem};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{KvStore, MemoryStore, StoreError, StoreResult};

pub const MESSAGES_KEY: &str = "messages";
pub const PDFS_KEY: &str = "pdf_files";
pub const SYNC_QUEUE_KEY: &str = "sync_queue";

/// The messages, PDFs, and sync queue kept on this device.
///
/// Each collection is one JSON array under its own key. A missing key reads
/// as an empty collection. Clones share one write lock, held across every
/// read-modify-write so concurrent edits of a collection are not lost.
#[derive(Clone)]
pub struct LocalStore {
    kv: Arc<dyn KvStore>,
    write_lock: Arc<Mutex<()>>,
}

impl LocalStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        LocalStore {
            kv,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// A store that lives only as long as this value.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        match self.kv.get(key)? {
            None => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value).map_err(|source| StoreError::Corrupted {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn write<T: Serialize>(&self, key: &str, items: &[T]) -> StoreResult<()> {
        self.kv.set(key, serde_json::to_value(items)?)
    }

    /// Read `key`, let `edit` change it, and write it back under the lock.
    /// Nothing is written when `edit` returns `None`.
    fn update<T, R>(
        &self,
        key: &str,
        edit: impl FnOnce(&mut Vec<T>) -> Option<R>,
    ) -> StoreResult<Option<R>>
    where
        T: Serialize + DeserializeOwned,
    {
        let _held = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items: Vec<T> = self.read(key)?;
        let outcome = edit(&mut items);
        if outcome.is_some() {
            self.write(key, &items)?;
        }
        Ok(outcome)
    }

    fn replace<T: Serialize>(&self, key: &str, items: &[T]) -> StoreResult<()> {
        let _held = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.write(key, items)
    }

    fn upsert<T>(&self, key: &str, record: T) -> StoreResult<()>
    where
        T: Record + Serialize + DeserializeOwned,
    {
        self.update(key, |records: &mut Vec<T>| {
            match records.iter_mut().find(|r| r.id() == record.id()) {
                Some(existing) => *existing = record,
                None => records.push(record),
            }
            Some(())
        })?;
        Ok(())
    }

    fn mark_uploaded<T>(&self, key: &str, id: &str) -> StoreResult<bool>
    where
        T: Record + Serialize + DeserializeOwned,
    {
        let marked = self.update(key, |records: &mut Vec<T>| {
            let mut found = false;
            for record in records.iter_mut().filter(|r| r.id() == id) {
                record.mark_uploaded();
                found = true;
            }
            found.then_some(())
        })?;
        Ok(marked.is_some())
    }

    fn remove<T>(&self, key: &str, id: &str) -> StoreResult<bool>
    where
        T: Record + Serialize + DeserializeOwned,
    {
        let removed = self.update(key, |records: &mut Vec<T>| {
            let before = records.len();
            records.retain(|r| r.id() != id);
            (records.len() != before).then_some(())
        })?;
        Ok(removed.is_some())
    }

    fn pending<T>(&self, key: &str) -> StoreResult<Vec<T>>
    where
        T: Record + DeserializeOwned,
    {
        let records: Vec<T> = self.read(key)?;
        Ok(records.into_iter().filter(|r| r.is_pending()).collect())
    }

    // Messages

    pub fn messages(&self) -> StoreResult<Vec<StoredMessage>> {
        self.read(MESSAGES_KEY)
    }

    pub fn pending_messages(&self) -> StoreResult<Vec<StoredMessage>> {
        self.pending(MESSAGES_KEY)
    }

    /// Insert a message, replacing any with the same ID.
    pub fn upsert_message(&self, message: StoredMessage) -> StoreResult<()> {
        self.upsert(MESSAGES_KEY, message)
    }

    pub fn replace_messages(&self, messages: &[StoredMessage]) -> StoreResult<()> {
        self.replace(MESSAGES_KEY, messages)
    }

    /// Returns false if no message has this ID.
    pub fn mark_message_uploaded(&self, id: &str) -> StoreResult<bool> {
        self.mark_uploaded::<StoredMessage>(MESSAGES_KEY, id)
    }

    /// Local-only deletion. Returns false if no message has this ID.
    pub fn remove_message(&self, id: &str) -> StoreResult<bool> {
        self.remove::<StoredMessage>(MESSAGES_KEY, id)
    }

    // PDFs

    pub fn pdfs(&self) -> StoreResult<Vec<StoredPdf>> {
        self.read(PDFS_KEY)
    }

    pub fn pending_pdfs(&self) -> StoreResult<Vec<StoredPdf>> {
        self.pending(PDFS_KEY)
    }

    pub fn upsert_pdf(&self, pdf: StoredPdf) -> StoreResult<()> {
        self.upsert(PDFS_KEY, pdf)
    }

    pub fn replace_pdfs(&self, pdfs: &[StoredPdf]) -> StoreResult<()> {
        self.replace(PDFS_KEY, pdfs)
    }

    pub fn mark_pdf_uploaded(&self, id: &str) -> StoreResult<bool> {
        self.mark_uploaded::<StoredPdf>(PDFS_KEY, id)
    }

    pub fn remove_pdf(&self, id: &str) -> StoreResult<bool> {
        self.remove::<StoredPdf>(PDFS_KEY, id)
    }

    // Sync queue

    /// Queued requests in enqueue order.
    pub fn queue(&self) -> StoreResult<Vec<SyncQueueItem>> {
        self.read(SYNC_QUEUE_KEY)
    }

    pub fn replace_queue(&self, items: &[SyncQueueItem]) -> StoreResult<()> {
        self.replace(SYNC_QUEUE_KEY, items)
    }

    pub fn push_queue_item(&self, item: SyncQueueItem) -> StoreResult<()> {
        self.update_queue(|items| {
            items.push(item);
            Some(())
        })?;
        Ok(())
    }

    /// Edit the queue in one locked read-modify-write. The queue is written
    /// back only when `edit` returns `Some`.
    pub fn update_queue<R>(
        &self,
        edit: impl FnOnce(&mut Vec<SyncQueueItem>) -> Option<R>,
    ) -> StoreResult<Option<R>> {
        self.update(SYNC_QUEUE_KEY, edit)
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
