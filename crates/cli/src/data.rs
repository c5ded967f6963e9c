// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Application-facing data facade.
//!
//! Each operation probes connectivity, then either writes through to the
//! remote API or falls back to the local store. Network and remote failures
//! are reported in return values, never as errors; the only error is a
//! failed local write, because that is the one case where a user's data
//! could be lost.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use offsync_core::id::random_suffix;
use offsync_core::{MessageData, Record, StoredMessage, StoredPdf, SyncFailure};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::ApiClient;
use crate::probe::ConnectivityProber;
use crate::store::{LocalStore, StoreResult};

/// Largest PDF accepted for storage.
pub const MAX_PDF_BYTES: usize = 10 * 1024 * 1024;

const PDF_SIGNATURE: &[u8] = b"%PDF";

/// A saved record and whether it reached the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Saved<T> {
    pub record: T,
    pub online: bool,
}

/// Where a listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Local store only; the remote was unreachable or failed.
    Local,
    /// Remote records with nothing pending locally.
    Api,
    /// Remote records plus locally pending ones.
    Mixed,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Source::Local => "local",
            Source::Api => "api",
            Source::Mixed => "mixed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing<T> {
    pub records: Vec<T>,
    pub source: Source,
}

/// One record and where it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Found<T> {
    pub record: T,
    pub source: Source,
}

/// Outcome of pushing pending records to the remote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub messages_synced: usize,
    pub pdfs_synced: usize,
    #[serde(serialize_with = "failures_as_strings")]
    pub errors: Vec<SyncFailure>,
}

fn failures_as_strings<S: serde::Serializer>(
    errors: &[SyncFailure],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(errors.iter().map(|e| e.to_string()))
}

/// Records kept per collection by a merge; `None` where the remote read
/// failed and the collection was left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    pub messages: Option<usize>,
    pub pdfs: Option<usize>,
}

/// Preferred side when local and remote disagree.
///
/// Recorded for the user interface; merging always keeps remote records.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictStrategy {
    #[default]
    ServerWins,
    ClientWins,
}

impl fmt::Display for ConflictStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConflictStrategy::ServerWins => "server-wins",
            ConflictStrategy::ClientWins => "client-wins",
        })
    }
}

/// Why a file was refused as a PDF.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PdfRejection {
    #[error("{name} is empty")]
    Empty { name: String },

    #[error("{name} is not a PDF")]
    NotPdf { name: String },

    #[error("{name} is {size} bytes; the limit is {limit}")]
    TooLarge {
        name: String,
        size: usize,
        limit: usize,
    },
}

/// A file offered for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl PdfFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        PdfFile {
            name: name.into(),
            bytes,
        }
    }

    /// Accept non-empty files of at most [`MAX_PDF_BYTES`] that carry the
    /// PDF signature or a `.pdf` name.
    pub fn validate(&self) -> Result<(), PdfRejection> {
        if self.bytes.is_empty() {
            return Err(PdfRejection::Empty {
                name: self.name.clone(),
            });
        }
        if self.bytes.len() > MAX_PDF_BYTES {
            return Err(PdfRejection::TooLarge {
                name: self.name.clone(),
                size: self.bytes.len(),
                limit: MAX_PDF_BYTES,
            });
        }
        let named_pdf = self.name.to_ascii_lowercase().ends_with(".pdf");
        if !self.bytes.starts_with(PDF_SIGNATURE) && !named_pdf {
            return Err(PdfRejection::NotPdf {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

/// Decides per operation between the remote API and the local store.
pub struct DataManager {
    store: LocalStore,
    api: ApiClient,
    prober: Arc<ConnectivityProber>,
    strategy: RwLock<ConflictStrategy>,
}

impl DataManager {
    pub fn new(store: LocalStore, api: ApiClient, prober: Arc<ConnectivityProber>) -> Self {
        DataManager {
            store,
            api,
            prober,
            strategy: RwLock::new(ConflictStrategy::default()),
        }
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn prober(&self) -> &ConnectivityProber {
        &self.prober
    }

    /// Save a text message.
    ///
    /// When the remote accepts it, the server's record is mirrored locally as
    /// uploaded. Otherwise the message is stored locally as pending.
    pub async fn save_message(&self, text: &str) -> StoreResult<Saved<StoredMessage>> {
        let now = Utc::now();
        if self.prober.probe().await {
            match self.api.save_message(&MessageData::new(text, now)).await {
                Ok(remote) => {
                    let record = StoredMessage::from_remote(remote, &now);
                    self.store.upsert_message(record.clone())?;
                    return Ok(Saved {
                        record,
                        online: true,
                    });
                }
                Err(e) => tracing::warn!("saving message remotely failed, keeping it local: {}", e),
            }
        }

        let mut record = StoredMessage::pending(text, now);
        record.id = unique_id(record.id, &self.store.messages()?);
        self.store.upsert_message(record.clone())?;
        Ok(Saved {
            record,
            online: false,
        })
    }

    /// Save a PDF.
    ///
    /// The file is always stored locally first, then uploaded if the remote
    /// is reachable.
    pub async fn save_pdf(&self, file: PdfFile) -> StoreResult<Saved<StoredPdf>> {
        let mut record = StoredPdf::pending(file.name, &file.bytes, Utc::now());
        record.id = unique_id(record.id, &self.store.pdfs()?);
        self.store.upsert_pdf(record.clone())?;

        if !self.prober.probe().await {
            return Ok(Saved {
                record,
                online: false,
            });
        }
        match self.api.upload_pdf(&record.to_remote()).await {
            Ok(_) => {
                self.store.mark_pdf_uploaded(&record.id)?;
                record.mark_uploaded();
                Ok(Saved {
                    record,
                    online: true,
                })
            }
            Err(e) => {
                tracing::warn!("uploading {} failed, keeping it local: {}", record.name, e);
                Ok(Saved {
                    record,
                    online: false,
                })
            }
        }
    }

    pub async fn messages(&self) -> Listing<StoredMessage> {
        let local = read_or_empty(self.store.messages(), "messages");
        if !self.prober.probe().await {
            return local_listing(local);
        }
        match self.api.messages().await {
            Ok(remote) => {
                let now = Utc::now();
                let remote = remote
                    .into_iter()
                    .map(|m| StoredMessage::from_remote(m, &now))
                    .collect();
                merged_listing(remote, local)
            }
            Err(e) => {
                tracing::warn!("fetching messages failed, using local copy: {}", e);
                local_listing(local)
            }
        }
    }

    pub async fn pdfs(&self) -> Listing<StoredPdf> {
        let local = read_or_empty(self.store.pdfs(), "PDFs");
        if !self.prober.probe().await {
            return local_listing(local);
        }
        match self.api.pdfs().await {
            Ok(remote) => {
                let now = Utc::now();
                let remote = remote
                    .into_iter()
                    .map(|p| StoredPdf::from_remote(p, &now))
                    .collect();
                merged_listing(remote, local)
            }
            Err(e) => {
                tracing::warn!("fetching PDFs failed, using local copy: {}", e);
                local_listing(local)
            }
        }
    }

    /// Look up one message by ID.
    ///
    /// A pending local copy is returned as is. Otherwise the remote is asked
    /// first, falling back to the local store when it is unreachable or
    /// fails.
    pub async fn message(&self, id: &str) -> Option<Found<StoredMessage>> {
        let local = find_local(self.store.messages(), id, "messages");
        if local.as_ref().is_some_and(Record::is_pending) || !self.prober.probe().await {
            return local.map(found_locally);
        }
        match self.api.message(id).await {
            Ok(remote) => Some(Found {
                record: StoredMessage::from_remote(remote, &Utc::now()),
                source: Source::Api,
            }),
            Err(e) => {
                tracing::warn!("fetching message {} failed, using local copy: {}", id, e);
                local.map(found_locally)
            }
        }
    }

    /// Look up one PDF by ID, the same way as [`DataManager::message`].
    pub async fn pdf(&self, id: &str) -> Option<Found<StoredPdf>> {
        let local = find_local(self.store.pdfs(), id, "PDFs");
        if local.as_ref().is_some_and(Record::is_pending) || !self.prober.probe().await {
            return local.map(found_locally);
        }
        match self.api.pdf(id).await {
            Ok(remote) => Some(Found {
                record: StoredPdf::from_remote(remote, &Utc::now()),
                source: Source::Api,
            }),
            Err(e) => {
                tracing::warn!("fetching PDF {} failed, using local copy: {}", id, e);
                local.map(found_locally)
            }
        }
    }

    /// Upload every pending message, then every pending PDF.
    ///
    /// A failed item is recorded and the batch continues.
    pub async fn sync_pending_data(&self) -> SyncSummary {
        let mut summary = SyncSummary::default();
        if !self.prober.probe().await {
            summary.errors.push(SyncFailure::Unreachable);
            return summary;
        }

        match self.store.pending_messages() {
            Ok(pending) => {
                for message in pending {
                    match self.api.save_message(&message.to_remote()).await {
                        Ok(_) => match self.store.mark_message_uploaded(&message.id) {
                            Ok(_) => summary.messages_synced += 1,
                            Err(e) => summary.errors.push(SyncFailure::Store(e.to_string())),
                        },
                        Err(error) => summary.errors.push(SyncFailure::Message {
                            id: message.id,
                            error,
                        }),
                    }
                }
            }
            Err(e) => summary.errors.push(SyncFailure::Store(e.to_string())),
        }

        match self.store.pending_pdfs() {
            Ok(pending) => {
                for pdf in pending {
                    match self.api.upload_pdf(&pdf.to_remote()).await {
                        Ok(_) => match self.store.mark_pdf_uploaded(&pdf.id) {
                            Ok(_) => summary.pdfs_synced += 1,
                            Err(e) => summary.errors.push(SyncFailure::Store(e.to_string())),
                        },
                        Err(error) => summary.errors.push(SyncFailure::Pdf {
                            id: pdf.id,
                            name: pdf.name,
                            error,
                        }),
                    }
                }
            }
            Err(e) => summary.errors.push(SyncFailure::Store(e.to_string())),
        }

        for failure in &summary.errors {
            tracing::warn!("sync: {}", failure);
        }
        tracing::info!(
            "synced {} message(s) and {} PDF(s)",
            summary.messages_synced,
            summary.pdfs_synced
        );
        summary
    }

    /// Replace each local collection with the remote records plus local
    /// pending records the remote does not have.
    ///
    /// Failures are logged; a collection whose remote read fails is left
    /// untouched.
    pub async fn merge_server_data(&self) -> MergeSummary {
        let now = Utc::now();
        let messages = match self.api.messages().await {
            Ok(remote) => {
                let remote = remote
                    .into_iter()
                    .map(|m| StoredMessage::from_remote(m, &now))
                    .collect();
                let merged = merge(remote, self.store.messages());
                let count = merged.len();
                match self.store.replace_messages(&merged) {
                    Ok(()) => Some(count),
                    Err(e) => {
                        tracing::error!("storing merged messages failed: {}", e);
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!("merge: fetching messages failed: {}", e);
                None
            }
        };

        let pdfs = match self.api.pdfs().await {
            Ok(remote) => {
                let remote = remote
                    .into_iter()
                    .map(|p| StoredPdf::from_remote(p, &now))
                    .collect();
                let merged = merge(remote, self.store.pdfs());
                let count = merged.len();
                match self.store.replace_pdfs(&merged) {
                    Ok(()) => Some(count),
                    Err(e) => {
                        tracing::error!("storing merged PDFs failed: {}", e);
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!("merge: fetching PDFs failed: {}", e);
                None
            }
        };

        MergeSummary { messages, pdfs }
    }

    /// Delete a message from this device only. Returns false if unknown.
    pub fn delete_message(&self, id: &str) -> StoreResult<bool> {
        self.store.remove_message(id)
    }

    /// Delete a PDF from this device only. Returns false if unknown.
    pub fn delete_pdf(&self, id: &str) -> StoreResult<bool> {
        self.store.remove_pdf(id)
    }

    pub fn conflict_strategy(&self) -> ConflictStrategy {
        *self.strategy.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the preferred conflict side. Merging is not affected.
    pub fn set_conflict_strategy(&self, strategy: ConflictStrategy) {
        tracing::info!("conflict strategy set to {:?}", strategy);
        *self.strategy.write().unwrap_or_else(PoisonError::into_inner) = strategy;
    }
}

fn find_local<T: Record>(result: StoreResult<Vec<T>>, id: &str, what: &str) -> Option<T> {
    read_or_empty(result, what)
        .into_iter()
        .find(|r| r.id() == id)
}

fn found_locally<T>(record: T) -> Found<T> {
    Found {
        record,
        source: Source::Local,
    }
}

fn read_or_empty<T>(result: StoreResult<Vec<T>>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::error!("reading local {} failed, treating as empty: {}", what, e);
        Vec::new()
    })
}

fn local_listing<T>(records: Vec<T>) -> Listing<T> {
    Listing {
        records,
        source: Source::Local,
    }
}

/// Local pending records whose ID the remote lacks.
fn pending_not_in<T: Record>(remote: &[T], local: Vec<T>) -> Vec<T> {
    let remote_ids: HashSet<&str> = remote.iter().map(|r| r.id()).collect();
    local
        .into_iter()
        .filter(|r| r.is_pending() && !remote_ids.contains(r.id()))
        .collect()
}

fn merged_listing<T: Record>(mut remote: Vec<T>, local: Vec<T>) -> Listing<T> {
    let pending = pending_not_in(&remote, local);
    let source = if pending.is_empty() {
        Source::Api
    } else {
        Source::Mixed
    };
    remote.extend(pending);
    Listing {
        records: remote,
        source,
    }
}

fn merge<T: Record>(mut remote: Vec<T>, local: StoreResult<Vec<T>>) -> Vec<T> {
    let local = read_or_empty(local, "records");
    let pending = pending_not_in(&remote, local);
    remote.extend(pending);
    remote
}

/// `id`, or `id` with a random suffix if a record already uses it.
fn unique_id<T: Record>(id: String, existing: &[T]) -> String {
    let mut candidate = id.clone();
    while existing.iter().any(|r| r.id() == candidate) {
        candidate = format!("{}-{}", id, random_suffix(4));
    }
    candidate
}

#[cfg(test)]
#[path = "data_tests.rs"]
mod tests;
