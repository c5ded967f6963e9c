// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Stored records and their remote API representations.
//!
//! A record is either a text message or a PDF file. The `uploaded` flag is
//! the single source of truth for whether a record still needs to be sent to
//! the remote API.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id;

/// Prefix of the data URL under which PDF payloads are stored locally.
pub const PDF_DATA_URL_PREFIX: &str = "data:application/pdf;base64,";

/// Common view over stored records.
pub trait Record {
    /// The record's identifier.
    fn id(&self) -> &str;

    /// Whether the record has been accepted by the remote API.
    fn is_uploaded(&self) -> bool;

    /// Flag the record as accepted by the remote API.
    fn mark_uploaded(&mut self);

    /// Whether the record still needs to be synchronized.
    fn is_pending(&self) -> bool {
        !self.is_uploaded()
    }
}

/// A text message as persisted in the local store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: String,
    pub msg: String,
    pub date: DateTime<Utc>,
    pub uploaded: bool,
}

/// A message as exchanged with `/api/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub msg: String,
    pub date: DateTime<Utc>,
}

impl StoredMessage {
    /// A message created locally that has not reached the remote yet.
    pub fn pending(msg: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        StoredMessage {
            id: id::message_id(&created_at),
            msg: msg.into(),
            date: created_at,
            uploaded: false,
        }
    }

    /// A message the remote API already holds.
    ///
    /// Remote records without an ID get a time-based one.
    pub fn from_remote(data: MessageData, now: &DateTime<Utc>) -> Self {
        StoredMessage {
            id: data.id.unwrap_or_else(|| id::message_id(now)),
            msg: data.msg,
            date: data.date,
            uploaded: true,
        }
    }

    /// The payload sent to the remote API. The server assigns the ID.
    pub fn to_remote(&self) -> MessageData {
        MessageData::new(self.msg.clone(), self.date)
    }
}

impl MessageData {
    pub fn new(msg: impl Into<String>, date: DateTime<Utc>) -> Self {
        MessageData {
            id: None,
            msg: msg.into(),
            date,
        }
    }
}

impl Record for StoredMessage {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_uploaded(&self) -> bool {
        self.uploaded
    }

    fn mark_uploaded(&mut self) {
        self.uploaded = true;
    }
}

/// A PDF file as persisted in the local store.
///
/// The binary payload is kept as a base64 data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPdf {
    pub id: String,
    pub name: String,
    pub size: u64,
    pub data_url: String,
    pub timestamp: DateTime<Utc>,
    pub uploaded: bool,
}

/// A PDF as exchanged with `/api/pdfs`. `data` is plain base64 without a
/// data URL prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub size: u64,
    pub data: String,
    pub timestamp: DateTime<Utc>,
}

impl StoredPdf {
    /// A PDF stored locally from raw bytes, not yet uploaded.
    pub fn pending(name: impl Into<String>, bytes: &[u8], created_at: DateTime<Utc>) -> Self {
        StoredPdf {
            id: id::pdf_id(&created_at),
            name: name.into(),
            size: bytes.len() as u64,
            data_url: format!("{}{}", PDF_DATA_URL_PREFIX, STANDARD.encode(bytes)),
            timestamp: created_at,
            uploaded: false,
        }
    }

    /// A PDF the remote API already holds.
    pub fn from_remote(data: PdfData, now: &DateTime<Utc>) -> Self {
        StoredPdf {
            id: data.id.unwrap_or_else(|| id::pdf_id(now)),
            name: data.name,
            size: data.size,
            data_url: format!("{}{}", PDF_DATA_URL_PREFIX, data.data),
            timestamp: data.timestamp,
            uploaded: true,
        }
    }

    /// The base64 payload with any data URL prefix removed.
    pub fn base64_payload(&self) -> &str {
        match self.data_url.split_once(',') {
            Some((_, data)) => data,
            None => &self.data_url,
        }
    }

    /// Decode the stored payload back into bytes.
    pub fn bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.base64_payload())
    }

    /// The payload sent to the remote API. The server assigns the ID.
    pub fn to_remote(&self) -> PdfData {
        PdfData {
            id: None,
            name: self.name.clone(),
            size: self.size,
            data: self.base64_payload().to_string(),
            timestamp: self.timestamp,
        }
    }
}

impl Record for StoredPdf {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_uploaded(&self) -> bool {
        self.uploaded
    }

    fn mark_uploaded(&mut self) {
        self.uploaded = true;
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
