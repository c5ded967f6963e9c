// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client for the remote messages/PDFs API.

use std::sync::Arc;
use std::time::Duration;

use offsync_core::{MessageData, PdfData, RemoteError};
use serde::de::DeserializeOwned;

use crate::net::{Network, NetworkError, Request, Response};

/// Typed access to `/messages`, `/pdfs`, and `/health` under a base URL.
#[derive(Clone)]
pub struct ApiClient {
    network: Arc<dyn Network>,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    /// `timeout` is only used to describe timeouts reported by the network.
    pub fn new(network: Arc<dyn Network>, base_url: impl Into<String>, timeout: Duration) -> Self {
        ApiClient {
            network,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn health_url(&self) -> String {
        self.url("health")
    }

    pub fn messages_url(&self) -> String {
        self.url("messages")
    }

    pub fn pdfs_url(&self) -> String {
        self.url("pdfs")
    }

    /// Send a request; any non-2xx status is a rejection.
    pub async fn send(&self, request: Request) -> Result<Response, RemoteError> {
        let response = self
            .network
            .fetch(request)
            .await
            .map_err(|e| self.remote_error(e))?;
        if !response.is_success() {
            return Err(RemoteError::Rejected {
                status: response.status,
            });
        }
        Ok(response)
    }

    /// POST an arbitrary JSON body to an absolute URL.
    pub async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<Response, RemoteError> {
        self.send(Request::post_json(url, body)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, RemoteError> {
        let response = self.send(Request::get(url)).await?;
        decode(&response)
    }

    async fn post_record<T>(&self, url: String, record: &T) -> Result<T, RemoteError>
    where
        T: serde::Serialize + DeserializeOwned,
    {
        let body = serde_json::to_value(record).map_err(|e| RemoteError::Decode(e.to_string()))?;
        let response = self.post_json(&url, &body).await?;
        decode(&response)
    }

    pub async fn save_message(&self, message: &MessageData) -> Result<MessageData, RemoteError> {
        self.post_record(self.messages_url(), message).await
    }

    pub async fn messages(&self) -> Result<Vec<MessageData>, RemoteError> {
        self.get_json(self.messages_url()).await
    }

    pub async fn message(&self, id: &str) -> Result<MessageData, RemoteError> {
        self.get_json(self.url(&format!("messages/{}", id))).await
    }

    pub async fn upload_pdf(&self, pdf: &PdfData) -> Result<PdfData, RemoteError> {
        self.post_record(self.pdfs_url(), pdf).await
    }

    pub async fn pdfs(&self) -> Result<Vec<PdfData>, RemoteError> {
        self.get_json(self.pdfs_url()).await
    }

    pub async fn pdf(&self, id: &str) -> Result<PdfData, RemoteError> {
        self.get_json(self.url(&format!("pdfs/{}", id))).await
    }

    fn remote_error(&self, err: NetworkError) -> RemoteError {
        match err {
            NetworkError::Timeout => RemoteError::Timeout(self.timeout),
            NetworkError::Connection(msg) | NetworkError::InvalidRequest(msg) => {
                RemoteError::Network(msg)
            }
        }
    }
}

fn decode<T: DeserializeOwned>(response: &Response) -> Result<T, RemoteError> {
    response
        .parse_json()
        .map_err(|e| RemoteError::Decode(e.to_string()))
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
