// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Cache generation lifecycle: warm-up on install, garbage collection on
//! activation, and explicit clear/update requests.

use std::time::Duration;

use chrono::Utc;
use offsync_core::WorkerMessage;

use super::FetchInterceptor;
use crate::cache::CacheResult;
use crate::net::Request;

/// Result of warming one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetOutcome {
    /// Fetched and stored on the given attempt (1-based).
    Cached { attempt: u32 },
    /// Already in the current generation; nothing was fetched.
    AlreadyCached,
    /// Every attempt failed.
    Failed,
}

/// Per-asset results of an install.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub cached: Vec<String>,
    pub already_cached: Vec<String>,
    pub failed: Vec<String>,
}

impl InstallReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result of activating the current generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivateReport {
    /// Superseded generations that were deleted.
    pub deleted: Vec<String>,
    /// Entries in the current generation afterwards.
    pub entries: usize,
}

impl FetchInterceptor {
    /// Warm the current generation with the essential asset manifest.
    ///
    /// An asset that still fails after its retries is logged and skipped.
    pub async fn install(&self) -> InstallReport {
        let mut report = InstallReport::default();
        for url in self.static_assets.clone() {
            match self.cache_asset_with_retry(&url).await {
                AssetOutcome::Cached { .. } => report.cached.push(url),
                AssetOutcome::AlreadyCached => report.already_cached.push(url),
                AssetOutcome::Failed => report.failed.push(url),
            }
        }
        tracing::info!(
            "install: {} cached, {} already cached, {} failed",
            report.cached.len(),
            report.already_cached.len(),
            report.failed.len()
        );
        report
    }

    /// Fetch and store one asset, retrying with exponential backoff.
    ///
    /// Each attempt first checks the cache, so an asset stored by a previous
    /// run is never fetched again.
    pub async fn cache_asset_with_retry(&self, url: &str) -> AssetOutcome {
        let attempts = self.warmup.attempts.max(1);
        let mut delay = Duration::from_millis(self.warmup.initial_delay_ms);
        for attempt in 1..=attempts {
            match self.cache.lookup(&self.cache_name, url).await {
                Ok(Some(_)) => return AssetOutcome::AlreadyCached,
                Ok(None) => {}
                Err(e) => tracing::warn!("cache lookup failed for {}: {}", url, e),
            }

            let request = Request::get(url).with_header("Cache-Control", "no-cache");
            match self.network.fetch(request).await {
                Ok(response) if response.is_success() => {
                    match self.cache.put(&self.cache_name, url, response).await {
                        Ok(()) => return AssetOutcome::Cached { attempt },
                        Err(e) => tracing::warn!("storing {} failed: {}", url, e),
                    }
                }
                Ok(response) => tracing::warn!(
                    "attempt {}/{} for {}: status {}",
                    attempt,
                    attempts,
                    url,
                    response.status
                ),
                Err(e) => tracing::warn!("attempt {}/{} for {}: {}", attempt, attempts, url, e),
            }

            if attempt < attempts {
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2);
            }
        }
        tracing::error!("giving up on {} after {} attempts", url, attempts);
        AssetOutcome::Failed
    }

    /// Delete every generation other than the current one.
    ///
    /// The current generation is never cleared here.
    pub async fn activate(&self) -> CacheResult<ActivateReport> {
        let mut report = ActivateReport::default();
        for name in self.cache.names().await? {
            if name != self.cache_name {
                tracing::info!("deleting stale cache generation {}", name);
                self.cache.delete(&name).await?;
                report.deleted.push(name);
            }
        }
        report.entries = self.cache.urls(&self.cache_name).await?.len();
        tracing::info!(
            "cache {} holds {} entries",
            self.cache_name,
            report.entries
        );
        Ok(report)
    }

    /// Drop the current generation and warm it again.
    pub async fn clear_cache(&self) -> WorkerMessage {
        if let Err(e) = self.cache.delete(&self.cache_name).await {
            tracing::error!("clearing cache {} failed: {}", self.cache_name, e);
            return WorkerMessage::CacheCleared {
                success: false,
                error: Some(e.to_string()),
                timestamp: Utc::now(),
            };
        }
        let report = self.install().await;
        WorkerMessage::CacheCleared {
            success: report.is_complete(),
            error: failure_summary(&report.failed),
            timestamp: Utc::now(),
        }
    }

    /// Fetch and store each asset in the current generation.
    pub async fn update_assets(&self, assets: Vec<String>) -> WorkerMessage {
        let mut failed = Vec::new();
        for asset in &assets {
            let url = self.resolve(asset);
            let stored = match self.network.fetch(Request::get(&url)).await {
                Ok(response) if response.is_success() => self
                    .cache
                    .put(&self.cache_name, &url, response)
                    .await
                    .map_err(|e| e.to_string()),
                Ok(response) => Err(format!("status {}", response.status)),
                Err(e) => Err(e.to_string()),
            };
            if let Err(e) = stored {
                tracing::warn!("updating asset {} failed: {}", url, e);
                failed.push(asset.clone());
            }
        }
        WorkerMessage::AssetsUpdated {
            success: failed.is_empty(),
            error: failure_summary(&failed),
            assets,
        }
    }
}

fn failure_summary(failed: &[String]) -> Option<String> {
    if failed.is_empty() {
        None
    } else {
        Some(format!("failed to cache: {}", failed.join(", ")))
    }
}
