// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fetch interception.
//!
//! Every request from the application passes through
//! [`FetchInterceptor::handle_fetch`], which picks a strategy by request
//! class:
//!
//! | Class | GET | POST |
//! |---|---|---|
//! | Static / Default | cache first | network only |
//! | Navigation | network first | network only |
//! | Api | network only, 503 JSON when offline | queued on network failure |
//!
//! Failures always resolve to a response; nothing here returns an error.

mod classify;
mod fallback;
mod lifecycle;

pub use classify::{is_image, Classifier, RequestClass};
pub use lifecycle::{ActivateReport, AssetOutcome, InstallReport};

use std::sync::Arc;

use serde_json::json;
use url::Url;

use crate::cache::CacheStorage;
use crate::config::{Config, ConfigResult, WarmupConfig};
use crate::net::{Method, Network, Request, Response};
use crate::sync::SyncQueue;

/// Serves requests from network and cache according to their class.
pub struct FetchInterceptor {
    network: Arc<dyn Network>,
    cache: Arc<dyn CacheStorage>,
    queue: Arc<SyncQueue>,
    classifier: Classifier,
    cache_name: String,
    origin: Url,
    offline_page: String,
    static_assets: Vec<String>,
    warmup: WarmupConfig,
}

impl FetchInterceptor {
    pub fn new(
        config: &Config,
        network: Arc<dyn Network>,
        cache: Arc<dyn CacheStorage>,
        queue: Arc<SyncQueue>,
    ) -> ConfigResult<Self> {
        let origin = config.origin_url()?;
        let offline_page = resolve(&origin, &config.offline_page);
        let static_assets = config
            .static_assets
            .iter()
            .map(|asset| resolve(&origin, asset))
            .collect();
        Ok(FetchInterceptor {
            network,
            cache,
            queue,
            classifier: Classifier::new(
                config.api_base_url.clone(),
                config.static_prefixes.clone(),
                config.analytics_domains.clone(),
            ),
            cache_name: config.cache_name.clone(),
            origin,
            offline_page,
            static_assets,
            warmup: config.warmup,
        })
    }

    /// The current cache generation.
    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// Absolute URLs of the essential asset manifest.
    pub fn static_assets(&self) -> &[String] {
        &self.static_assets
    }

    /// Resolve a path against the application origin.
    pub fn resolve(&self, path: &str) -> String {
        resolve(&self.origin, path)
    }

    /// Answer a request, or return `None` to let it through untouched.
    pub async fn handle_fetch(&self, request: Request) -> Option<Response> {
        if self.classifier.is_excluded(&request) {
            tracing::debug!("not intercepting {} {}", request.method, request.url);
            return None;
        }
        let class = self.classifier.classify(&request);
        let response = match (class, request.method) {
            (RequestClass::Api, Method::Post) => self.passthrough_with_queue(request).await,
            (RequestClass::Api, _) => self.network_only(request).await,
            (_, Method::Post) => self.forward(request).await,
            (RequestClass::Navigation, _) => self.network_first(request).await,
            (RequestClass::Static | RequestClass::Default, _) => self.cache_first(request).await,
        };
        Some(response)
    }

    /// Serve from cache; otherwise fetch and cache same-origin successes.
    pub async fn cache_first(&self, request: Request) -> Response {
        if let Some(hit) = self.cached(&request.url).await {
            tracing::debug!("cache hit: {}", request.url);
            return hit;
        }
        match self.network.fetch(request.clone()).await {
            Ok(response) => {
                if response.is_success() && self.is_same_origin(&request.url) {
                    self.store(&request.url, response.clone()).await;
                }
                response
            }
            Err(e) => {
                tracing::debug!("fetch failed for {}: {}", request.url, e);
                if is_image(&request) {
                    fallback::image_placeholder()
                } else if request.accepts("text/html") {
                    self.offline_page().await
                } else {
                    fallback::unavailable()
                }
            }
        }
    }

    /// Fetch and refresh the cache; fall back to the cache, then the
    /// offline page.
    pub async fn network_first(&self, request: Request) -> Response {
        let failure = match self.network.fetch(request.clone()).await {
            Ok(response) if response.is_success() => {
                self.store(&request.url, response.clone()).await;
                return response;
            }
            Ok(response) => Some(response),
            Err(e) => {
                tracing::debug!("navigation to {} failed: {}", request.url, e);
                None
            }
        };
        if let Some(hit) = self.cached(&request.url).await {
            return hit;
        }
        match failure {
            Some(response) => response,
            None => self.offline_page().await,
        }
    }

    /// Proxy to the network without caching.
    pub async fn network_only(&self, request: Request) -> Response {
        match self.network.fetch(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::info!("API unreachable: {}", e);
                fallback::offline_json()
            }
        }
    }

    /// Proxy a POST; when the network fails, queue it and answer 202.
    pub async fn passthrough_with_queue(&self, request: Request) -> Response {
        let url = request.url.clone();
        let body = request.json_body();
        match self.network.fetch(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::info!("POST {} failed ({}), queueing", url, e);
                match self.queue.capture(&url, body) {
                    Ok(item) => Response::json(
                        202,
                        &json!({
                            "queued": true,
                            "id": item.id,
                            "message": "Request saved and will be sent when back online",
                        }),
                    ),
                    Err(e) => {
                        tracing::error!("could not queue POST {}: {}", url, e);
                        fallback::offline_json()
                    }
                }
            }
        }
    }

    async fn forward(&self, request: Request) -> Response {
        match self.network.fetch(request).await {
            Ok(response) => response,
            Err(_) => fallback::unavailable(),
        }
    }

    /// The cached offline page, or the built-in one.
    pub async fn offline_page(&self) -> Response {
        match self.cached(&self.offline_page).await {
            Some(page) => page,
            None => fallback::offline_html(),
        }
    }

    /// Look `url` up in the current generation, then in any other.
    async fn cached(&self, url: &str) -> Option<Response> {
        match self.cache.lookup(&self.cache_name, url).await {
            Ok(Some(hit)) => return Some(hit),
            Ok(None) => {}
            Err(e) => tracing::warn!("cache lookup failed for {}: {}", url, e),
        }
        let names = match self.cache.names().await {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!("listing cache generations failed: {}", e);
                return None;
            }
        };
        for name in names.iter().filter(|n| **n != self.cache_name) {
            if let Ok(Some(hit)) = self.cache.lookup(name, url).await {
                return Some(hit);
            }
        }
        None
    }

    async fn store(&self, url: &str, response: Response) {
        match self.cache.put(&self.cache_name, url, response).await {
            Ok(()) => tracing::debug!("cached {}", url),
            Err(e) => tracing::warn!("caching {} failed: {}", url, e),
        }
    }

    fn is_same_origin(&self, url: &str) -> bool {
        Url::parse(url)
            .map(|u| u.origin() == self.origin.origin())
            .unwrap_or(false)
    }
}

fn resolve(origin: &Url, path: &str) -> String {
    origin
        .join(path)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| path.to_string())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
