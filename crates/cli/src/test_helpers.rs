// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for unit tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;

use crate::config::Config;
use crate::net::{Method, Network, NetworkError, NetworkResult, Request, Response};

pub const ORIGIN: &str = "http://app.test";
pub const API: &str = "http://api.test/api";

type Handler = Box<dyn Fn(&Request) -> Response + Send + Sync>;

/// Scripted network: per-route responses, an offline switch, and a log of
/// every request it saw.
#[derive(Default)]
pub struct MockNetwork {
    routes: Mutex<HashMap<(Method, String), Handler>>,
    hanging: Mutex<HashSet<String>>,
    offline: AtomicBool,
    requests: Mutex<Vec<Request>>,
}

impl MockNetwork {
    pub fn new() -> Arc<Self> {
        Arc::new(MockNetwork::default())
    }

    pub fn route(&self, method: Method, url: &str, response: Response) {
        self.respond_with(method, url, move |_| response.clone());
    }

    pub fn respond_with(
        &self,
        method: Method,
        url: &str,
        handler: impl Fn(&Request) -> Response + Send + Sync + 'static,
    ) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, url.to_string()), Box::new(handler));
    }

    /// Requests to `url` never complete.
    pub fn hang(&self, url: &str) {
        self.hanging.lock().unwrap().insert(url.to_string());
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }

    /// Healthy remote API: health probe succeeds and messages/PDFs echo back
    /// with a server ID.
    pub fn serve_api(&self) {
        self.route(Method::Head, &format!("{}/health", API), Response::new(200, ""));
        self.route(
            Method::Get,
            &format!("{}/messages", API),
            Response::json(200, &serde_json::json!([])),
        );
        self.route(
            Method::Get,
            &format!("{}/pdfs", API),
            Response::json(200, &serde_json::json!([])),
        );
        self.respond_with(Method::Post, &format!("{}/messages", API), |req| {
            let mut body = req.json_body();
            body["id"] = serde_json::json!("srv-m1");
            Response::json(201, &body)
        });
        self.respond_with(Method::Post, &format!("{}/pdfs", API), |req| {
            let mut body = req.json_body();
            body["id"] = serde_json::json!("srv-p1");
            Response::json(201, &body)
        });
    }
}

impl Network for MockNetwork {
    fn fetch(&self, request: Request) -> BoxFuture<'_, NetworkResult<Response>> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(request.clone());
            let hang = self.hanging.lock().unwrap().contains(&request.url);
            if hang {
                futures_util::future::pending::<()>().await;
            }
            if self.offline.load(Ordering::SeqCst) {
                return Err(NetworkError::Connection("network is down".to_string()));
            }
            let routes = self.routes.lock().unwrap();
            match routes.get(&(request.method, request.url.clone())) {
                Some(handler) => Ok(handler(&request)),
                None => Ok(Response::new(404, "not found")),
            }
        })
    }
}

/// Configuration pointing at the test origin and API.
pub fn test_config() -> Config {
    Config {
        api_base_url: API.to_string(),
        origin: ORIGIN.to_string(),
        ..Config::default()
    }
}
