// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use futures_util::future::BoxFuture;
use offsync::net::{Method, NetworkResult};
use offsync::{
    BackgroundContext, Config, MemoryCache, MemoryStore, Network, NetworkError, Request, Response,
};
use serde_json::json;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

pub const ORIGIN: &str = "http://app.example";
pub const API: &str = "http://api.example/api";

pub fn offsync() -> Command {
    cargo_bin_cmd!("offsync")
}

/// A state directory whose config points at an API that refuses
/// connections, so every probe fails fast.
pub fn offline_state() -> TempDir {
    let temp = TempDir::new().unwrap();
    write_config(
        temp.path(),
        "api_base_url = \"http://127.0.0.1:9/api\"\n\
         origin = \"http://127.0.0.1:9\"\n\
         probe_timeout_secs = 2\n\
         request_timeout_secs = 2\n\
         static_assets = []\n",
    );
    temp
}

pub fn write_config(state_dir: &Path, toml: &str) {
    std::fs::write(state_dir.join("config.toml"), toml).unwrap();
}

/// `offsync` with its state directory pinned and the environment cleared of
/// variables that would redirect it.
pub fn offsync_in(state: &TempDir) -> Command {
    let mut cmd = offsync();
    cmd.arg("--state-dir")
        .arg(state.path())
        .env_remove("OFFSYNC_CONFIG")
        .env_remove("OFFSYNC_STATE_DIR")
        .env("NO_COLOR", "1");
    cmd
}

/// In-memory remote API and origin server.
///
/// While `up` the health probe succeeds, message and PDF POSTs echo the body
/// with a server ID, and GETs return what was posted. Origin assets come
/// from `assets`. While down every request fails at the connection level.
#[derive(Default)]
pub struct FakeServer {
    up: AtomicBool,
    reject_posts: AtomicBool,
    assets: Mutex<HashMap<String, Vec<u8>>>,
    messages: Mutex<Vec<serde_json::Value>>,
    pdfs: Mutex<Vec<serde_json::Value>>,
    log: Mutex<Vec<(Method, String)>>,
}

impl FakeServer {
    pub fn new() -> Arc<Self> {
        let server = FakeServer::default();
        server.up.store(true, Ordering::SeqCst);
        Arc::new(server)
    }

    pub fn set_up(&self, up: bool) {
        self.up.store(up, Ordering::SeqCst);
    }

    /// Answer message and PDF POSTs with 500 while the server stays up.
    pub fn reject_posts(&self, reject: bool) {
        self.reject_posts.store(reject, Ordering::SeqCst);
    }

    pub fn add_asset(&self, path: &str, body: &[u8]) {
        self.assets
            .lock()
            .unwrap()
            .insert(format!("{}{}", ORIGIN, path), body.to_vec());
    }

    pub fn remote_messages(&self) -> Vec<serde_json::Value> {
        self.messages.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, url: &str) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, u)| *m == method && u == url)
            .count()
    }

    fn post(
        &self,
        collection: &Mutex<Vec<serde_json::Value>>,
        prefix: &str,
        request: &Request,
    ) -> Response {
        if self.reject_posts.load(Ordering::SeqCst) {
            return Response::new(500, "boom");
        }
        let mut items = collection.lock().unwrap();
        let mut body = request.json_body();
        body["id"] = json!(format!("{}-{}", prefix, items.len() + 1));
        items.push(body.clone());
        Response::json(201, &body)
    }

    fn answer(&self, request: &Request) -> Response {
        let messages = format!("{}/messages", API);
        let pdfs = format!("{}/pdfs", API);
        match (request.method, request.url.as_str()) {
            (Method::Head, url) if url == format!("{}/health", API) => Response::new(200, ""),
            (Method::Post, url) if url == messages => self.post(&self.messages, "m", request),
            (Method::Post, url) if url == pdfs => self.post(&self.pdfs, "p", request),
            (Method::Get, url) if url == messages => {
                Response::json(200, &json!(*self.messages.lock().unwrap()))
            }
            (Method::Get, url) if url == pdfs => {
                Response::json(200, &json!(*self.pdfs.lock().unwrap()))
            }
            (Method::Get, url) => match self.assets.lock().unwrap().get(url) {
                Some(body) => Response::new(200, body.clone()),
                None => Response::new(404, "not found"),
            },
            _ => Response::new(405, "method not allowed"),
        }
    }
}

impl Network for FakeServer {
    fn fetch(&self, request: Request) -> BoxFuture<'_, NetworkResult<Response>> {
        Box::pin(async move {
            self.log
                .lock()
                .unwrap()
                .push((request.method, request.url.clone()));
            if !self.up.load(Ordering::SeqCst) {
                return Err(NetworkError::Connection("connection refused".to_string()));
            }
            Ok(self.answer(&request))
        })
    }
}

pub fn config() -> Config {
    Config {
        api_base_url: API.to_string(),
        origin: ORIGIN.to_string(),
        ..Config::default()
    }
}

/// A context over the fake server with in-memory storage.
pub fn context(server: &Arc<FakeServer>) -> Arc<BackgroundContext> {
    BackgroundContext::new(
        config(),
        server.clone(),
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryCache::new()),
    )
    .unwrap()
}
