// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command implementations for the `offsync` binary.
//!
//! Every command ends with exactly one status notice. With `--json`, the
//! structured result goes to stdout and the notice to stderr so stdout
//! stays parseable.

pub mod cache;
pub mod records;
pub mod run;
pub mod status;
pub mod sync;

use std::sync::Arc;

use serde::Serialize;

use crate::cache::DiskCache;
use crate::cli::GlobalArgs;
use crate::colors::{self, Level};
use crate::config::{self, Config};
use crate::context::BackgroundContext;
use crate::error::Result;
use crate::net::{HttpNetwork, Network};
use crate::store::FileStore;

/// An opened engine plus output preferences for one command.
pub struct Session {
    ctx: Arc<BackgroundContext>,
    network: Arc<dyn Network>,
    json: bool,
}

impl Session {
    /// Open the on-disk engine described by the global flags.
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        let state_dir = config::resolve_state_dir(global.state_dir.as_deref());
        std::fs::create_dir_all(&state_dir)?;
        let config = Config::resolve(global.config.as_deref(), &state_dir)?;
        tracing::debug!("state dir {}", state_dir.display());

        let network: Arc<dyn Network> = Arc::new(HttpNetwork::new(config.request_timeout())?);
        let kv = Arc::new(FileStore::open(config::store_path(&state_dir))?);
        let cache = Arc::new(DiskCache::new(config::cache_dir(&state_dir)));
        let ctx = BackgroundContext::new(config, network.clone(), kv, cache)?;
        Ok(Session::new(ctx, network, global.json))
    }

    pub fn new(ctx: Arc<BackgroundContext>, network: Arc<dyn Network>, json: bool) -> Self {
        Session { ctx, network, json }
    }

    pub fn ctx(&self) -> &Arc<BackgroundContext> {
        &self.ctx
    }

    pub fn network(&self) -> &Arc<dyn Network> {
        &self.network
    }

    pub fn json(&self) -> bool {
        self.json
    }

    /// Print the one-line status notice that closes every command.
    pub fn notice(&self, level: Level, text: &str) {
        let line = colors::notice(level, text);
        if self.json {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    /// Print a structured result when `--json` was given.
    ///
    /// Returns false in text mode so callers can fall through to their
    /// human-readable rendering.
    pub fn emit<T: Serialize>(&self, value: &T) -> Result<bool> {
        if !self.json {
            return Ok(false);
        }
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(true)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.ctx.teardown();
    }
}

/// Shorten long text for one-line listings.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
