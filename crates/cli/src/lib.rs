// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! offsync - An offline-first data engine.
//!
//! This crate keeps an application usable while its remote API is
//! unreachable: writes land in a local store and are pushed later, failed
//! API POSTs are queued and replayed, and requests are served from a
//! versioned response cache.
//!
//! # Main Components
//!
//! - [`BackgroundContext`] - owns the engine and its periodic tasks
//! - [`DataManager`] - application-facing save/list/sync facade
//! - [`FetchInterceptor`] - per-request caching strategies and fallbacks
//! - [`SyncQueue`] - persisted queue of failed POSTs
//! - [`ConnectivityProber`] - health probe of the remote API
//! - [`ClientNotifier`] - broadcasts to connected application instances
//!
//! # Usage
//!
//! ```rust,ignore
//! use offsync::{BackgroundContext, Config, FileStore, DiskCache, HttpNetwork};
//!
//! let config = Config::default();
//! let network = Arc::new(HttpNetwork::new(config.request_timeout())?);
//! let ctx = BackgroundContext::new(
//!     config,
//!     network,
//!     Arc::new(FileStore::open("store.json")?),
//!     Arc::new(DiskCache::new("cache")),
//! )?;
//! ctx.install().await;
//! ctx.activate().await?;
//! let saved = ctx.data_manager().save_message("hello").await?;
//! ```

mod cli;
pub mod colors;
mod commands;

pub mod api;
pub mod cache;
pub mod config;
pub mod context;
pub mod data;
pub mod env;
pub mod error;
pub mod intercept;
pub mod net;
pub mod notify;
pub mod probe;
pub mod store;
pub mod sync;

#[cfg(test)]
mod test_helpers;

pub use api::ApiClient;
pub use cache::{CacheError, CacheStorage, DiskCache, MemoryCache};
pub use cli::{Cli, Command, GlobalArgs};
pub use config::{Config, ConfigError};
pub use context::{AppClient, BackgroundContext, ContextError, ContextHandle, PlatformSignal};
pub use data::{
    ConflictStrategy, DataManager, Found, Listing, MergeSummary, PdfFile, PdfRejection, Saved,
    Source, SyncSummary,
};
pub use error::{Error, Result};
pub use intercept::{ActivateReport, FetchInterceptor, InstallReport, RequestClass};
pub use net::{HttpNetwork, Network, NetworkError, Request, Response};
pub use notify::{ClickOutcome, ClientNotifier};
pub use probe::ConnectivityProber;
pub use store::{FileStore, KvStore, LocalStore, MemoryStore, StoreError};
pub use sync::{QueueError, ReplayReport, SyncQueue};

use commands::Session;

/// Run a parsed command line to completion.
pub fn run(cli: Cli) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Io(std::io::Error::other(format!("tokio: {}", e))))?;
    rt.block_on(dispatch(cli))
}

async fn dispatch(cli: Cli) -> Result<()> {
    let session = Session::open(&cli.global)?;
    match cli.command {
        Command::Send { text } => commands::records::send(&session, &text).await,
        Command::Upload { path } => commands::records::upload(&session, &path).await,
        Command::Messages => commands::records::messages(&session).await,
        Command::Pdfs => commands::records::pdfs(&session).await,
        Command::ShowMessage { id } => commands::records::show_message(&session, &id).await,
        Command::ShowPdf { id } => commands::records::show_pdf(&session, &id).await,
        Command::DeleteMessage { id } => commands::records::delete_message(&session, &id),
        Command::DeletePdf { id } => commands::records::delete_pdf(&session, &id),
        Command::Status => commands::status::status(&session).await,
        Command::Pending => commands::status::pending(&session),
        Command::Sync => commands::sync::sync(&session).await,
        Command::Merge { strategy } => commands::sync::merge(&session, strategy).await,
        Command::Warm => commands::cache::warm(&session).await,
        Command::ClearCache => commands::cache::clear_cache(&session).await,
        Command::Fetch {
            url,
            navigate,
            post,
        } => commands::cache::fetch(&session, &url, navigate, post.as_deref()).await,
        Command::Run => commands::run::run(&session).await,
    }
}
