// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The background execution context.
//!
//! [`BackgroundContext`] owns every engine component and the tasks it
//! spawns. Application instances talk to it only through messages: a
//! [`ContextHandle`] carries requests in, and each instance receives
//! broadcasts on its own channel from the [`ClientNotifier`].
//!
//! Lifecycle: `install` warms the cache, `activate` garbage-collects stale
//! cache generations and starts periodic probing, `teardown` stops the
//! tasks.

use std::sync::{Arc, Mutex, PoisonError};

use offsync_core::{ClientRequest, NetworkStatus, WorkerMessage};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::cache::{CacheResult, CacheStorage};
use crate::config::{Config, ConfigResult};
use crate::data::DataManager;
use crate::intercept::{ActivateReport, FetchInterceptor, InstallReport};
use crate::net::{Network, Request, Response};
use crate::notify::{ClientId, ClientNotifier};
use crate::probe::ConnectivityProber;
use crate::store::{KvStore, LocalStore};
use crate::sync::{QueueError, ReplayReport, SyncQueue};

const REQUEST_BUFFER: usize = 64;

/// Link-layer connectivity changes reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformSignal {
    Online,
    Offline,
}

/// Error type for talking to the background context.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    /// The message loop has stopped.
    #[error("background context is not running")]
    Closed,

    /// The request does not produce a reply.
    #[error("no reply for this request")]
    NoReply,
}

struct Envelope {
    request: ClientRequest,
    reply: Option<oneshot::Sender<WorkerMessage>>,
}

/// Owns the engine components for one background execution context.
pub struct BackgroundContext {
    config: Config,
    store: LocalStore,
    api: ApiClient,
    prober: Arc<ConnectivityProber>,
    notifier: Arc<ClientNotifier>,
    queue: Arc<SyncQueue>,
    interceptor: FetchInterceptor,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl BackgroundContext {
    pub fn new(
        config: Config,
        network: Arc<dyn Network>,
        kv: Arc<dyn KvStore>,
        cache: Arc<dyn CacheStorage>,
    ) -> ConfigResult<Arc<Self>> {
        let origin = config.origin_url()?;
        let store = LocalStore::new(kv);
        let api = ApiClient::new(
            network.clone(),
            config.api_base_url.clone(),
            config.request_timeout(),
        );
        let prober = Arc::new(ConnectivityProber::new(
            network.clone(),
            api.health_url(),
            config.probe_timeout(),
        ));
        let notifier = Arc::new(ClientNotifier::new(
            Some(origin),
            config.notification_icon.clone(),
        ));
        let queue = Arc::new(SyncQueue::new(
            store.clone(),
            api.clone(),
            notifier.clone(),
            config.max_replay_attempts,
        ));
        let interceptor = FetchInterceptor::new(&config, network, cache, queue.clone())?;

        Ok(Arc::new(BackgroundContext {
            config,
            store,
            api,
            prober,
            notifier,
            queue,
            interceptor,
            tasks: Mutex::new(Vec::new()),
        }))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn prober(&self) -> &ConnectivityProber {
        &self.prober
    }

    pub fn notifier(&self) -> &Arc<ClientNotifier> {
        &self.notifier
    }

    pub fn queue(&self) -> &SyncQueue {
        &self.queue
    }

    pub fn interceptor(&self) -> &FetchInterceptor {
        &self.interceptor
    }

    /// A data facade sharing this context's store, API client, and prober.
    pub fn data_manager(&self) -> DataManager {
        DataManager::new(self.store.clone(), self.api.clone(), self.prober.clone())
    }

    pub async fn install(&self) -> InstallReport {
        self.interceptor.install().await
    }

    /// Garbage-collect stale cache generations, probe once, and start the
    /// periodic probe.
    pub async fn activate(self: &Arc<Self>) -> CacheResult<ActivateReport> {
        let report = self.interceptor.activate().await?;
        self.check_network_status().await;

        let ctx = Arc::clone(self);
        let period = self.config.probe_interval();
        self.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                ctx.probe_tick().await;
            }
        });
        Ok(report)
    }

    /// Stop every task this context started.
    pub fn teardown(&self) {
        let tasks: Vec<_> = self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        tracing::debug!("tearing down {} background task(s)", tasks.len());
        for task in tasks {
            task.abort();
        }
    }

    fn spawn(&self, task: impl std::future::Future<Output = ()> + Send + 'static) {
        let handle = tokio::spawn(task);
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.retain(|t| !t.is_finished());
        tasks.push(handle);
    }

    /// Probe and tell every instance the result.
    pub async fn check_network_status(&self) -> NetworkStatus {
        self.prober.probe().await;
        let status = self.prober.state().status();
        self.notifier
            .broadcast(&WorkerMessage::network_status(status));
        status
    }

    /// One periodic probe. A transition to reachable counts as coming back
    /// online.
    async fn probe_tick(&self) {
        let was_reachable = self.prober.is_reachable();
        let status = self.check_network_status().await;
        if !was_reachable && status == NetworkStatus::Online {
            self.replay_if_needed().await;
        }
    }

    /// React to a platform connectivity change.
    pub async fn on_platform_signal(&self, signal: PlatformSignal) {
        match signal {
            PlatformSignal::Offline => {
                self.prober.mark_offline();
                self.notifier
                    .broadcast(&WorkerMessage::network_status(NetworkStatus::Offline));
            }
            PlatformSignal::Online => {
                if self.check_network_status().await == NetworkStatus::Online {
                    self.replay_if_needed().await;
                }
            }
        }
    }

    async fn replay_if_needed(&self) -> Option<ReplayReport> {
        let requested = self.queue.take_replay_request();
        let pending = self.queue.pending_count().unwrap_or(0);
        if requested || pending > 0 {
            self.replay().await
        } else {
            None
        }
    }

    /// Run a replay pass, logging instead of failing.
    pub async fn replay(&self) -> Option<ReplayReport> {
        match self.queue.replay_all().await {
            Ok(report) => Some(report),
            Err(QueueError::ReplayInProgress) => {
                tracing::debug!("replay skipped: another pass is running");
                None
            }
            Err(e) => {
                tracing::error!("replay failed: {}", e);
                None
            }
        }
    }

    /// Answer a request from an application instance.
    pub async fn handle_message(&self, request: ClientRequest) -> Option<WorkerMessage> {
        tracing::debug!("handling {:?}", request);
        match request {
            ClientRequest::GetPendingSyncCount => {
                let count = self.queue.pending_count().unwrap_or_else(|e| {
                    tracing::error!("reading sync queue failed: {}", e);
                    0
                });
                Some(WorkerMessage::PendingSyncCount { count })
            }
            ClientRequest::TriggerSync => {
                self.replay().await;
                None
            }
            ClientRequest::ClearCache => Some(self.interceptor.clear_cache().await),
            ClientRequest::UpdateAssets { assets } => {
                Some(self.interceptor.update_assets(assets).await)
            }
            ClientRequest::CheckNetwork => {
                self.check_network_status().await;
                None
            }
        }
    }

    /// Route a request through the interceptor.
    pub async fn handle_fetch(&self, request: Request) -> Option<Response> {
        self.interceptor.handle_fetch(request).await
    }

    /// Start serving requests from application instances.
    ///
    /// Each request is handled on its own task, so a long replay does not
    /// hold up a pending-count query.
    pub fn spawn_message_loop(self: &Arc<Self>) -> ContextHandle {
        let (tx, mut rx) = mpsc::channel::<Envelope>(REQUEST_BUFFER);
        let ctx = Arc::clone(self);
        self.spawn(async move {
            while let Some(envelope) = rx.recv().await {
                let handler = Arc::clone(&ctx);
                ctx.spawn(async move {
                    let reply = handler.handle_message(envelope.request).await;
                    if let (Some(tx), Some(reply)) = (envelope.reply, reply) {
                        if tx.send(reply).is_err() {
                            tracing::debug!("requester went away before the reply");
                        }
                    }
                });
            }
        });
        ContextHandle { tx }
    }
}

/// Sends requests to a running message loop.
#[derive(Clone)]
pub struct ContextHandle {
    tx: mpsc::Sender<Envelope>,
}

impl ContextHandle {
    /// Send a request without waiting for an answer.
    pub async fn post(&self, request: ClientRequest) -> Result<(), ContextError> {
        self.tx
            .send(Envelope {
                request,
                reply: None,
            })
            .await
            .map_err(|_| ContextError::Closed)
    }

    /// Send a request and wait for its reply.
    pub async fn request(&self, request: ClientRequest) -> Result<WorkerMessage, ContextError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Envelope {
                request,
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| ContextError::Closed)?;
        reply_rx.await.map_err(|_| ContextError::NoReply)
    }
}

/// An application instance connected to the background context.
pub struct AppClient {
    id: ClientId,
    handle: ContextHandle,
    notifier: Arc<ClientNotifier>,
    events: mpsc::UnboundedReceiver<WorkerMessage>,
}

impl AppClient {
    /// Register an instance showing `url`.
    pub fn connect(ctx: &BackgroundContext, handle: ContextHandle, url: &str) -> Self {
        let notifier = Arc::clone(ctx.notifier());
        let (id, events) = notifier.connect(url);
        AppClient {
            id,
            handle,
            notifier,
            events,
        }
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    /// Number of queued requests, asked of the background context.
    pub async fn pending_sync_count(&self) -> Result<usize, ContextError> {
        match self.handle.request(ClientRequest::GetPendingSyncCount).await? {
            WorkerMessage::PendingSyncCount { count } => Ok(count),
            _ => Err(ContextError::NoReply),
        }
    }

    pub async fn trigger_sync(&self) -> Result<(), ContextError> {
        self.handle.post(ClientRequest::TriggerSync).await
    }

    pub async fn check_network(&self) -> Result<(), ContextError> {
        self.handle.post(ClientRequest::CheckNetwork).await
    }

    pub async fn clear_cache(&self) -> Result<WorkerMessage, ContextError> {
        self.handle.request(ClientRequest::ClearCache).await
    }

    pub async fn update_assets(&self, assets: Vec<String>) -> Result<WorkerMessage, ContextError> {
        self.handle
            .request(ClientRequest::UpdateAssets { assets })
            .await
    }

    /// Wait for the next broadcast.
    pub async fn next_event(&mut self) -> Option<WorkerMessage> {
        self.events.recv().await
    }

    pub fn try_next_event(&mut self) -> Option<WorkerMessage> {
        self.events.try_recv().ok()
    }
}

impl Drop for AppClient {
    fn drop(&mut self) {
        self.notifier.disconnect(self.id);
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
