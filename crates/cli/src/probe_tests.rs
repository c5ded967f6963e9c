// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::net::{Method, Response};
use crate::test_helpers::{MockNetwork, API};
use yare::parameterized;

fn health() -> String {
    format!("{}/health", API)
}

fn prober(network: &Arc<MockNetwork>) -> ConnectivityProber {
    ConnectivityProber::new(network.clone(), health(), Duration::from_secs(5))
}

#[test]
fn unprobed_state_is_unreachable() {
    let prober = prober(&MockNetwork::new());
    assert!(!prober.is_reachable());
    assert_eq!(prober.state().last_checked_at, None);
}

#[tokio::test]
async fn probe_sends_uncached_head() {
    let network = MockNetwork::new();
    network.route(Method::Head, &health(), Response::new(200, ""));
    let prober = prober(&network);

    assert!(prober.probe().await);
    assert!(prober.is_reachable());
    assert!(prober.state().last_checked_at.is_some());

    let sent = &network.requests()[0];
    assert_eq!(sent.method, Method::Head);
    assert_eq!(sent.header("cache-control"), Some("no-store"));
}

#[parameterized(
    server_error = { 500 },
    unavailable = { 503 },
    missing = { 404 },
)]
fn non_success_is_unreachable(status: u16) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let network = MockNetwork::new();
    network.route(Method::Head, &health(), Response::new(status, ""));
    assert!(!rt.block_on(prober(&network).probe()));
}

#[tokio::test]
async fn connection_error_is_unreachable() {
    let network = MockNetwork::new();
    network.set_offline(true);
    let prober = prober(&network);
    assert!(!prober.probe().await);
    assert!(prober.state().last_checked_at.is_some());
}

#[tokio::test(start_paused = true)]
async fn hung_probe_times_out() {
    let network = MockNetwork::new();
    network.hang(&health());
    let prober = prober(&network);

    let started = tokio::time::Instant::now();
    assert!(!prober.probe().await);
    assert!(started.elapsed() >= Duration::from_secs(5));
}

#[tokio::test]
async fn mark_offline_overrides_last_probe() {
    let network = MockNetwork::new();
    network.route(Method::Head, &health(), Response::new(200, ""));
    let prober = prober(&network);
    assert!(prober.probe().await);

    prober.mark_offline();
    assert!(!prober.is_reachable());
    assert_eq!(network.requests().len(), 1);
}
