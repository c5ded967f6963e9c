// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tempfile::tempdir;
use yare::parameterized;

#[test]
fn defaults_are_valid() {
    let config = Config::default();
    config.validate().unwrap();
    assert_eq!(config.probe_timeout(), Duration::from_secs(5));
    assert_eq!(config.probe_interval(), Duration::from_secs(30));
    assert_eq!(config.max_replay_attempts, 3);
    assert_eq!(config.warmup.attempts, 3);
    assert_eq!(config.warmup.initial_delay_ms, 200);
}

#[test]
fn empty_file_uses_defaults() {
    assert_eq!(Config::from_toml("").unwrap(), Config::default());
}

#[test]
fn partial_file_overrides_keys() {
    let config = Config::from_toml(
        r#"
api_base_url = "https://api.example.com/api/"
cache_name = "offline-pwa-cache-v2"

[warmup]
initial_delay_ms = 10
"#,
    )
    .unwrap();
    assert_eq!(config.cache_name, "offline-pwa-cache-v2");
    assert_eq!(config.warmup.initial_delay_ms, 10);
    assert_eq!(config.warmup.attempts, 3);
    assert_eq!(config.api_base_url, "https://api.example.com/api/");
}

#[parameterized(
    bad_scheme = { "api_base_url = \"ftp://example.com\"" },
    not_a_url = { "origin = \"not a url\"" },
    zero_replays = { "max_replay_attempts = 0" },
    zero_warmup = { "[warmup]\nattempts = 0" },
    slash_in_cache_name = { "cache_name = \"a/b\"" },
    zero_probe_interval = { "probe_interval_secs = 0" },
    zero_probe_timeout = { "probe_timeout_secs = 0" },
    zero_sync_interval = { "sync_interval_secs = 0" },
    zero_request_timeout = { "request_timeout_secs = 0" },
)]
fn invalid_config_rejected(raw: &str) {
    assert!(matches!(
        Config::from_toml(raw),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn malformed_toml_is_parse_error() {
    assert!(matches!(
        Config::from_toml("api_base_url = "),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn resolve_prefers_explicit_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, "cache_name = \"explicit\"").unwrap();
    let config = Config::resolve(Some(&path), dir.path()).unwrap();
    assert_eq!(config.cache_name, "explicit");
}

#[test]
fn load_missing_file_is_read_error() {
    let dir = tempdir().unwrap();
    let result = Config::load(&dir.path().join("nope.toml"));
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
fn explicit_state_dir_wins() {
    let dir = tempdir().unwrap();
    assert_eq!(resolve_state_dir(Some(dir.path())), dir.path());
    assert_eq!(store_path(dir.path()), dir.path().join("store.json"));
    assert_eq!(cache_dir(dir.path()), dir.path().join("cache"));
}
