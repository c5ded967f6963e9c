// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Cache lifecycle and one-shot request commands.

use offsync_core::WorkerMessage;
use serde_json::json;

use crate::colors::Level;
use crate::error::{Error, Result};
use crate::net::Request;

use super::Session;

/// Install the essential assets, then garbage-collect old generations.
pub async fn warm(session: &Session) -> Result<()> {
    let ctx = session.ctx();
    let install = ctx.install().await;
    let activate = ctx.interceptor().activate().await?;

    let emitted = session.emit(&json!({
        "cache": ctx.interceptor().cache_name(),
        "cached": install.cached,
        "alreadyCached": install.already_cached,
        "failed": install.failed,
        "deleted": activate.deleted,
        "entries": activate.entries,
    }))?;
    if !emitted {
        println!("Cache: {}", ctx.interceptor().cache_name());
        println!("Newly cached: {}", install.cached.len());
        println!("Already cached: {}", install.already_cached.len());
        for url in &install.failed {
            println!("  failed: {}", url);
        }
        for name in &activate.deleted {
            println!("  removed generation: {}", name);
        }
    }

    if install.is_complete() {
        session.notice(
            Level::Success,
            &format!("{} entries cached", activate.entries),
        );
    } else {
        session.notice(
            Level::Warning,
            &format!("{} asset(s) could not be cached", install.failed.len()),
        );
    }
    Ok(())
}

/// Drop the current generation and warm it again.
pub async fn clear_cache(session: &Session) -> Result<()> {
    let reply = session.ctx().interceptor().clear_cache().await;
    session.emit(&reply)?;
    match reply {
        WorkerMessage::CacheCleared { success: true, .. } => {
            session.notice(Level::Success, "cache cleared and re-warmed")
        }
        WorkerMessage::CacheCleared { error, .. } => session.notice(
            Level::Error,
            &format!(
                "cache clear failed: {}",
                error.as_deref().unwrap_or("unknown error")
            ),
        ),
        other => tracing::warn!("unexpected reply to cache clear: {:?}", other),
    }
    Ok(())
}

/// Build the request for `offsync fetch`.
pub fn build_request(url: String, navigate: bool, post: Option<&str>) -> Result<Request> {
    if let Some(body) = post {
        let value: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| Error::InvalidInput(format!("--post body is not JSON: {}", e)))?;
        return Ok(Request::post_json(url, &value));
    }
    if navigate {
        Ok(Request::navigate(url))
    } else {
        Ok(Request::get(url))
    }
}

/// Run one request through the interceptor and print the response.
pub async fn fetch(
    session: &Session,
    url: &str,
    navigate: bool,
    post: Option<&str>,
) -> Result<()> {
    let ctx = session.ctx();
    let request = build_request(ctx.interceptor().resolve(url), navigate, post)?;
    let target = request.url.clone();

    let response = match ctx.handle_fetch(request.clone()).await {
        Some(response) => response,
        None => {
            tracing::debug!("{} bypasses the interceptor", target);
            session.network().fetch(request).await?
        }
    };

    let emitted = session.emit(&json!({
        "url": target,
        "status": response.status,
        "contentType": response.content_type(),
        "body": response.text(),
    }))?;
    if !emitted {
        println!("HTTP {}", response.status);
        if let Some(content_type) = response.content_type() {
            println!("Content-Type: {}", content_type);
        }
        println!();
        println!("{}", response.text());
    }

    let text = format!("{} {}", response.status, target);
    match response.status {
        202 => session.notice(Level::Warning, &format!("queued for replay: {}", text)),
        s if (200..300).contains(&s) => session.notice(Level::Success, &text),
        _ => session.notice(Level::Error, &text),
    }
    Ok(())
}
