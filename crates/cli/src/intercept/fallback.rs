// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Synthetic responses served when neither network nor cache can answer.

use chrono::Utc;
use serde_json::json;

use crate::net::Response;

const PLACEHOLDER_SVG: &str = concat!(
    r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">"##,
    r##"<rect width="100" height="100" fill="#f5f5f5"/>"##,
    r##"<text x="50" y="50" text-anchor="middle" dy=".3em" font-family="Arial" font-size="10" fill="#ccc">Offline</text>"##,
    "</svg>"
);

const OFFLINE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Offline</title>
  <style>
    body { font-family: Arial, sans-serif; text-align: center; padding: 50px; background: #f5f5f5; color: #333; }
    h1 { color: #666; margin-bottom: 20px; }
  </style>
</head>
<body>
  <h1>You are offline</h1>
  <p>This page needs a connection. Your changes are kept and will be sent once you are back online.</p>
  <button onclick="window.location.reload()">Retry</button>
</body>
</html>
"#;

/// Inline placeholder for images that could not be loaded.
pub fn image_placeholder() -> Response {
    Response::new(200, PLACEHOLDER_SVG).with_header("Content-Type", "image/svg+xml")
}

/// Built-in offline page, used when none is cached.
pub fn offline_html() -> Response {
    Response::new(503, OFFLINE_HTML).with_header("Content-Type", "text/html; charset=utf-8")
}

/// JSON error for API reads made while offline.
pub fn offline_json() -> Response {
    Response::json(
        503,
        &json!({
            "error": "offline",
            "message": "Service unavailable while offline",
            "timestamp": Utc::now().to_rfc3339(),
        }),
    )
    .with_header("Cache-Control", "no-cache")
}

/// Plain-text 503 for everything else.
pub fn unavailable() -> Response {
    Response::new(503, "Resource not available offline")
        .with_header("Content-Type", "text/plain")
}
