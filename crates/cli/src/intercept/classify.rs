// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Request classification.

use url::Url;

use crate::net::{Destination, Method, Mode, Request};

const STATIC_EXTENSIONS: &[&str] = &[
    "js", "css", "png", "jpg", "jpeg", "gif", "svg", "ico", "woff", "woff2", "ttf", "eot",
];

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "ico"];

/// Which caching strategy a request gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// Scripts, styles, images, fonts: cache first.
    Static,
    /// Full-page loads: network first.
    Navigation,
    /// Remote API calls: network only, POSTs queued on failure.
    Api,
    /// Anything else: cache first.
    Default,
}

/// Decides which requests are intercepted and how.
#[derive(Debug, Clone)]
pub struct Classifier {
    api_base: String,
    static_prefixes: Vec<String>,
    analytics_domains: Vec<String>,
}

impl Classifier {
    pub fn new(
        api_base: impl Into<String>,
        static_prefixes: Vec<String>,
        analytics_domains: Vec<String>,
    ) -> Self {
        Classifier {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            static_prefixes,
            analytics_domains,
        }
    }

    /// True if the request must reach the network untouched.
    ///
    /// Covers methods other than GET/POST, non-http(s) schemes, unparsable
    /// URLs, and analytics hosts.
    pub fn is_excluded(&self, request: &Request) -> bool {
        if !matches!(request.method, Method::Get | Method::Post) {
            return true;
        }
        let Ok(url) = Url::parse(&request.url) else {
            return true;
        };
        if !matches!(url.scheme(), "http" | "https") {
            return true;
        }
        let host = url.host_str().unwrap_or_default();
        self.analytics_domains
            .iter()
            .any(|domain| host.contains(domain.as_str()))
    }

    pub fn classify(&self, request: &Request) -> RequestClass {
        let path = Url::parse(&request.url)
            .map(|u| u.path().to_string())
            .unwrap_or_default();

        if self.is_static(request, &path) {
            RequestClass::Static
        } else if request.mode == Mode::Navigate {
            RequestClass::Navigation
        } else if self.is_api(&request.url, &path) {
            RequestClass::Api
        } else {
            RequestClass::Default
        }
    }

    fn is_static(&self, request: &Request, path: &str) -> bool {
        matches!(
            request.destination,
            Destination::Script | Destination::Style | Destination::Image | Destination::Font
        ) || has_extension(path, STATIC_EXTENSIONS)
            || self.static_prefixes.iter().any(|p| path.contains(p.as_str()))
    }

    fn is_api(&self, url: &str, path: &str) -> bool {
        url == self.api_base
            || url.starts_with(&format!("{}/", self.api_base))
            || path.starts_with("/api/")
    }
}

/// Whether the request is for an image, by destination or file extension.
pub fn is_image(request: &Request) -> bool {
    if request.destination == Destination::Image {
        return true;
    }
    Url::parse(&request.url)
        .map(|u| has_extension(u.path(), IMAGE_EXTENSIONS))
        .unwrap_or(false)
}

fn has_extension(path: &str, extensions: &[&str]) -> bool {
    let file = path.rsplit('/').next().unwrap_or_default();
    match file.rsplit_once('.') {
        Some((_, ext)) => extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
