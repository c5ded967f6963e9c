// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn classifier() -> Classifier {
    Classifier::new(
        "http://api.test/api",
        vec!["/assets/".to_string(), "/static/".to_string()],
        vec!["google-analytics".to_string(), "googletagmanager".to_string()],
    )
}

#[parameterized(
    script = { "http://app.test/main.js", RequestClass::Static },
    stylesheet = { "http://app.test/css/site.CSS", RequestClass::Static },
    font = { "http://app.test/f/inter.woff2", RequestClass::Static },
    assets_prefix = { "http://app.test/assets/chunk-abc", RequestClass::Static },
    static_prefix = { "http://app.test/static/data", RequestClass::Static },
    api_base = { "http://api.test/api/messages", RequestClass::Api },
    same_origin_api = { "http://app.test/api/pdfs", RequestClass::Api },
    manifest = { "http://app.test/manifest.json", RequestClass::Default },
    page_fetch = { "http://app.test/about", RequestClass::Default },
)]
fn classify_get(url: &str, expected: RequestClass) {
    assert_eq!(classifier().classify(&Request::get(url)), expected);
}

#[test]
fn navigation_is_network_first() {
    let request = Request::navigate("http://app.test/messages");
    assert_eq!(classifier().classify(&request), RequestClass::Navigation);
}

#[test]
fn destination_marks_static() {
    let request = Request::get("http://app.test/avatar").with_destination(Destination::Image);
    assert_eq!(classifier().classify(&request), RequestClass::Static);
}

#[parameterized(
    put = { Request::new(Method::Put, "http://app.test/x"), true },
    head = { Request::head("http://app.test/x"), true },
    extension = { Request::get("chrome-extension://abc/page.html"), true },
    data = { Request::get("data:text/plain,hi"), true },
    analytics = { Request::get("https://www.google-analytics.com/collect"), true },
    tag_manager = { Request::get("https://www.googletagmanager.com/gtm.js"), true },
    garbage = { Request::get("not a url"), true },
    plain_get = { Request::get("http://app.test/"), false },
    api_post = { Request::new(Method::Post, "http://api.test/api/messages"), false },
)]
fn exclusion(request: Request, expected: bool) {
    assert_eq!(classifier().is_excluded(&request), expected);
}

#[parameterized(
    png = { "http://app.test/logo.png", true },
    icon = { "http://app.test/favicon.ico", true },
    script = { "http://app.test/app.js", false },
    no_extension = { "http://app.test/png", false },
)]
fn image_detection(url: &str, expected: bool) {
    assert_eq!(is_image(&Request::get(url)), expected);
}
