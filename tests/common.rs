#![allow(dead_code)]

use httpmock::MockServer;
use std::{fs, path::Path, time::Duration};
use tvscrape_rs::{Backoff, RawPage, RetryConfig, ScrapeClient};
use url::Url;

pub fn setup_server() -> MockServer {
    MockServer::start()
}

pub fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path.display(), e))
}

/// Client with near-zero backoff so retry tests stay fast.
pub fn fast_client() -> ScrapeClient {
    ScrapeClient::builder()
        .timeout(Duration::from_secs(5))
        .retry(fast_retry(2))
        .build()
        .unwrap()
}

pub fn fast_retry(max_retries: u32) -> RetryConfig {
    RetryConfig {
        max_retries,
        backoff: Backoff::Fixed(Duration::from_millis(1)),
        ..RetryConfig::default()
    }
}

pub fn url(server: &MockServer, path: &str) -> Url {
    Url::parse(&server.url(path)).unwrap()
}

pub fn page(url: &str, text: &str) -> RawPage {
    RawPage::new(Url::parse(url).unwrap(), text)
}

pub fn html_with_script(script: &str) -> String {
    format!(
        r#"<!doctype html>
<html><head><title>demo</title></head>
<body>
<div id="app"></div>
<script>{script}</script>
</body></html>"#
    )
}
