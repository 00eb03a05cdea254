mod common;

use httpmock::Method::GET;
use std::time::Duration;
use tvscrape_rs::{FetchCause, RetryConfig, ScrapeClient, ScrapeError};
use url::Url;

const PLAIN_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

#[tokio::test]
async fn fetch_returns_body_and_sends_identity() {
    let server = common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/canales/")
            .header("user-agent", "tvscrape-test/1.0")
            .header("referer", "https://example.com/home");
        then.status(200).body("<html>ok</html>");
    });

    let client = ScrapeClient::builder()
        .user_agent("tvscrape-test/1.0")
        .build()
        .unwrap();
    let referer = Url::parse("https://example.com/home").unwrap();
    let page = client
        .fetch(&common::url(&server, "/canales/"), Some(&referer))
        .await
        .unwrap();

    mock.assert();
    assert_eq!(page.text, "<html>ok</html>");
    assert_eq!(page.url.path(), "/canales/");
}

#[tokio::test]
async fn fetch_keeps_final_url_after_redirect() {
    let server = common::setup_server();
    server.mock(|when, then| {
        when.method(GET).path("/old");
        then.status(302).header("location", "/new/page.html");
    });
    server.mock(|when, then| {
        when.method(GET).path("/new/page.html");
        then.status(200).body("moved");
    });

    let page = common::fast_client()
        .fetch(&common::url(&server, "/old"), None)
        .await
        .unwrap();
    assert_eq!(page.url.path(), "/new/page.html");
    assert_eq!(page.text, "moved");
}

#[tokio::test]
async fn transient_status_is_retried_until_exhausted() {
    let server = common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/busy");
        then.status(503);
    });

    let err = common::fast_client()
        .fetch(&common::url(&server, "/busy"), None)
        .await
        .unwrap_err();

    // one attempt plus two retries
    mock.assert_hits(3);
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn any_server_error_is_retried() {
    let server = common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/storage");
        then.status(507);
    });

    let err = common::fast_client()
        .fetch(&common::url(&server, "/storage"), None)
        .await
        .unwrap_err();

    mock.assert_hits(3);
    assert_eq!(err.status(), Some(507));
    assert!(FetchCause::Status(507).is_retryable());
}

#[tokio::test]
async fn not_found_is_not_retried() {
    let server = common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/missing");
        then.status(404);
    });

    let err = common::fast_client()
        .fetch(&common::url(&server, "/missing"), None)
        .await
        .unwrap_err();

    mock.assert_hits(1);
    match err {
        ScrapeError::Fetch { cause, .. } => {
            assert_eq!(cause, FetchCause::Status(404));
            assert!(!cause.is_retryable());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn disabled_retry_makes_a_single_attempt() {
    let server = common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/busy");
        then.status(429);
    });

    let client = ScrapeClient::builder()
        .retry(RetryConfig::disabled())
        .build()
        .unwrap();
    let err = client
        .fetch(&common::url(&server, "/busy"), None)
        .await
        .unwrap_err();

    mock.assert_hits(1);
    assert_eq!(err.status(), Some(429));
}

#[tokio::test]
async fn blocked_request_escalates_to_challenge_transport() {
    let server = common::setup_server();
    let plain = server.mock(|when, then| {
        when.method(GET).path("/live").header("accept", PLAIN_ACCEPT);
        then.status(403).body("Just a moment...");
    });
    let origin = server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200).header("set-cookie", "cf_clearance=ok; Path=/");
    });
    let challenged = server.mock(|when, then| {
        when.method(GET)
            .path("/live")
            .header("sec-fetch-mode", "navigate")
            .header("upgrade-insecure-requests", "1");
        then.status(200).body("real content");
    });

    let page = common::fast_client()
        .fetch(&common::url(&server, "/live"), None)
        .await
        .unwrap();

    plain.assert_hits(1);
    origin.assert_hits(1);
    challenged.assert_hits(1);
    assert_eq!(page.text, "real content");
}

#[tokio::test]
async fn escalation_happens_at_most_once() {
    let server = common::setup_server();
    let blocked = server.mock(|when, then| {
        when.method(GET).path("/live");
        then.status(403);
    });
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200);
    });

    let err = common::fast_client()
        .fetch(&common::url(&server, "/live"), None)
        .await
        .unwrap_err();

    // plain attempt + challenge attempt, no further escalation
    blocked.assert_hits(2);
    assert_eq!(err.status(), Some(403));
}

#[tokio::test]
async fn escalation_can_be_disabled() {
    let server = common::setup_server();
    let blocked = server.mock(|when, then| {
        when.method(GET).path("/live");
        then.status(403);
    });

    let client = ScrapeClient::builder()
        .challenge_escalation(false)
        .build()
        .unwrap();
    let err = client
        .fetch(&common::url(&server, "/live"), None)
        .await
        .unwrap_err();

    blocked.assert_hits(1);
    assert_eq!(err.status(), Some(403));
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/slow");
        then.status(200).delay(Duration::from_millis(500)).body("late");
    });

    let client = ScrapeClient::builder()
        .timeout(Duration::from_millis(50))
        .retry(common::fast_retry(1))
        .build()
        .unwrap();
    let err = client
        .fetch(&common::url(&server, "/slow"), None)
        .await
        .unwrap_err();

    // the timeout is retried once before giving up
    mock.assert_hits(2);
    match err {
        ScrapeError::Fetch { cause, .. } => assert_eq!(cause, FetchCause::Timeout),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn exponential_backoff_is_capped() {
    let cfg = RetryConfig::default();
    let near = |d: Duration, ms: u64| d.as_millis().abs_diff(u128::from(ms)) <= 1;
    assert!(near(cfg.backoff.delay(0), 300));
    assert!(near(cfg.backoff.delay(1), 600));
    assert_eq!(cfg.backoff.delay(10), Duration::from_secs(5));
}
