//! Escalation path for responses blocked by an anti-bot challenge (HTTP 403).
//!
//! The challenge transport presents the full header set of a top-level browser
//! navigation and carries a cookie jar primed from the site's origin, which is
//! what the clearance checks in front of these sites look at.

use super::constants::{ACCEPT_LANGUAGE, ACCEPT_NAVIGATE};
use super::{ScrapeClient, Transport};
use crate::core::ScrapeError;
use crate::core::net::RawPage;
use reqwest::RequestBuilder;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE as ACCEPT_LANGUAGE_HEADER, UPGRADE_INSECURE_REQUESTS};
use tracing::debug;
use url::Url;

impl ScrapeClient {
    /// Re-issue a blocked request through the challenge transport. Never escalates again.
    pub(crate) async fn fetch_with_challenge(
        &self,
        url: &Url,
        referer: Option<&Url>,
    ) -> Result<RawPage, ScrapeError> {
        self.prime_cookies(url).await;
        self.send_with_retry(Transport::Challenge, url, referer).await
    }

    async fn prime_cookies(&self, url: &Url) {
        let Ok(origin) = url.join("/") else {
            return;
        };
        if origin == *url {
            return;
        }
        match self.request(Transport::Challenge, &origin, None).send().await {
            Ok(resp) => debug!(%origin, status = resp.status().as_u16(), "primed challenge cookie jar"),
            Err(e) => debug!(%origin, error = %e, "cookie priming failed; continuing"),
        }
    }
}

pub(super) fn navigation_headers(req: RequestBuilder, has_referer: bool) -> RequestBuilder {
    req.header(ACCEPT, ACCEPT_NAVIGATE)
        .header(ACCEPT_LANGUAGE_HEADER, ACCEPT_LANGUAGE)
        .header(UPGRADE_INSECURE_REQUESTS, "1")
        .header("sec-fetch-dest", "document")
        .header("sec-fetch-mode", "navigate")
        .header("sec-fetch-site", if has_referer { "cross-site" } else { "none" })
        .header("sec-fetch-user", "?1")
}
