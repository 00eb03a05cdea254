//! Public client surface + builder.
//! Internals are split into `challenge` (403 escalation), `constants` (UA + defaults)
//! and `retry` (backoff policy).

mod challenge;
mod constants;
mod retry;

pub use retry::{Backoff, RetryConfig};

use crate::core::net::{self, RawPage};
use crate::core::{FetchCause, ScrapeError};
use constants::{ACCEPT_PLAIN, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS, USER_AGENT};
use reqwest::header::{ACCEPT, REFERER};
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Which HTTP identity a request is sent with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Transport {
    /// Plain browser user-agent request.
    Plain,
    /// Full navigation header set plus a primed cookie jar.
    Challenge,
}

/// HTTP fetcher with a browser identity, bounded retries and a one-shot
/// challenge escalation for 403 responses.
#[derive(Debug, Clone)]
pub struct ScrapeClient {
    http: Client,
    challenge: Client,
    retry: RetryConfig,
    escalate_on_403: bool,
}

impl ScrapeClient {
    /// Create a new builder.
    pub fn builder() -> ScrapeClientBuilder {
        ScrapeClientBuilder::default()
    }

    /// The retry policy applied to every fetch.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// GET `url`, optionally presenting the page that linked to it as `Referer`.
    ///
    /// Transient failures (timeouts, connection errors, 429 and 5xx) are retried
    /// with backoff. A 403 from the plain transport is re-issued once through the
    /// challenge transport. Any other failure is returned as [`ScrapeError::Fetch`].
    #[tracing::instrument(skip(self, url, referer), err, fields(url = %url))]
    pub async fn fetch(&self, url: &Url, referer: Option<&Url>) -> Result<RawPage, ScrapeError> {
        match self.send_with_retry(Transport::Plain, url, referer).await {
            Err(e) if self.escalate_on_403 && e.status() == Some(403) => {
                warn!(%url, "blocked with HTTP 403; escalating to challenge transport");
                self.fetch_with_challenge(url, referer).await
            }
            other => other,
        }
    }

    pub(crate) async fn send_with_retry(
        &self,
        transport: Transport,
        url: &Url,
        referer: Option<&Url>,
    ) -> Result<RawPage, ScrapeError> {
        let mut attempt = 0u32;
        loop {
            let cause = match self.request(transport, url, referer).send().await {
                Ok(resp) if resp.status().is_success() => match net::get_text(resp).await {
                    Ok(page) => {
                        debug!(?transport, bytes = page.text.len(), final_url = %page.url, "fetched");
                        return Ok(page);
                    }
                    Err(e) => FetchCause::from_reqwest(&e),
                },
                Ok(resp) => FetchCause::Status(resp.status().as_u16()),
                Err(e) => FetchCause::from_reqwest(&e),
            };

            if !self.retry.should_retry(&cause, attempt) {
                return Err(ScrapeError::Fetch {
                    url: url.to_string(),
                    cause,
                });
            }

            let delay = self.retry.backoff.delay(attempt);
            attempt += 1;
            warn!(%url, attempt, %cause, ?delay, "transient fetch failure; retrying");
            tokio::time::sleep(delay).await;
        }
    }

    fn request(&self, transport: Transport, url: &Url, referer: Option<&Url>) -> RequestBuilder {
        let mut req = match transport {
            Transport::Plain => self.http.get(url.clone()).header(ACCEPT, ACCEPT_PLAIN),
            Transport::Challenge => {
                challenge::navigation_headers(self.challenge.get(url.clone()), referer.is_some())
            }
        };
        if let Some(referer) = referer {
            req = req.header(REFERER, referer.as_str());
        }
        req
    }
}

/* ----------------------- Builder ----------------------- */

#[derive(Default)]
pub struct ScrapeClientBuilder {
    user_agent: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    retry: Option<RetryConfig>,
    disable_challenge: bool,
}

impl ScrapeClientBuilder {
    /// Override the User-Agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set the overall request timeout. Default: 20 seconds.
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout. Default: 10 seconds.
    pub fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    /// Replace the default retry policy.
    pub fn retry(mut self, cfg: RetryConfig) -> Self {
        self.retry = Some(cfg);
        self
    }

    /// Enable or disable the 403 challenge escalation. Default: enabled.
    pub fn challenge_escalation(mut self, enabled: bool) -> Self {
        self.disable_challenge = !enabled;
        self
    }

    pub fn build(self) -> Result<ScrapeClient, ScrapeError> {
        let ua = self.user_agent.as_deref().unwrap_or(USER_AGENT);
        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let connect_timeout = self
            .connect_timeout
            .unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));

        let http = reqwest::Client::builder()
            .user_agent(ua)
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        let challenge = reqwest::Client::builder()
            .user_agent(ua)
            .cookie_store(true)
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(ScrapeClient {
            http,
            challenge,
            retry: self.retry.unwrap_or_default(),
            escalate_on_403: !self.disable_challenge,
        })
    }
}
