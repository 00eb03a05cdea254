use std::fmt;

use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The HTTP client could not be built or a response body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A provided or discovered URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A resource could not be retrieved, after retries and any challenge escalation.
    #[error("fetch failed for {url}: {cause}")]
    Fetch {
        /// The URL that was requested.
        url: String,
        /// Why the last attempt failed.
        cause: FetchCause,
    },

    /// Neither a resource reference nor an inline marker led to the data.
    #[error("data literal not found: {0}")]
    Locate(String),

    /// The located text could not be turned into strict JSON.
    #[error("extraction failed: {reason} (near `{snippet}`)")]
    Extract {
        /// What went wrong.
        reason: String,
        /// The offending text, truncated.
        snippet: String,
    },

    /// Strict JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the output document failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A site configuration is invalid or unknown.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A site configuration file could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// The cause carried by [`ScrapeError::Fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchCause {
    /// The request exceeded the configured timeout.
    Timeout,
    /// The server answered with a non-success status.
    Status(u16),
    /// The connection could not be established.
    Connect(String),
    /// Any other transport failure.
    Other(String),
}

impl FetchCause {
    pub(crate) fn from_reqwest(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchCause::Timeout
        } else if e.is_connect() {
            FetchCause::Connect(e.to_string())
        } else if let Some(status) = e.status() {
            FetchCause::Status(status.as_u16())
        } else {
            FetchCause::Other(e.to_string())
        }
    }

    /// Whether the failure is transient under the default retry policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchCause::Timeout | FetchCause::Connect(_) => true,
            FetchCause::Status(code) => *code == 408 || *code == 429 || (500..600).contains(code),
            FetchCause::Other(_) => false,
        }
    }
}

impl fmt::Display for FetchCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchCause::Timeout => f.write_str("request timed out"),
            FetchCause::Status(code) => write!(f, "HTTP status {code}"),
            FetchCause::Connect(msg) => write!(f, "connection error: {msg}"),
            FetchCause::Other(msg) => f.write_str(msg),
        }
    }
}

impl ScrapeError {
    /// The HTTP status of a failed fetch, if that is what this error is.
    pub fn status(&self) -> Option<u16> {
        match self {
            ScrapeError::Fetch {
                cause: FetchCause::Status(code),
                ..
            } => Some(*code),
            _ => None,
        }
    }

    pub(crate) fn extract(reason: impl Into<String>, snippet: &str) -> Self {
        ScrapeError::Extract {
            reason: reason.into(),
            snippet: crate::core::net::truncate(snippet, 160),
        }
    }
}
