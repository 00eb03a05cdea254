//! Centralized constants for the HTTP identity and request defaults.

/// Default desktop UA to avoid trivial bot blocking.
pub(crate) const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) ",
    "AppleWebKit/537.36 (KHTML, like Gecko) ",
    "Chrome/122.0.0.0 Safari/537.36"
);

/// `Accept` sent by the plain transport.
pub(crate) const ACCEPT_PLAIN: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// `Accept` sent by the challenge transport, as a top-level browser navigation would.
pub(crate) const ACCEPT_NAVIGATE: &str = concat!(
    "text/html,application/xhtml+xml,application/xml;q=0.9,",
    "image/avif,image/webp,image/apng,*/*;q=0.8"
);

pub(crate) const ACCEPT_LANGUAGE: &str = "es-AR,es;q=0.9,en-US;q=0.8,en;q=0.7";

/// Default overall request timeout, in seconds.
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Default connect timeout, in seconds.
pub(crate) const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
