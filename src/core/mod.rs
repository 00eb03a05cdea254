//! Core components of `tvscrape-rs`.
//!
//! This module contains the foundational building blocks of the library:
//! - The [`ScrapeClient`] fetcher and its builder.
//! - The primary [`ScrapeError`] type.
//! - The [`RawPage`] unit handed between pipeline stages.

/// The fetcher (`ScrapeClient`), builder, and retry configuration.
pub mod client;
/// The primary error type (`ScrapeError`) for the crate.
pub mod error;

pub(crate) mod net;

// convenient re-exports so most code can just `use crate::core::ScrapeClient`
pub use client::{Backoff, RetryConfig, ScrapeClient, ScrapeClientBuilder};
pub use error::{FetchCause, ScrapeError};
pub use net::RawPage;
