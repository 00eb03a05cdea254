//! tvscrape-rs: pulls channel and live-event data that sites embed in HTML
//! attributes or inline/external JavaScript, and turns it into one canonical
//! JSON document.
//!
//! The pipeline is [`ScrapeClient::fetch`] → [`locate::locate`] →
//! [`extract::extract`] → [`normalize::normalize`], driven per site by a
//! [`SiteConfig`] and run with [`pipeline::run`].

pub mod core;
pub mod extract;
pub mod locate;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod site;

pub use crate::core::{Backoff, FetchCause, RawPage, RetryConfig, ScrapeClient, ScrapeClientBuilder, ScrapeError};
pub use extract::LiteralKind;
pub use locate::{DataLiteral, Located, LocateRules};
pub use normalize::{
    ChannelEntry, EventEntry, NormalizeConfig, OutputDocument, RecordFormat, RecordSkipped, Section,
};
pub use output::write_document;
pub use pipeline::run;
pub use site::SiteConfig;
