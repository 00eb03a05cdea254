//! Conversion of loosely-structured records into the canonical document.
//!
//! Channel records are merged by display name and bucketed into sections;
//! event records become a flat, ordered list. Records that cannot be used are
//! logged as [`RecordSkipped`] and dropped without aborting the run.

mod channels;
mod config;
mod events;
mod model;
mod names;
mod urls;

pub use channels::{classify, gather_stream_urls, merge_channels};
pub use config::{NormalizeConfig, SectionRule};
pub use events::{events_from_literal, events_from_markup};
pub use model::{ChannelEntry, EventEntry, OutputDocument, RecordSkipped, Section};
pub use names::{format_display_name, image_url, strip_variant_suffix};
pub use urls::accept_url;

use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// Shape of the records a site publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordFormat {
    /// Object literal of channels keyed by raw key, with slot-prefixed URL fields.
    Channels,
    /// Array literal of scheduled events.
    EventsLiteral,
    /// Agenda markup with one block per event.
    EventsMarkup,
}

/// Normalize parsed literal records. `base` is the literal's source URL.
///
/// [`RecordFormat::EventsMarkup`] has no literal; use [`events_from_markup`].
pub fn normalize(
    records: &Value,
    base: &Url,
    format: RecordFormat,
    cfg: &NormalizeConfig,
) -> OutputDocument {
    match format {
        RecordFormat::Channels => {
            let entries = merge_channels(records, base, cfg);
            let sections = classify(entries, cfg);
            for section in &sections {
                tracing::info!(section = %section.title, channels = section.entries.len(), "classified");
            }
            OutputDocument::Sections(sections)
        }
        RecordFormat::EventsLiteral | RecordFormat::EventsMarkup => {
            OutputDocument::Events(events_from_literal(records, base, cfg))
        }
    }
}
