use serde::{Deserialize, Serialize};
use std::fmt;

/// A TV channel with every stream URL discovered for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEntry {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "imagenUrl")]
    pub image_url: String,
    /// Absolute URLs, in discovery order.
    #[serde(rename = "urls")]
    pub stream_urls: Vec<String>,
}

/// A scheduled match and the streams that carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEntry {
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "equipoLocal")]
    pub home_team: String,
    #[serde(rename = "logoLocal")]
    pub home_logo_url: String,
    #[serde(rename = "equipoVisitante")]
    pub away_team: String,
    #[serde(rename = "logoVisitante")]
    pub away_logo_url: String,
    #[serde(rename = "urls")]
    pub stream_urls: Vec<String>,
}

/// A named bucket of channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "canales")]
    pub entries: Vec<ChannelEntry>,
}

/// The canonical document a run produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputDocument {
    Events(Vec<EventEntry>),
    Sections(Vec<Section>),
}

impl OutputDocument {
    /// Number of entries across the whole document.
    pub fn entry_count(&self) -> usize {
        match self {
            OutputDocument::Events(events) => events.len(),
            OutputDocument::Sections(sections) => sections.iter().map(|s| s.entries.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }
}

/// A raw record dropped during normalization. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSkipped {
    /// Raw key, or a short excerpt of the record when it has none.
    pub key: String,
    pub reason: String,
}

impl RecordSkipped {
    pub(crate) fn new(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn log(&self) {
        tracing::warn!(key = %self.key, reason = %self.reason, "skipping record");
    }
}

impl fmt::Display for RecordSkipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record `{}` skipped: {}", self.key, self.reason)
    }
}
