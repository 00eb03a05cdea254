//! Per-site strategy table.
//!
//! Each source site is described by data, not code: where the pipeline starts,
//! how the locator finds the literal, which record shape to expect, and the
//! normalizer's tables. Built-in presets are keyed by site id; custom sites load
//! from TOML.

use crate::core::ScrapeError;
use crate::locate::{LocateRules, Target};
use crate::normalize::{NormalizeConfig, RecordFormat};
use serde::Deserialize;
use std::path::Path;
use url::Url;

/// One source site.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub id: String,
    pub start_url: Url,
    pub format: RecordFormat,
    #[serde(default)]
    pub locate: LocateRules,
    #[serde(default)]
    pub normalize: NormalizeConfig,
}

/// Ids of the built-in presets.
pub const PRESET_IDS: &[&str] = &["canales", "agenda", "agenda-script"];

impl SiteConfig {
    /// Built-in preset for `id`.
    pub fn preset(id: &str) -> Result<SiteConfig, ScrapeError> {
        let (start, format, locate) = match id {
            "canales" => (
                "https://alangulotv.blog/canales/",
                RecordFormat::Channels,
                LocateRules {
                    reference: Some("canales".into()),
                    markers: vec![
                        r"window\.channelsList\s*=".into(),
                        r"(?:var|let|const)\s+channels\s*=".into(),
                        r"(?:var|let|const)\s+canales\s*=".into(),
                    ],
                    ..LocateRules::default()
                },
            ),
            "agenda" => (
                "https://alangulotv.blog/agenda-2/",
                RecordFormat::EventsMarkup,
                LocateRules {
                    reference: Some("agenda".into()),
                    cache_busters: vec!["cacheBuster".into()],
                    markers: vec![r#"class=["']match-container["']"#.into()],
                    ..LocateRules::default()
                },
            ),
            "agenda-script" => (
                "https://gh.alangulotv.blog/assets/script.js",
                RecordFormat::EventsLiteral,
                LocateRules {
                    markers: vec![r"agendaEventos\s*=".into()],
                    ..LocateRules::default()
                },
            ),
            other => {
                return Err(ScrapeError::Config(format!(
                    "unknown site `{other}` (known: {})",
                    PRESET_IDS.join(", ")
                )));
            }
        };

        Ok(SiteConfig {
            id: id.to_string(),
            start_url: Url::parse(start)?,
            format,
            locate,
            normalize: NormalizeConfig::default(),
        })
    }

    /// Parse a site description from TOML text.
    pub fn from_toml(text: &str) -> Result<SiteConfig, ScrapeError> {
        let site: SiteConfig = toml::from_str(text)?;
        if site.locate.markers.is_empty() && site.locate.reference.is_none() {
            return Err(ScrapeError::Config(format!(
                "site `{}` has neither a reference keyword nor markers",
                site.id
            )));
        }
        let base = &site.normalize.image_base;
        if !Url::parse(base).is_ok_and(|u| !u.cannot_be_a_base()) {
            return Err(ScrapeError::Config(format!(
                "site `{}`: image_base `{base}` is not an absolute URL",
                site.id
            )));
        }
        Ok(site)
    }

    /// Load a site description from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<SiteConfig, ScrapeError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Start from a different page.
    pub fn with_start_url(mut self, url: Url) -> Self {
        self.start_url = url;
        self
    }

    /// Replace the inline markers with a single pattern.
    pub fn with_marker(mut self, pattern: impl Into<String>) -> Self {
        self.locate.markers = vec![pattern.into()];
        self
    }

    /// Replace the reference keyword.
    pub fn with_reference(mut self, keyword: impl Into<String>) -> Self {
        self.locate.reference = Some(keyword.into());
        self
    }

    /// Locator rules with the target implied by the record format.
    pub fn locate_rules(&self) -> LocateRules {
        let mut rules = self.locate.clone();
        rules.target = match self.format {
            RecordFormat::EventsMarkup => Target::Markup,
            RecordFormat::Channels | RecordFormat::EventsLiteral => Target::Literal,
        };
        rules
    }
}
