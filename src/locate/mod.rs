//! Finding the text that carries a site's data.
//!
//! Two strategies run in order and the first hit wins:
//! 1. reference-following: a `script`/`iframe` `src` (or an iframe URL built by an
//!    inline template) that matches the site's reference keyword is fetched and
//!    searched;
//! 2. inline scan: the page's own inline scripts are searched for a marker.

mod scripts;
mod template;

pub(crate) use scripts::iter_inline_scripts;

use crate::core::{RawPage, ScrapeClient, ScrapeError};
use crate::extract::{self, LiteralKind};
use regex::Regex;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

/// What the located payload is expected to be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    /// A JS/JSON data literal.
    #[default]
    Literal,
    /// A markup document whose elements carry the records.
    Markup,
}

/// How to find the data on a site's start page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocateRules {
    /// Keyword matched (case-insensitively) against `script`/`iframe` `src` values.
    #[serde(default)]
    pub reference: Option<String>,
    /// Extra identifiers treated as cache-busters in iframe templates.
    #[serde(default)]
    pub cache_busters: Vec<String>,
    /// Regex patterns whose match end marks where the literal begins.
    #[serde(default)]
    pub markers: Vec<String>,
    #[serde(default)]
    pub target: Target,
}

impl LocateRules {
    fn compiled_markers(&self) -> Result<Vec<Regex>, ScrapeError> {
        self.markers
            .iter()
            .map(|m| {
                Regex::new(m).map_err(|e| ScrapeError::Config(format!("marker `{m}`: {e}")))
            })
            .collect()
    }
}

/// A substring of a fetched resource that encodes one collection of records.
#[derive(Debug, Clone, PartialEq)]
pub struct DataLiteral {
    /// URL the carrying resource came from; relative links resolve against it.
    pub source: Url,
    /// The block (script body or whole resource) that contains the literal.
    pub text: String,
    /// Byte offset just past the marker.
    pub start: usize,
    pub kind: LiteralKind,
}

impl DataLiteral {
    /// Strict JSON text of the literal.
    pub fn json(&self) -> Result<String, ScrapeError> {
        extract::extract(&self.text, self.start)
    }

    /// The literal parsed into a loosely-typed value.
    pub fn parse(&self) -> Result<Value, ScrapeError> {
        extract::extract_value(&self.text, self.start)
    }
}

/// Result of a successful locate.
#[derive(Debug, Clone, PartialEq)]
pub enum Located {
    Literal(DataLiteral),
    Markup(RawPage),
}

impl Located {
    pub fn source(&self) -> &Url {
        match self {
            Located::Literal(l) => &l.source,
            Located::Markup(p) => &p.url,
        }
    }
}

/// Run both strategies against `page`. Performs at most one extra fetch.
#[tracing::instrument(skip(client, page, rules), err, fields(page = %page.url))]
pub async fn locate(
    client: &ScrapeClient,
    page: &RawPage,
    rules: &LocateRules,
) -> Result<Located, ScrapeError> {
    let markers = rules.compiled_markers()?;

    if let Some(url) = find_reference(page, rules) {
        info!(%url, "following resource reference");
        let sub = client.fetch(&url, Some(&page.url)).await?;
        if let Some(found) = search(&sub, &markers, rules.target, true) {
            return Ok(found);
        }
        warn!(%url, "referenced resource does not carry the data; trying inline scan");
    }

    search(page, &markers, rules.target, false).ok_or_else(|| {
        ScrapeError::Locate(format!(
            "no matching reference and no inline marker ({}) in {}",
            rules.markers.join(", "),
            page.url
        ))
    })
}

fn search(page: &RawPage, markers: &[Regex], target: Target, followed: bool) -> Option<Located> {
    match target {
        Target::Literal => scan_inline(page, markers).map(Located::Literal),
        // a followed reference is the document itself, even when it lists nothing today
        Target::Markup => (followed || markers.iter().any(|m| m.is_match(&page.text)))
            .then(|| Located::Markup(page.clone())),
    }
}

/// First `script`/`iframe` source (literal or template-built) matching the
/// reference keyword, resolved against the page URL.
///
/// Markup targets only ever live in an iframe, so for them `script[src]` is
/// not a candidate.
pub fn find_reference(page: &RawPage, rules: &LocateRules) -> Option<Url> {
    let keyword = rules.reference.as_deref()?.to_ascii_lowercase();
    let matches = |src: &str| src.to_ascii_lowercase().contains(&keyword);

    let doc = Html::parse_document(&page.text);
    let tagged = match rules.target {
        Target::Literal => Selector::parse("script[src], iframe[src]").ok()?,
        Target::Markup => Selector::parse("iframe[src]").ok()?,
    };
    let from_tags = doc
        .select(&tagged)
        .filter_map(|el| el.value().attr("src"))
        .map(str::trim)
        .filter(|&src| matches(src))
        .find_map(|src| resolve(&page.url, src));
    if from_tags.is_some() {
        return from_tags;
    }

    iter_inline_scripts(&page.text)
        .into_iter()
        .flat_map(|(_, body)| template::iframe_sources(body, &rules.cache_busters))
        .filter(|src| matches(src.as_str()))
        .find_map(|src| resolve(&page.url, &src))
}

/// Search each inline script (or the whole resource, when it is a bare script)
/// for the first marker hit that is followed by a literal.
pub fn scan_inline(page: &RawPage, markers: &[Regex]) -> Option<DataLiteral> {
    let blocks: Vec<&str> = if page.has_script_tags() {
        iter_inline_scripts(&page.text)
            .into_iter()
            .map(|(_, body)| body)
            .collect()
    } else {
        vec![page.text.as_str()]
    };

    for body in blocks {
        for marker in markers {
            for hit in marker.find_iter(body) {
                let Some(kind) = LiteralKind::detect(&body[hit.end()..]) else {
                    continue;
                };
                debug!(marker = marker.as_str(), ?kind, offset = hit.end(), "inline marker hit");
                return Some(DataLiteral {
                    source: page.url.clone(),
                    text: body.to_string(),
                    start: hit.end(),
                    kind,
                });
            }
        }
    }
    None
}

fn resolve(base: &Url, reference: &str) -> Option<Url> {
    match base.join(reference) {
        Ok(url) => Some(url),
        Err(e) => {
            debug!(reference, error = %e, "unresolvable reference");
            None
        }
    }
}
