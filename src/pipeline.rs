//! Fetch → locate → extract → normalize, once per run.

use crate::core::{ScrapeClient, ScrapeError};
use crate::locate::{Located, locate};
use crate::normalize::{OutputDocument, events_from_markup, normalize};
use crate::site::SiteConfig;
use tracing::info;

/// Run the whole pipeline for `site`.
///
/// Performs at most two sequential fetches. Any fetch, locate or extraction
/// failure ends the run; per-record problems only drop that record. A run that
/// finds no usable records returns an empty document.
#[tracing::instrument(skip(client, site), err, fields(site = %site.id))]
pub async fn run(client: &ScrapeClient, site: &SiteConfig) -> Result<OutputDocument, ScrapeError> {
    info!(url = %site.start_url, "fetching start page");
    let page = client.fetch(&site.start_url, None).await?;

    let located = locate(client, &page, &site.locate_rules()).await?;
    info!(source = %located.source(), "data located");

    let doc = match located {
        Located::Markup(agenda) => OutputDocument::Events(events_from_markup(&agenda, &site.normalize)),
        Located::Literal(literal) => {
            let records = literal.parse()?;
            info!(kind = ?literal.kind, "literal extracted");
            normalize(&records, &literal.source, site.format, &site.normalize)
        }
    };

    info!(entries = doc.entry_count(), "normalized");
    Ok(doc)
}
