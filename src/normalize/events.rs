use super::names::image_url;
use super::urls::{accept_url, push_collapsing};
use super::{EventEntry, NormalizeConfig, RecordSkipped};
use crate::core::RawPage;
use crate::core::net::truncate;
use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};
use url::Url;

/* ---------------- events from a JS/JSON literal ---------------- */

const TIME_KEYS: &[&str] = &["hora", "time", "start_time"];
const HOME_KEYS: &[&str] = &["equipoLocal", "homeTeam", "local"];
const AWAY_KEYS: &[&str] = &["equipoVisitante", "awayTeam", "visitante"];
const HOME_LOGO_KEYS: &[&str] = &["logoLocal", "homeLogo"];
const AWAY_LOGO_KEYS: &[&str] = &["logoVisitante", "awayLogo"];
const TITLE_KEYS: &[&str] = &["title", "evento", "titulo"];
const LINK_LIST_KEYS: &[&str] = &["urls", "links", "canales"];
const LINK_KEYS: &[&str] = &["link", "url", "iframe"];

fn str_field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// `"River vs Boca"` → `("River", "Boca")`.
fn split_title(title: &str) -> Option<(String, String)> {
    let lower = title.to_ascii_lowercase();
    let (at, sep_len) = [" vs. ", " vs ", " v "]
        .iter()
        .find_map(|sep| lower.find(sep).map(|i| (i, sep.len())))?;
    let home = title[..at].trim();
    let away = title[at + sep_len..].trim();
    (!home.is_empty() && !away.is_empty()).then(|| (home.to_string(), away.to_string()))
}

fn event_links(obj: &Map<String, Value>, slot_prefix: &str, base: &Url) -> Vec<String> {
    let mut urls = Vec::new();
    let mut push = |s: &str| {
        if let Some(url) = accept_url(s, base) {
            push_collapsing(&mut urls, url);
        }
    };

    for key in LINK_LIST_KEYS {
        let Some(Value::Array(items)) = obj.get(*key) else {
            continue;
        };
        for item in items {
            match item {
                Value::String(s) => push(s),
                Value::Object(link) => {
                    if let Some(s) = str_field(link, LINK_KEYS) {
                        push(s);
                    }
                }
                _ => {}
            }
        }
    }
    if let Some(s) = str_field(obj, LINK_KEYS) {
        push(s);
    }
    let prefix = slot_prefix.to_lowercase();
    for (key, value) in obj {
        if key.to_lowercase().starts_with(&prefix)
            && let Some(s) = value.as_str()
        {
            push(s);
        }
    }
    urls
}

/// Events from an array literal such as `agendaEventos = [...]`.
pub fn events_from_literal(records: &Value, base: &Url, cfg: &NormalizeConfig) -> Vec<EventEntry> {
    let Some(items) = records.as_array() else {
        RecordSkipped::new("<root>", "event records are not an array").log();
        return Vec::new();
    };

    let mut events = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let label = format!("#{i}");
        let Some(obj) = item.as_object() else {
            RecordSkipped::new(label, "not an object").log();
            continue;
        };
        match event_from_object(obj, base, cfg) {
            Ok(event) => events.push(event),
            Err(reason) => RecordSkipped::new(label, reason).log(),
        }
    }
    events
}

fn event_from_object(
    obj: &Map<String, Value>,
    base: &Url,
    cfg: &NormalizeConfig,
) -> Result<EventEntry, &'static str> {
    let time = str_field(obj, TIME_KEYS).ok_or("missing time")?;

    let (home, away) = match (str_field(obj, HOME_KEYS), str_field(obj, AWAY_KEYS)) {
        (Some(h), Some(a)) => (h.to_string(), a.to_string()),
        _ => str_field(obj, TITLE_KEYS)
            .and_then(split_title)
            .ok_or("missing teams")?,
    };

    let logo = |keys: &[&str], team: &str| {
        str_field(obj, keys)
            .and_then(|s| accept_url(s, base))
            .unwrap_or_else(|| image_url(team, cfg))
    };

    let stream_urls = event_links(obj, &cfg.slot_prefix, base);
    if stream_urls.is_empty() {
        return Err("no stream URL");
    }

    Ok(EventEntry {
        time: time.to_string(),
        home_logo_url: logo(HOME_LOGO_KEYS, &home),
        away_logo_url: logo(AWAY_LOGO_KEYS, &away),
        home_team: home,
        away_team: away,
        stream_urls,
    })
}

/* ---------------- events from agenda markup ---------------- */

struct AgendaSelectors {
    block: Selector,
    time: Selector,
    team: Selector,
    logo: Selector,
    link: Selector,
}

impl AgendaSelectors {
    fn new() -> Option<Self> {
        Some(Self {
            block: Selector::parse("div.match-container").ok()?,
            time: Selector::parse("span.time").ok()?,
            team: Selector::parse("span.team-name").ok()?,
            logo: Selector::parse("img.team-logo").ok()?,
            link: Selector::parse("a[href]").ok()?,
        })
    }
}

fn has_class(el: &ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The `div.links-container` that follows `block`, before the next match block.
fn links_container<'a>(block: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    block
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .take_while(|el| !has_class(el, "match-container"))
        .find(|el| el.value().name() == "div" && has_class(el, "links-container"))
}

/// Events from an agenda page made of `div.match-container` blocks, each
/// followed by a `div.links-container` of anchors. Relative URLs resolve
/// against the page's own URL; a missing team logo falls back to a generated one.
pub fn events_from_markup(page: &RawPage, cfg: &NormalizeConfig) -> Vec<EventEntry> {
    let Some(sel) = AgendaSelectors::new() else {
        return Vec::new();
    };
    let doc = Html::parse_document(&page.text);
    let base = &page.url;

    let mut events = Vec::new();
    for (i, block) in doc.select(&sel.block).enumerate() {
        let time = block.select(&sel.time).next().map(text_of);
        let teams: Vec<String> = block.select(&sel.team).map(text_of).collect();
        let logos: Vec<String> = block
            .select(&sel.logo)
            .filter_map(|img| img.value().attr("src"))
            .filter_map(|src| accept_url(src, base))
            .collect();
        let mut links = Vec::new();
        if let Some(container) = links_container(&block) {
            for href in container
                .select(&sel.link)
                .filter_map(|a| a.value().attr("href"))
            {
                if let Some(url) = accept_url(href, base) {
                    push_collapsing(&mut links, url);
                }
            }
        }

        let (Some(time), [home, away, ..]) = (time, teams.as_slice()) else {
            RecordSkipped::new(format!("#{i}: {}", truncate(&block.html(), 50)), "incomplete match block")
                .log();
            continue;
        };
        if links.is_empty() {
            RecordSkipped::new(format!("#{i}: {home} vs {away}"), "no stream URL").log();
            continue;
        }
        let logo = |idx: usize, team: &str| {
            logos
                .get(idx)
                .cloned()
                .unwrap_or_else(|| image_url(team, cfg))
        };

        events.push(EventEntry {
            time,
            home_logo_url: logo(0, home),
            away_logo_url: logo(1, away),
            home_team: home.clone(),
            away_team: away.clone(),
            stream_urls: links,
        });
    }
    events
}
