use super::names::{format_display_name, image_url};
use super::urls::{accept_url, push_collapsing};
use super::{ChannelEntry, NormalizeConfig, RecordSkipped, Section};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;
use url::Url;

/// Raw channel records in source order, as `(raw key, fields)`.
///
/// Accepts an object keyed by raw key, or an array of objects carrying their
/// key in `name`, `nombre` or `id`.
fn raw_records(records: &Value) -> Vec<(String, &Map<String, Value>)> {
    let mut out = Vec::new();
    match records {
        Value::Object(map) => {
            for (key, fields) in map {
                match fields.as_object() {
                    Some(obj) => out.push((key.clone(), obj)),
                    None => RecordSkipped::new(key.as_str(), "not an object").log(),
                }
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                let Some(obj) = item.as_object() else {
                    RecordSkipped::new(format!("#{i}"), "not an object").log();
                    continue;
                };
                let key = ["name", "nombre", "id"]
                    .iter()
                    .find_map(|k| obj.get(*k).and_then(Value::as_str));
                match key {
                    Some(key) => out.push((key.to_string(), obj)),
                    None => RecordSkipped::new(format!("#{i}"), "no name field").log(),
                }
            }
        }
        _ => RecordSkipped::new("<root>", "records are neither an object nor an array").log(),
    }
    out
}

/// Stream URLs held in the record's slot fields, in field order.
pub fn gather_stream_urls(
    fields: &Map<String, Value>,
    slot_prefix: &str,
    base: &Url,
) -> Vec<String> {
    let prefix = slot_prefix.to_lowercase();
    let mut urls = Vec::new();
    for (key, value) in fields {
        if !key.to_lowercase().starts_with(&prefix) {
            continue;
        }
        match value {
            Value::String(s) => urls.extend(accept_url(s, base)),
            Value::Array(items) => urls.extend(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter_map(|s| accept_url(s, base)),
            ),
            _ => {}
        }
    }
    urls
}

/// Group records by display name and concatenate their URLs in encounter order.
///
/// Groups that end up without any URL are dropped.
pub fn merge_channels(records: &Value, base: &Url, cfg: &NormalizeConfig) -> Vec<ChannelEntry> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (key, fields) in raw_records(records) {
        let name = format_display_name(&key, cfg);
        let urls = gather_stream_urls(fields, &cfg.slot_prefix, base);
        debug!(%key, %name, urls = urls.len(), "channel record");

        let slot = *index.entry(name.clone()).or_insert_with(|| {
            groups.push((name, Vec::new()));
            groups.len() - 1
        });
        for url in urls {
            push_collapsing(&mut groups[slot].1, url);
        }
    }

    groups
        .into_iter()
        .filter_map(|(name, stream_urls)| {
            if stream_urls.is_empty() {
                RecordSkipped::new(name, "no playable URL").log();
                return None;
            }
            Some(ChannelEntry {
                image_url: image_url(&name, cfg),
                name,
                stream_urls,
            })
        })
        .collect()
}

/// Bucket entries by the first matching section rule; unmatched go to the default.
/// Sections come out in rule order, default last, empty ones omitted.
pub fn classify(entries: Vec<ChannelEntry>, cfg: &NormalizeConfig) -> Vec<Section> {
    let mut buckets: Vec<Vec<ChannelEntry>> = vec![Vec::new(); cfg.sections.len() + 1];
    for entry in entries {
        let slot = cfg
            .sections
            .iter()
            .position(|rule| rule.matches(&entry.name))
            .unwrap_or(cfg.sections.len());
        buckets[slot].push(entry);
    }

    let titles = cfg
        .sections
        .iter()
        .map(|r| r.title.clone())
        .chain(std::iter::once(cfg.default_section.clone()));

    titles
        .zip(buckets)
        .filter(|(_, entries)| !entries.is_empty())
        .map(|(title, entries)| Section { title, entries })
        .collect()
}
