use super::NormalizeConfig;
use url::Url;

/// Drop a trailing variant disambiguator: `espn-a` → `espn`, `tyc-sports-b1` → `tyc-sports`.
///
/// The last hyphen segment is a variant when it is one or two ASCII
/// alphanumerics and not purely numeric, so `espn-2` keeps its channel number.
pub fn strip_variant_suffix(key: &str) -> &str {
    match key.rsplit_once('-') {
        Some((head, tail))
            if !head.is_empty()
                && (1..=2).contains(&tail.len())
                && tail.bytes().all(|b| b.is_ascii_alphanumeric())
                && !tail.bytes().all(|b| b.is_ascii_digit()) =>
        {
            head
        }
        _ => key,
    }
}

/// Human-readable name for a raw channel key.
pub fn format_display_name(raw_key: &str, cfg: &NormalizeConfig) -> String {
    let key = raw_key.trim().to_lowercase();
    let base = strip_variant_suffix(&key);
    if let Some(known) = cfg.display_names.get(base) {
        return known.clone();
    }
    base.split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Image for a display name: the lookup table first, else a generated URL.
pub fn image_url(name: &str, cfg: &NormalizeConfig) -> String {
    if let Some(url) = cfg.images.get(name) {
        return url.clone();
    }
    let generated = format!(
        "{}{}.png",
        cfg.image_base,
        name.to_uppercase().replace(' ', "")
    );
    match Url::parse(&generated) {
        Ok(url) => url.into(),
        Err(e) => {
            tracing::warn!(url = %generated, error = %e, "generated image URL is not absolute");
            generated
        }
    }
}
