use url::Url;

/// A candidate stream/link value as an absolute URL.
///
/// Values starting with `http` (any case) are kept verbatim; any other
/// non-empty value is resolved against `base`.
pub fn accept_url(value: &str, base: &Url) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if value.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("http")) {
        return Some(value.to_string());
    }
    match base.join(value) {
        Ok(url) => Some(url.into()),
        Err(e) => {
            tracing::debug!(value, error = %e, "dropping unresolvable URL");
            None
        }
    }
}

/// Append `url` unless it is byte-identical to the last one.
pub(crate) fn push_collapsing(urls: &mut Vec<String>, url: String) {
    if urls.last() != Some(&url) {
        urls.push(url);
    }
}
