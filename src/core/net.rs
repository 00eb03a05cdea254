//! Fetched-content types and small text helpers shared by the pipeline stages.

use url::Url;

/// The text of a fetched resource and the URL it was served from.
///
/// `url` is the final URL after redirects; relative links found in `text`
/// resolve against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    pub url: Url,
    pub text: String,
}

impl RawPage {
    pub fn new(url: Url, text: impl Into<String>) -> Self {
        Self {
            url,
            text: text.into(),
        }
    }

    /// Whether the resource looks like markup rather than a bare script.
    pub fn has_script_tags(&self) -> bool {
        self.text.contains("<script")
    }
}

/// Read the response body as text, keeping the post-redirect URL.
pub(crate) async fn get_text(resp: reqwest::Response) -> Result<RawPage, reqwest::Error> {
    let url = resp.url().clone();
    let text = resp.text().await?;
    Ok(RawPage { url, text })
}

/// Cut `s` to at most `n` bytes on a char boundary, marking the cut.
pub(crate) fn truncate(s: &str, n: usize) -> String {
    if s.len() <= n {
        return s.to_string();
    }
    let mut end = n;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::with_capacity(end + 16);
    out.push_str(&s[..end]);
    out.push_str(" …[trunc]");
    out
}
