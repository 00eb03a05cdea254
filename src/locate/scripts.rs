/// Inline `<script>` blocks of `html` as `(opening tag, body)` pairs.
///
/// Blocks with a `src` attribute are external references, not inline code,
/// and are skipped.
pub(crate) fn iter_inline_scripts(html: &str) -> Vec<(&str, &str)> {
    let mut res = Vec::new();
    let mut pos = 0usize;
    let mut total_scripts = 0usize;

    while let Some(si) = html[pos..].find("<script") {
        let si = pos + si;
        total_scripts += 1;

        let open_end = match html[si..].find('>') {
            Some(x) => si + x,
            None => break,
        };
        let tag_open = &html[si..=open_end];

        let close = match html[open_end + 1..].find("</script>") {
            Some(x) => open_end + 1 + x,
            None => break,
        };
        let inner = &html[open_end + 1..close];

        if !has_src_attr(tag_open) {
            res.push((tag_open, inner));
        }
        pos = close + "</script>".len();
    }

    tracing::debug!(total_scripts, inline = res.len(), "scanned script blocks");
    res
}

fn has_src_attr(tag_open: &str) -> bool {
    let lower = tag_open.to_ascii_lowercase();
    lower
        .match_indices("src")
        .any(|(i, _)| {
            let before_ok = lower[..i].ends_with(|c: char| c.is_whitespace());
            let after = lower[i + 3..].trim_start();
            before_ok && after.starts_with('=')
        })
}
