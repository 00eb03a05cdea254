//! Isolation of JS data literals and their conversion to strict JSON.
//!
//! A literal is located by a marker offset, cut out with a string-aware
//! delimiter-depth scan, and then sanitized (comments, control characters,
//! JS-only quoting, trailing commas) until `serde_json` accepts it.

mod sanitize;
mod scan;

pub use sanitize::sanitize;
pub use scan::find_literal_end;

use crate::core::ScrapeError;
use serde_json::Value;

/// Syntactic form of a data literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// `{ ... }`
    Object,
    /// `[ ... ]`
    Array,
    /// `JSON.parse("...")` with an escaped JSON payload.
    JsonString,
}

impl LiteralKind {
    /// Classify the literal that immediately follows a marker (leading `=`/`:` and
    /// whitespace are skipped). Anything else after the marker is not a literal.
    pub fn detect(after_marker: &str) -> Option<LiteralKind> {
        let rest = skip_assignment(after_marker);
        if rest.starts_with("JSON.parse") {
            return Some(LiteralKind::JsonString);
        }
        match rest.as_bytes().first()? {
            b'{' => Some(LiteralKind::Object),
            b'[' => Some(LiteralKind::Array),
            _ => None,
        }
    }
}

/// Extract the data literal that starts after byte offset `after` in `text`
/// and return it as canonical (compact, strict) JSON text.
pub fn extract(text: &str, after: usize) -> Result<String, ScrapeError> {
    let value = extract_value(text, after)?;
    Ok(serde_json::to_string(&value)?)
}

/// Like [`extract`], but hands back the parsed value.
pub fn extract_value(text: &str, after: usize) -> Result<Value, ScrapeError> {
    let rest = text
        .get(after..)
        .ok_or_else(|| ScrapeError::extract("marker offset is outside the text", text))?;

    let literal = match LiteralKind::detect(rest) {
        Some(LiteralKind::JsonString) => json_parse_payload(skip_assignment(rest))?,
        Some(_) => {
            let open = rest.len() - skip_assignment(rest).len();
            let end = find_literal_end(rest, open)?;
            rest[open..=end].to_string()
        }
        None => return Err(ScrapeError::extract("no opening delimiter after marker", rest)),
    };

    let cleaned = sanitize(&literal);
    serde_json::from_str::<Value>(&cleaned).map_err(|e| {
        ScrapeError::extract(format!("not strict JSON after sanitization: {e}"), &cleaned)
    })
}

fn skip_assignment(s: &str) -> &str {
    s.trim_start_matches(|c: char| c.is_whitespace() || c == '=' || c == ':')
}

/// Pull the quoted argument out of `JSON.parse("...")` and undo its JS escaping.
fn json_parse_payload(s: &str) -> Result<String, ScrapeError> {
    let args = s
        .strip_prefix("JSON.parse")
        .map(str::trim_start)
        .and_then(|a| a.strip_prefix('('))
        .map(str::trim_start)
        .ok_or_else(|| ScrapeError::extract("malformed JSON.parse call", s))?;

    let mut chars = args.char_indices();
    let quote = match chars.next() {
        Some((_, q @ ('"' | '\'' | '`'))) => q,
        _ => return Err(ScrapeError::extract("JSON.parse argument is not a string", args)),
    };

    let mut escaped = false;
    for (i, c) in chars {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return unescape_js(&args[1..i]);
        }
    }
    Err(ScrapeError::extract("unterminated JSON.parse string", args))
}

/// Undo one level of C-style string escaping.
fn unescape_js(s: &str) -> Result<String, ScrapeError> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('0') => out.push('\0'),
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                out.push(hex_char(&hex, s)?);
            }
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let unit = u16::from_str_radix(&hex, 16)
                    .map_err(|_| ScrapeError::extract("bad \\u escape", s))?;
                let mut units = vec![unit];
                if (0xD800..0xDC00).contains(&unit) && chars.peek() == Some(&'\\') {
                    let mut look = chars.clone();
                    look.next();
                    if look.next() == Some('u') {
                        let low: String = look.by_ref().take(4).collect();
                        if let Ok(low) = u16::from_str_radix(&low, 16) {
                            units.push(low);
                            chars = look;
                        }
                    }
                }
                out.extend(
                    char::decode_utf16(units).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)),
                );
            }
            // \" \' \\ \/ and line continuations all reduce to the escaped char
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    Ok(out)
}

fn hex_char(hex: &str, context: &str) -> Result<char, ScrapeError> {
    u32::from_str_radix(hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| ScrapeError::extract("bad \\x escape", context))
}
