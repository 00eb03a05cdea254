use crate::core::ScrapeError;

/// Given `s` and the byte index of an opening `{` or `[`, return the byte index
/// of the delimiter that closes it.
///
/// Delimiters inside `"`, `'` or backtick strings (backslash escapes honored)
/// and inside `//` / `/* */` comments are not counted. A closer that does not
/// match the innermost opener is an error.
pub fn find_literal_end(s: &str, start: usize) -> Result<usize, ScrapeError> {
    let bytes = s.as_bytes();
    match bytes.get(start) {
        Some(b'{' | b'[') => {}
        _ => return Err(ScrapeError::extract("literal does not start with `{` or `[`", &s[start.min(s.len())..])),
    }

    let mut stack: Vec<u8> = Vec::new();
    let mut quote: Option<u8> = None;
    let mut j = start;

    while j < bytes.len() {
        let c = bytes[j];

        if let Some(q) = quote {
            if c == b'\\' {
                j += 2;
                continue;
            } else if c == q {
                quote = None;
            }
            j += 1;
            continue;
        }

        match c {
            b'"' | b'\'' | b'`' => quote = Some(c),
            b'/' if bytes.get(j + 1) == Some(&b'/') && (j == 0 || bytes[j - 1] != b':') => {
                j = s[j..].find('\n').map_or(bytes.len(), |n| j + n);
                continue;
            }
            b'/' if bytes.get(j + 1) == Some(&b'*') => {
                match s[j + 2..].find("*/") {
                    Some(n) => j = j + 2 + n + 2,
                    None => {
                        return Err(ScrapeError::extract("unterminated block comment", &s[start..]));
                    }
                }
                continue;
            }
            b'{' | b'[' => stack.push(c),
            b'}' | b']' => {
                let opener = if c == b'}' { b'{' } else { b'[' };
                match stack.pop() {
                    Some(o) if o == opener => {
                        if stack.is_empty() {
                            return Ok(j);
                        }
                    }
                    _ => {
                        return Err(ScrapeError::extract(
                            format!("mismatched `{}` at byte {j}", c as char),
                            &s[start..=j],
                        ));
                    }
                }
            }
            _ => {}
        }
        j += 1;
    }

    Err(ScrapeError::extract(
        "delimiters never balance before end of input",
        &s[start..],
    ))
}
