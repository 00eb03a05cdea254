//! Text-level rewrites that turn a hand-authored JS literal into strict JSON.

/// Apply every rewrite, in order: line comments, block comments, control
/// characters, JS-only quoting, trailing commas.
pub fn sanitize(literal: &str) -> String {
    let s = strip_line_comments(literal);
    let s = strip_block_comments(&s);
    let s = drop_control_chars(&s);
    let s = quote_js_syntax(&s);
    strip_trailing_commas(&s)
}

/// Tracks whether the current position of a char stream sits inside a JS string.
#[derive(Default)]
struct QuoteState {
    quote: Option<char>,
    escaped: bool,
}

impl QuoteState {
    fn in_string(&self) -> bool {
        self.quote.is_some()
    }

    fn step(&mut self, c: char) {
        match self.quote {
            Some(_) if self.escaped => self.escaped = false,
            Some(_) if c == '\\' => self.escaped = true,
            Some(q) if c == q => self.quote = None,
            Some(_) => {}
            None if matches!(c, '"' | '\'' | '`') => self.quote = Some(c),
            None => {}
        }
    }
}

/// Drops `//` comments. Block comments are copied through untouched (a `//`
/// or a quote inside one means nothing) and removed by the next pass.
fn strip_line_comments(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut qs = QuoteState::default();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if !qs.in_string() && c == '/' {
            match chars.get(i + 1) {
                Some('*') => {
                    let end = block_comment_end(&chars, i);
                    out.extend(&chars[i..end]);
                    i = end;
                    continue;
                }
                // `://` is a URL scheme separator, not a comment
                Some('/') if i == 0 || chars[i - 1] != ':' => {
                    while i < chars.len() && chars[i] != '\n' {
                        i += 1;
                    }
                    continue;
                }
                _ => {}
            }
        }
        qs.step(c);
        out.push(c);
        i += 1;
    }
    out
}

fn strip_block_comments(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut qs = QuoteState::default();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if !qs.in_string() && c == '/' && chars.get(i + 1) == Some(&'*') {
            i = block_comment_end(&chars, i);
            continue;
        }
        qs.step(c);
        out.push(c);
        i += 1;
    }
    out
}

/// Index just past the `*/` closing the comment opened at `start`, or the end of input.
fn block_comment_end(chars: &[char], start: usize) -> usize {
    let mut i = start + 2;
    while i + 1 < chars.len() {
        if chars[i] == '*' && chars[i + 1] == '/' {
            return i + 2;
        }
        i += 1;
    }
    chars.len()
}

/// Whitespace controls survive between tokens; inside strings every control goes.
fn drop_control_chars(s: &str) -> String {
    let mut qs = QuoteState::default();
    s.chars()
        .filter(|&c| {
            let inside = qs.in_string();
            qs.step(c);
            let control = c.is_control() || c == '\u{feff}';
            !control || (!inside && matches!(c, '\n' | '\r' | '\t'))
        })
        .collect()
}

/// Rewrite `'single'` and `` `backtick` `` strings as JSON strings, quote bare
/// object keys, and map `undefined` to `null`.
fn quote_js_syntax(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 16);
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if matches!(c, '"' | '\'' | '`') {
            i = copy_string(&chars, i, &mut out);
        } else if c.is_ascii_digit() {
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '.') {
                out.push(chars[i]);
                i += 1;
            }
        } else if is_ident_char(c) {
            let start = i;
            while i < chars.len() && is_ident_char(chars[i]) {
                i += 1;
            }
            let ident: String = chars[start..i].iter().collect();
            let next = chars[i..].iter().find(|c| !c.is_whitespace());
            let after_open = matches!(last_significant(&out), Some('{' | ','));
            if next == Some(&':') && after_open {
                out.push('"');
                out.push_str(&ident);
                out.push('"');
            } else if ident == "undefined" {
                out.push_str("null");
            } else {
                out.push_str(&ident);
            }
        } else {
            out.push(c);
            i += 1;
        }
    }
    out
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn last_significant(out: &str) -> Option<char> {
    out.chars().rev().find(|c| !c.is_whitespace())
}

/// Copy the string starting at `chars[start]` as a double-quoted JSON string.
/// Returns the index just past its closing quote.
fn copy_string(chars: &[char], start: usize, out: &mut String) -> usize {
    let quote = chars[start];
    out.push('"');
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            match chars.get(i + 1) {
                Some(&q @ ('\'' | '`')) => out.push(q),
                Some('x') => {
                    out.push_str("\\u00");
                    out.extend(chars.iter().skip(i + 2).take(2));
                    i += 2;
                }
                Some(&n) => {
                    out.push('\\');
                    out.push(n);
                }
                None => out.push('\\'),
            }
            i += 2;
            continue;
        }
        if c == quote {
            out.push('"');
            return i + 1;
        }
        if c == '"' {
            out.push_str("\\\"");
        } else {
            out.push(c);
        }
        i += 1;
    }
    i
}

fn strip_trailing_commas(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut qs = QuoteState::default();
    for (i, &c) in chars.iter().enumerate() {
        if !qs.in_string() && c == ',' {
            let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
            if matches!(next, Some('}' | ']')) {
                continue;
            }
        }
        qs.step(c);
        out.push(c);
    }
    out
}
