//! Resolution of iframe URLs that pages assemble in inline script by string
//! concatenation, e.g. `'<iframe src="' + base + cacheBuster + '">'`.
//!
//! Nothing is executed. String literals are taken verbatim, variables declared
//! earlier in the same script are substituted, and cache-buster identifiers are
//! replaced with the current Unix time in milliseconds. Anything else, template
//! literals with `${}` included, makes the expression unresolvable.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static SRC_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bsrc\s*=\s*["']([^"']+)["']"#).expect("valid regex")
});

/// Identifiers that always evaluate to a fresh token.
const BUILTIN_BUSTERS: &[&str] = &["Date.now()", "new Date().getTime()"];

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Str(String),
    Num(String),
    Ident(String),
    Plus,
    Assign,
    Other(char),
}

/// Every iframe source the script builds, in source order.
pub(crate) fn iframe_sources(script: &str, cache_busters: &[String]) -> Vec<String> {
    let toks = tokenize(script);
    let fresh = chrono::Utc::now().timestamp_millis().to_string();
    let ctx = EvalCtx {
        vars: HashMap::new(),
        busters: cache_busters,
        fresh: &fresh,
    };
    collect_sources(&toks, ctx)
}

struct EvalCtx<'a> {
    vars: HashMap<String, String>,
    busters: &'a [String],
    fresh: &'a str,
}

impl EvalCtx<'_> {
    fn is_buster(&self, name: &str) -> bool {
        BUILTIN_BUSTERS.contains(&name) || self.busters.iter().any(|b| b == name)
    }

    fn eval(&self, terms: &[&Token]) -> Option<String> {
        let mut out = String::new();
        for term in terms {
            match term {
                Token::Str(text) => out.push_str(text),
                Token::Num(n) => out.push_str(n),
                Token::Ident(name) => match self.vars.get(name.as_str()) {
                    Some(v) => out.push_str(v),
                    None if self.is_buster(name) => out.push_str(self.fresh),
                    None => return None,
                },
                _ => return None,
            }
        }
        Some(out)
    }
}

fn is_term(t: &Token) -> bool {
    matches!(t, Token::Str(_) | Token::Num(_) | Token::Ident(_))
}

/// The `term (+ term)*` run starting at `p`, and the index just past it.
fn run_at(toks: &[Token], p: usize) -> (Vec<&Token>, usize) {
    let mut terms = Vec::new();
    let mut i = p;
    if !toks.get(i).is_some_and(is_term) {
        return (terms, p);
    }
    terms.push(&toks[i]);
    i += 1;
    while toks.get(i) == Some(&Token::Plus) && toks.get(i + 1).is_some_and(is_term) {
        terms.push(&toks[i + 1]);
        i += 2;
    }
    (terms, i)
}

fn mentions_iframe(terms: &[&Token]) -> bool {
    terms.iter().any(|t| match t {
        Token::Str(text) => text.to_ascii_lowercase().contains("<iframe"),
        _ => false,
    })
}

fn collect_sources(toks: &[Token], mut ctx: EvalCtx<'_>) -> Vec<String> {
    let mut found = Vec::new();
    let mut p = 0;
    while p < toks.len() {
        // var|let|const NAME = <run>
        if let [Token::Ident(kw), Token::Ident(name), Token::Assign, ..] = &toks[p..]
            && matches!(kw.as_str(), "var" | "let" | "const")
        {
            let (terms, next) = run_at(toks, p + 3);
            if !terms.is_empty() {
                let value = ctx.eval(&terms);
                if mentions_iframe(&terms) {
                    found.extend(value.as_deref().and_then(src_attr));
                }
                if let Some(v) = value {
                    ctx.vars.insert(name.clone(), v);
                }
                p = next;
                continue;
            }
        }

        // el.src = <run>
        if let [Token::Ident(target), Token::Assign, ..] = &toks[p..]
            && target.ends_with(".src")
        {
            let (terms, next) = run_at(toks, p + 2);
            if !terms.is_empty() {
                found.extend(ctx.eval(&terms));
                p = next;
                continue;
            }
        }

        if is_term(&toks[p]) {
            let (terms, next) = run_at(toks, p);
            if mentions_iframe(&terms) {
                found.extend(ctx.eval(&terms).as_deref().and_then(src_attr));
            }
            p = next;
            continue;
        }
        p += 1;
    }
    found
}

fn src_attr(markup: &str) -> Option<String> {
    SRC_ATTR
        .captures(markup)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn tokenize(src: &str) -> Vec<Token> {
    let chars: Vec<char> = src.chars().collect();
    let mut toks = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i += 2;
            }
            '"' | '\'' | '`' => {
                let (text, next) = read_string(&chars, i);
                if c == '`' && text.contains("${") {
                    toks.push(Token::Other('`'));
                } else {
                    toks.push(Token::Str(text));
                }
                i = next;
            }
            '+' if chars.get(i + 1) == Some(&'=') => {
                toks.push(Token::Assign);
                i += 2;
            }
            '+' if chars.get(i + 1) == Some(&'+') => {
                toks.push(Token::Other('+'));
                i += 2;
            }
            '+' => {
                toks.push(Token::Plus);
                i += 1;
            }
            '=' if matches!(chars.get(i + 1), Some('=' | '>')) => {
                toks.push(Token::Other('='));
                i += 2;
            }
            '=' => {
                toks.push(Token::Assign);
                i += 1;
            }
            c if c.is_ascii_digit() => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '.') {
                    i += 1;
                }
                toks.push(Token::Num(chars[start..i].iter().collect()));
            }
            c if is_ident_start(c) => {
                let (mut ident, next) = read_ident(&chars, i);
                i = next;
                if ident == "new" {
                    let mut j = i;
                    while j < chars.len() && chars[j].is_whitespace() {
                        j += 1;
                    }
                    if j < chars.len() && is_ident_start(chars[j]) {
                        let (ctor, next) = read_ident(&chars, j);
                        ident = format!("new {ctor}");
                        i = next;
                    }
                }
                toks.push(Token::Ident(ident));
            }
            other => {
                toks.push(Token::Other(other));
                i += 1;
            }
        }
    }
    toks
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

/// Identifier chain such as `a.b.c`, with empty call parens kept: `Date.now()`.
fn read_ident(chars: &[char], start: usize) -> (String, usize) {
    let mut out = String::new();
    let mut i = start;
    while i < chars.len() {
        let c = chars[i];
        if c.is_alphanumeric() || c == '_' || c == '$' || c == '.' {
            out.push(c);
            i += 1;
        } else if c == '(' && chars.get(i + 1) == Some(&')') {
            out.push_str("()");
            i += 2;
        } else {
            break;
        }
    }
    (out, i)
}

fn read_string(chars: &[char], start: usize) -> (String, usize) {
    let quote = chars[start];
    let mut out = String::new();
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            match chars.get(i + 1) {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(&n) => out.push(n),
                None => {}
            }
            i += 2;
            continue;
        }
        if c == quote {
            return (out, i + 1);
        }
        out.push(c);
        i += 1;
    }
    (out, i)
}
