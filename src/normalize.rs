//! Text normalization for pasted game pages.
//!
//! Pasted text arrives with markup, HTML entities, tabs from table cells and
//! whatever line endings the browser produced. Every parser runs on the output
//! of [`normalize_text`], split with [`split_lines`].

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<>]*>").unwrap());

static NUMERIC_ENTITY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#(?:[xX]([0-9a-fA-F]{1,6})|([0-9]{1,7}));").unwrap());

static HORIZONTAL_SPACE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

static LINE_BREAK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("\r\n|\r|\u{0085}|\u{2028}|\u{2029}").unwrap());

static NAMED_ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&rsquo;", "'"),
    ("&lsquo;", "'"),
    ("&ndash;", "-"),
    ("&mdash;", "-"),
    ("&hellip;", "..."),
    // Must stay last so "&amp;lt;" decodes once, not twice.
    ("&amp;", "&"),
];

/// Clean pasted text.
///
/// Steps, in order: strip markup tags, decode entities, replace or drop
/// characters outside the safe set, collapse horizontal whitespace, unify
/// line breaks to `\n`. Idempotent; never fails.
pub fn normalize_text(text: &str) -> String {
    let stripped = TAG_PATTERN.replace_all(text, "");
    let decoded = decode_entities(&stripped);
    let safe = keep_safe_chars(&decoded);
    let collapsed = HORIZONTAL_SPACE_PATTERN.replace_all(&safe, " ");
    LINE_BREAK_PATTERN.replace_all(&collapsed, "\n").into_owned()
}

/// Split normalized text into trimmed, non-empty lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

fn decode_entities(text: &str) -> String {
    let mut out = NUMERIC_ENTITY_PATTERN
        .replace_all(text, |caps: &regex::Captures| {
            let code = match (caps.get(1), caps.get(2)) {
                (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
                (_, Some(dec)) => dec.as_str().parse::<u32>().ok(),
                _ => None,
            };
            code.and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_default()
        })
        .into_owned();

    for (entity, replacement) in NAMED_ENTITIES {
        if out.contains(entity) {
            out = out.replace(entity, replacement);
        }
    }
    out
}

/// Replace typographic punctuation with ASCII and drop anything that could
/// start markup or an entity on a second pass.
fn keep_safe_chars(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            _ if c.is_alphanumeric() => result.push(c),
            ' ' | '\t' | '\n' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}' => result.push(c),
            '\u{00A0}' => result.push(' '),
            '\u{2018}' | '\u{2019}' => result.push('\''),
            '\u{201C}' | '\u{201D}' => result.push('"'),
            '\u{2013}' | '\u{2014}' => result.push('-'),
            '\u{2026}' => result.push_str("..."),
            '&' => result.push_str(" and "),
            '.' | ',' | '!' | '?' | ':' | ';' | '-' | '\'' | '"' | '(' | ')' | '[' | ']' | '%'
            | '/' | '+' | '*' | '#' | '=' | '_' | '$' | '@' => result.push(c),
            _ => {}
        }
    }
    result
}
