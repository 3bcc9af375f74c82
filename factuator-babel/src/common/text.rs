//! Text cleanup applied before markup text reaches the destination.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Behavior switches that render nothing in the destination.
const MAGIC_WORDS: &[&str] = &["__NOTOC__", "__FORCETOC__", "__TOC__", "__NOEDITSECTION__"];

static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n([ \t]*\n)+").unwrap());
static QUOTE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"'{2,}").unwrap());
static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<>]*>").unwrap());
static ENTITIES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);").unwrap());

/// Normalizes a text run: line endings, magic words and runs of blank lines.
pub fn normalize_text(raw: &str) -> String {
    let mut text = raw.replace("\r\n", "\n");
    for word in MAGIC_WORDS {
        text = text.replace(word, "");
    }
    BLANK_LINES.replace_all(&text, "\n").into_owned()
}

/// Splits a heading line into its level and its bare text.
///
/// The level is the length of the leading `=` run. Quote markup inside the
/// heading is dropped since heading styles carry their own weight.
pub fn strip_heading(raw: &str) -> (usize, String) {
    let trimmed = raw.trim();
    let level = trimmed.chars().take_while(|c| *c == '=').count();
    let inner = trimmed.trim_start_matches('=').trim_end_matches('=');
    (level, strip_quote_markup(inner).trim().to_string())
}

pub fn strip_quote_markup(text: &str) -> String {
    QUOTE_RUNS.replace_all(text, "").into_owned()
}

/// Removes anything that looks like an HTML tag, keeping the text between tags.
pub fn strip_tags(text: &str) -> String {
    TAGS.replace_all(text, "").into_owned()
}

/// Replaces every recognised character reference in `text`.
pub fn decode_entities(text: &str) -> String {
    ENTITIES
        .replace_all(text, |caps: &Captures| {
            decode_entity(&caps[0]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Decodes a single `&name;`, `&#NNN;` or `&#xHH;` reference.
pub fn decode_entity(raw: &str) -> Option<String> {
    let body = raw.strip_prefix('&')?.strip_suffix(';')?;
    if let Some(number) = body.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    let ch = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "ndash" => '–',
        "mdash" => '—',
        "hellip" => '…',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        "laquo" => '«',
        "raquo" => '»',
        "bull" => '•',
        "middot" => '·',
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        "deg" => '°',
        "plusmn" => '±',
        "times" => '×',
        "divide" => '÷',
        "micro" => 'µ',
        "para" => '¶',
        "sect" => '§',
        "euro" => '€',
        "pound" => '£',
        "cent" => '¢',
        "yen" => '¥',
        "frac12" => '½',
        "frac14" => '¼',
        "frac34" => '¾',
        "le" => '≤',
        "ge" => '≥',
        "ne" => '≠',
        "rarr" => '→',
        "larr" => '←',
        "alpha" => 'α',
        "beta" => 'β',
        "gamma" => 'γ',
        "delta" => 'δ',
        "mu" => 'μ',
        "sigma" => 'σ',
        _ => return None,
    };
    Some(ch.to_string())
}
