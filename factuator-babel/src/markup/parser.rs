//! Line-aware wikitext scanner.
//!
//! Block constructs (headings, tables, list and indent markers, rules) are
//! only recognised at the start of a line. Everything else is scanned inline,
//! accumulating plain characters into text runs. Malformed or unterminated
//! constructs fall back to literal text; the scanner never fails.

use crate::ir::nodes::{ExternalLink, Heading, HtmlTag, InternalLink, Node, Tag, Template};
use once_cell::sync::Lazy;
use regex::Regex;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<(/?)([A-Za-z][A-Za-z0-9]*)(\s[^<>]*?)?(/?)>").unwrap()
});
static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);").unwrap()
});
static BARE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(?:https?|ftp)://[^\s<>\[\]"|{}]+"#).unwrap());
static LINK_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:https?://|ftp://|mailto:|//)").unwrap());

const VOID_TAGS: &[&str] = &["br", "hr", "img", "wbr"];

/// Parses a full page of markup.
pub fn parse(source: &str) -> Vec<Node> {
    let source = source.replace("\r\n", "\n");
    Scanner::new(&source, true).run()
}

/// Parses markup known to sit inside a single line (quote span contents).
pub fn parse_inline(source: &str) -> Vec<Node> {
    Scanner::new(source, false).run()
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    block: bool,
    nodes: Vec<Node>,
    text: String,
    /// Set by a list marker: the text run ends with the marker's line.
    close_at_eol: bool,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str, block: bool) -> Self {
        Scanner {
            src,
            pos: 0,
            block,
            nodes: Vec::new(),
            text: String::new(),
            close_at_eol: false,
        }
    }

    fn run(mut self) -> Vec<Node> {
        while self.pos < self.src.len() {
            if self.block && self.at_line_start() && self.block_construct() {
                continue;
            }
            self.inline_step();
        }
        self.flush_text();
        self.nodes
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_line_start(&self) -> bool {
        self.pos == 0 || self.src.as_bytes()[self.pos - 1] == b'\n'
    }

    fn current_line(&self) -> &'a str {
        let rest = self.rest();
        rest.split('\n').next().unwrap_or(rest)
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.nodes.push(Node::Text(std::mem::take(&mut self.text)));
        }
    }

    fn push(&mut self, node: Node) {
        self.flush_text();
        self.nodes.push(node);
    }

    fn literal(&mut self) {
        if let Some(ch) = self.rest().chars().next() {
            self.text.push(ch);
            self.pos += ch.len_utf8();
            if ch == '\n' && self.close_at_eol {
                self.close_at_eol = false;
                self.flush_text();
            }
        }
    }

    fn block_construct(&mut self) -> bool {
        let line = self.current_line();
        let trimmed = line.trim_end();

        if is_heading(trimmed) {
            self.push(Node::Heading(Heading {
                raw: trimmed.trim().to_string(),
            }));
            self.skip_line();
            return true;
        }
        if line.trim_start().starts_with("{|") {
            let raw = self.take_table();
            self.push(Node::Table(raw));
            return true;
        }
        if line.starts_with("----") {
            let len = line.bytes().take_while(|b| *b == b'-').count();
            self.push(Node::Tag(Tag::marker(&line[..len])));
            self.pos += len;
            return true;
        }

        let run = line
            .bytes()
            .take_while(|b| matches!(b, b'*' | b'#' | b':' | b';'))
            .count();
        if run > 0 {
            self.push(Node::Tag(Tag::marker(&line[..run])));
            self.pos += run;
            let blanks = self
                .rest()
                .bytes()
                .take_while(|b| *b == b' ' || *b == b'\t')
                .count();
            self.pos += blanks;
            self.close_at_eol = true;
            return true;
        }
        false
    }

    fn skip_line(&mut self) {
        match self.rest().find('\n') {
            Some(offset) => self.pos += offset + 1,
            None => self.pos = self.src.len(),
        }
    }

    /// Consumes a table block, nested tables included.
    fn take_table(&mut self) -> String {
        let start = self.pos;
        let mut cursor = self.pos;
        let mut depth = 0usize;
        let mut end = self.src.len();
        while cursor < self.src.len() {
            let line_end = self.src[cursor..]
                .find('\n')
                .map_or(self.src.len(), |offset| cursor + offset);
            let line = self.src[cursor..line_end].trim_start();
            if line.starts_with("{|") {
                depth += 1;
            } else if line.starts_with("|}") {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    end = line_end;
                    break;
                }
            }
            cursor = line_end + 1;
        }
        self.pos = (end + 1).min(self.src.len());
        self.src[start..end].to_string()
    }

    fn inline_step(&mut self) {
        let rest = self.rest();
        let scanned = if rest.starts_with("<!--") {
            Some(comment(rest))
        } else if rest.starts_with("[[") {
            internal_link(rest)
        } else if rest.starts_with('[') {
            external_link(rest)
        } else if rest.starts_with("{{") {
            template(rest)
        } else if rest.starts_with("''") {
            self.quote();
            return;
        } else if rest.starts_with('<') {
            html(rest)
        } else if rest.starts_with('&') {
            ENTITY
                .find(rest)
                .map(|m| (Node::Entity(m.as_str().to_string()), m.end()))
        } else if self.url_may_start() {
            bare_url(rest)
        } else {
            None
        };

        match scanned {
            Some((node, consumed)) => {
                self.push(node);
                self.pos += consumed;
            }
            None => self.literal(),
        }
    }

    fn url_may_start(&self) -> bool {
        let preceded_by_word = self.src[..self.pos]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '/');
        !preceded_by_word && matches!(self.rest().as_bytes().first(), Some(b'h' | b'f'))
    }

    /// Quote runs: `''` italic, `'''` bold, `'''''` both.
    fn quote(&mut self) {
        let rest = self.rest();
        let run = rest.bytes().take_while(|b| *b == b'\'').count();
        let len = match run {
            2 | 3 | 5 => run,
            4 => 3,
            _ => 5,
        };
        // Apostrophes beyond the recognised run are literal.
        for _ in 0..run - len {
            self.literal();
        }

        let rest = self.rest();
        let markup = &rest[..len];
        let line = rest[len..].split('\n').next().unwrap_or_default();
        let (inner, consumed) = match closing_run(line, len) {
            Some(close) => (&line[..close], len + close + len),
            None => (line, len + line.len()),
        };
        self.push(Node::Tag(Tag {
            markup: markup.to_string(),
            contents: parse_inline(inner),
        }));
        self.pos += consumed;
    }
}

fn is_heading(line: &str) -> bool {
    line.len() >= 3
        && line.starts_with('=')
        && line.ends_with('=')
        && !line.trim_matches('=').trim().is_empty()
}

/// Offset in `line` where a quote run of `len` closes, if it does.
///
/// A five-quote run also closes shorter spans, using its last `len` quotes.
fn closing_run(line: &str, len: usize) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\'' {
            i += 1;
            continue;
        }
        let run = bytes[i..].iter().take_while(|b| **b == b'\'').count();
        if run == len {
            return Some(i);
        }
        if run == 5 && len < 5 {
            return Some(i + run - len);
        }
        i += run;
    }
    None
}

fn comment(rest: &str) -> (Node, usize) {
    match rest[4..].find("-->") {
        Some(end) => (Node::Comment(rest[4..4 + end].to_string()), 4 + end + 3),
        None => (Node::Comment(rest[4..].to_string()), rest.len()),
    }
}

/// Finds the offset of the `close` matching an already consumed `open`.
fn matching(rest: &str, open: &str, close: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open.len();
    while i < rest.len() {
        let tail = &rest[i..];
        if tail.starts_with(open) {
            depth += 1;
            i += open.len();
        } else if tail.starts_with(close) {
            if depth == 0 {
                return Some(i);
            }
            depth -= 1;
            i += close.len();
        } else {
            i += tail.chars().next().map_or(1, char::len_utf8);
        }
    }
    None
}

fn internal_link(rest: &str) -> Option<(Node, usize)> {
    let end = matching(rest, "[[", "]]")?;
    let inner = &rest[2..end];
    let (target, text) = match inner.split_once('|') {
        Some((target, text)) => (target, Some(text)),
        None => (inner, None),
    };
    let target = target.trim();
    if target.is_empty() {
        return None;
    }
    let link = InternalLink {
        target: target.to_string(),
        text: text.filter(|t| !t.trim().is_empty()).map(str::to_string),
    };
    Some((Node::InternalLink(link), end + 2))
}

fn external_link(rest: &str) -> Option<(Node, usize)> {
    let after = &rest[1..];
    if !LINK_SCHEME.is_match(after) {
        return None;
    }
    let close = after.find([']', '\n'])?;
    if after.as_bytes()[close] != b']' {
        return None;
    }
    let inner = after[..close].trim();
    let (url, text) = match inner.split_once(char::is_whitespace) {
        Some((url, text)) => (url, Some(text.trim())),
        None => (inner, None),
    };
    let link = ExternalLink {
        url: url.to_string(),
        text: text.filter(|t| !t.is_empty()).map(str::to_string),
    };
    Some((Node::ExternalLink(link), close + 2))
}

fn bare_url(rest: &str) -> Option<(Node, usize)> {
    let found = BARE_URL.find(rest)?.as_str();
    let url = found.trim_end_matches(['.', ',', ';', ':', '!', '?', ')', '\'']);
    let link = ExternalLink {
        url: url.to_string(),
        text: None,
    };
    Some((Node::ExternalLink(link), url.len()))
}

fn template(rest: &str) -> Option<(Node, usize)> {
    let end = matching(rest, "{{", "}}")?;
    let inner = &rest[2..end];
    let name = inner.split('|').next().unwrap_or_default().trim();
    let raw = &rest[..end + 2];
    Some((
        Node::Template(Template {
            name: name.to_string(),
            raw: raw.to_string(),
        }),
        raw.len(),
    ))
}

fn html(rest: &str) -> Option<(Node, usize)> {
    let caps = HTML_TAG.captures(rest)?;
    let open = caps.get(0)?.as_str();
    let name = caps[2].to_ascii_lowercase();
    let closing = !caps[1].is_empty();
    let self_closing = caps.get(4).is_some_and(|m| !m.as_str().is_empty());

    if closing || self_closing || VOID_TAGS.contains(&name.as_str()) {
        let tag = HtmlTag {
            name,
            raw: open.to_string(),
        };
        return Some((Node::Html(tag), open.len()));
    }

    let lowered = rest.to_ascii_lowercase();
    let close_start = lowered[open.len()..]
        .find(&format!("</{name}"))
        .map(|offset| open.len() + offset);
    let Some(close_start) = close_start else {
        let tag = HtmlTag {
            name,
            raw: open.to_string(),
        };
        return Some((Node::Html(tag), open.len()));
    };
    let close_end = rest[close_start..]
        .find('>')
        .map_or(rest.len(), |offset| close_start + offset + 1);

    if name == "nowiki" {
        let inner = &rest[open.len()..close_start];
        return Some((Node::Text(inner.to_string()), close_end));
    }
    let tag = HtmlTag {
        name,
        raw: rest[..close_end].to_string(),
    };
    Some((Node::Html(tag), close_end))
}
