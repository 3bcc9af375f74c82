//! Markup nodes produced by the wikitext scanner.

use serde::Serialize;

/// One parsed unit of wiki markup.
///
/// The sequence is flat: only quote spans and structural tags carry nested
/// contents. Everything else is a leaf that the translator handles on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Node {
    Comment(String),
    Text(String),
    Heading(Heading),
    InternalLink(InternalLink),
    ExternalLink(ExternalLink),
    Tag(Tag),
    Html(HtmlTag),
    Entity(String),
    /// Raw table markup, from the `{|` line through the closing `|}`.
    Table(String),
    Template(Template),
}

/// A heading line, kept with its `=` delimiters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    pub raw: String,
}

/// `[[target|text]]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InternalLink {
    pub target: String,
    /// Everything after the first pipe, further pipes included.
    pub text: Option<String>,
}

/// `[url text]` or a bare URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalLink {
    pub url: String,
    pub text: Option<String>,
}

/// A tag introduced by wiki markup rather than HTML (`*`, `#`, `''`, `{|`, `----`, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tag {
    pub markup: String,
    pub contents: Vec<Node>,
}

impl Tag {
    pub fn marker(markup: impl Into<String>) -> Self {
        Tag {
            markup: markup.into(),
            contents: Vec::new(),
        }
    }
}

/// An embedded HTML element, raw markup included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HtmlTag {
    pub name: String,
    pub raw: String,
}

/// `{{name|params}}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    pub name: String,
    pub raw: String,
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Short kind name, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Comment(_) => "comment",
            Node::Text(_) => "text",
            Node::Heading(_) => "heading",
            Node::InternalLink(_) => "internal-link",
            Node::ExternalLink(_) => "external-link",
            Node::Tag(_) => "tag",
            Node::Html(_) => "html",
            Node::Entity(_) => "entity",
            Node::Table(_) => "table",
            Node::Template(_) => "template",
        }
    }
}

/// Concatenates the literal text carried by `nodes`, ignoring markup.
pub fn plain_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Tag(tag) => out.push_str(&plain_text(&tag.contents)),
            Node::InternalLink(link) => {
                out.push_str(link.text.as_deref().unwrap_or(&link.target))
            }
            Node::ExternalLink(link) => out.push_str(link.text.as_deref().unwrap_or(&link.url)),
            _ => {}
        }
    }
    out
}
