//! Node-to-operation translation.
//!
//! [`Translator::translate`] handles one node: it either changes the
//! [`ConversionState`] (list markers, quote spans) or appends operations to the
//! [`Emitter`], and returns the state for the next node. Walking a page is a
//! fold over its nodes, see [`Translator::translate_all`].
//!
//! Translation never fails. Anything that cannot be rendered is logged with
//! the offending markup and skipped, or replaced by a visible placeholder.

use crate::assets::{AssetKind, AssetSource};
use crate::common::assemble::{backward, Emitter};
use crate::common::links::{
    asset_url, document_url, file_name, is_category, normalize_title, placeholder_url,
    FileLinkOptions,
};
use crate::common::state::ConversionState;
use crate::common::table::{layout_table, TableLayout};
use crate::common::text::{
    decode_entities, decode_entity, normalize_text, strip_heading, strip_quote_markup, strip_tags,
};
use crate::ir::nodes::{plain_text, ExternalLink, Heading, HtmlTag, InternalLink, Node, Tag};
use crate::ir::operations::{OpItem, Operation, OperationKind, OperationList, TextStyle};
use crate::ir::requests::NamedStyle;
use crate::mappings::Mappings;
use crate::markup::parse;
use crate::options::ConvertOptions;

pub const TABLE_FAILED_TEXT: &str = "<table failed to convert>\n";

const PX_TO_PT: f64 = 0.75;
const MAX_LIST_DEPTH: usize = 6;

pub struct Translator<'a> {
    options: &'a ConvertOptions,
    mappings: &'a Mappings,
    assets: &'a dyn AssetSource,
}

impl<'a> Translator<'a> {
    pub fn new(
        options: &'a ConvertOptions,
        mappings: &'a Mappings,
        assets: &'a dyn AssetSource,
    ) -> Self {
        Translator {
            options,
            mappings,
            assets,
        }
    }

    pub fn options(&self) -> &ConvertOptions {
        self.options
    }

    /// Folds [`translate`](Self::translate) over `nodes`.
    pub fn translate_all(
        &self,
        nodes: &[Node],
        state: ConversionState,
        out: &mut Emitter,
    ) -> ConversionState {
        nodes
            .iter()
            .fold(state, |state, node| self.translate(node, state, out))
    }

    pub fn translate(
        &self,
        node: &Node,
        state: ConversionState,
        out: &mut Emitter,
    ) -> ConversionState {
        match node {
            Node::Comment(_) => state,
            Node::Text(text) => self.text(text, state, out),
            Node::Heading(heading) => {
                self.heading(heading, out);
                state
            }
            Node::InternalLink(link) => {
                self.internal_link(link, state, out);
                state
            }
            Node::ExternalLink(link) => {
                self.external_link(link, state, out);
                state
            }
            Node::Tag(tag) => self.tag(tag, state, out),
            Node::Html(tag) => {
                self.html(tag, state, out);
                state
            }
            Node::Entity(raw) => {
                let decoded = decode_entity(raw).unwrap_or_else(|| raw.clone());
                push_text(out, decoded, state.text_style());
                state
            }
            Node::Table(raw) => {
                self.table(raw, state, out);
                state
            }
            Node::Template(template) => {
                log::debug!("template {} left as placeholder", template.raw);
                push_text(
                    out,
                    format!("<template for {} goes here>", template.name),
                    state.text_style(),
                );
                state
            }
        }
    }

    fn text(&self, raw: &str, state: ConversionState, out: &mut Emitter) -> ConversionState {
        let text = normalize_text(raw);
        if text.is_empty() {
            return state;
        }
        let (list_mode, state) = state.consume_list_mode();
        let style = state.text_style();
        match list_mode {
            Some(mode) => out.push(OperationKind::InsertBulletText {
                text,
                level: mode.level,
                numeric: mode.numeric,
                style,
            }),
            None => out.push(OperationKind::InsertText { text, style }),
        }
        state
    }

    fn heading(&self, heading: &Heading, out: &mut Emitter) {
        let (level, text) = strip_heading(&heading.raw);
        if text.is_empty() {
            log::debug!("empty heading {:?} dropped", heading.raw);
            return;
        }
        out.push(OperationKind::InsertHeadingText {
            text: format!("{text}\n"),
            style: NamedStyle::heading(level),
        });
    }

    fn internal_link(&self, link: &InternalLink, state: ConversionState, out: &mut Emitter) {
        let target = link.target.trim();
        // A leading colon turns an embed or a category tag into a plain link.
        let escaped = target.starts_with(':');
        if !escaped && is_category(target) {
            log::debug!("category link {target} dropped");
            return;
        }
        if let Some(file) = file_name(target) {
            self.file_link(file, link, escaped, state, out);
            return;
        }

        let title = normalize_title(target);
        let text = link
            .text
            .as_deref()
            .map(strip_quote_markup)
            .unwrap_or_else(|| target.trim_start_matches(':').to_string());
        if title.is_empty() {
            // Same-page section link.
            push_text(out, text, state.text_style());
            return;
        }

        let url = match self.mappings.document_for(&title) {
            Some(id) => {
                out.record_link(&title);
                document_url(&self.options.document_prefix, id)
            }
            None => placeholder_url(&self.options.placeholder_scheme, &title),
        };
        push_link(out, text, url, state.text_style());
    }

    fn file_link(
        &self,
        file: &str,
        link: &InternalLink,
        escaped: bool,
        state: ConversionState,
        out: &mut Emitter,
    ) {
        let options = FileLinkOptions::parse(link.text.as_deref());
        let style = state.text_style();

        if !escaped && options.thumbnail && AssetKind::from_file_name(file) == AssetKind::Image {
            match self.assets.publish(file) {
                Ok(uri) => {
                    let size = options
                        .width_px
                        .map_or(self.options.image_size_pt, |px| f64::from(px) * PX_TO_PT);
                    out.push(OperationKind::InsertImage {
                        uri,
                        width_pt: size,
                        height_pt: size,
                    });
                    if let Some(caption) = options.caption {
                        let italic = TextStyle {
                            italic: true,
                            ..style
                        };
                        push_text(out, format!("\n{}\n", strip_quote_markup(&caption)), italic);
                    }
                    return;
                }
                Err(err) => log::warn!("could not embed {file}, linking instead: {err}"),
            }
        }

        let text = options.caption.unwrap_or_else(|| file.to_string());
        let url = match self.mappings.asset_for(file) {
            Some(id) => asset_url(&self.options.asset_prefix, id),
            None => placeholder_url(
                &self.options.placeholder_scheme,
                &normalize_title(target_without_escape(&link.target)),
            ),
        };
        push_link(out, strip_quote_markup(&text), url, style);
    }

    fn external_link(&self, link: &ExternalLink, state: ConversionState, out: &mut Emitter) {
        let url = match link.url.strip_prefix("//") {
            Some(rest) => format!("https://{rest}"),
            None => link.url.clone(),
        };
        let text = link
            .text
            .as_deref()
            .map(strip_quote_markup)
            .unwrap_or_else(|| link.url.clone());
        push_link(out, text, url, state.text_style());
    }

    fn tag(&self, tag: &Tag, state: ConversionState, out: &mut Emitter) -> ConversionState {
        let markup = tag.markup.as_str();
        if let Some((level, numeric)) = list_marker(markup) {
            return state.with_list_mode(level, numeric);
        }
        if let Some((bold, italic)) = quote_toggles(markup) {
            let inner = self.translate_all(&tag.contents, state.toggled(bold, italic), out);
            return inner.toggled(bold, italic);
        }
        if markup == "{|" {
            let body = plain_text(&tag.contents);
            let raw = if body.trim_start().starts_with("{|") {
                body
            } else {
                format!("{{|\n{body}\n|}}")
            };
            self.table(&raw, state, out);
            return state;
        }
        if markup.starts_with("----") || markup.chars().all(|c| "*#:;".contains(c)) {
            log::debug!("layout marker {markup:?} dropped");
            return state;
        }
        log::warn!("unrecognised markup {markup:?} dropped");
        state
    }

    fn html(&self, tag: &HtmlTag, state: ConversionState, out: &mut Emitter) {
        match tag.name.as_str() {
            "br" => push_text(out, "\n".to_string(), state.text_style()),
            "ref" | "references" | "gallery" => {
                log::debug!("<{}> dropped", tag.name);
            }
            _ => {
                let text = normalize_text(&decode_entities(&strip_tags(&tag.raw)));
                push_text(out, text, state.text_style());
            }
        }
    }

    fn table(&self, raw: &str, state: ConversionState, out: &mut Emitter) {
        match layout_table(raw, out.anchor()) {
            Some(layout) => {
                let group = self.table_group(&layout, out);
                out.push_group(group);
            }
            None => {
                log::warn!("table without cells left as placeholder: {raw:?}");
                push_text(out, TABLE_FAILED_TEXT.to_string(), state.text_style());
            }
        }
    }

    /// The table insert followed by the content of every cell, last cell
    /// first. Each cell is translated on its own with a fresh state.
    fn table_group(&self, layout: &TableLayout, out: &mut Emitter) -> OperationList {
        let font_range = layout.font_range(self.options.table_font_size_pt);
        let mut group = vec![OpItem::Single(Operation::new(
            layout.anchor,
            OperationKind::InsertTable {
                rows: layout.rows,
                columns: layout.columns,
                font_range,
            },
        ))];

        for cell in layout.fill_order() {
            let mut cell_out = Emitter::at(cell.index);
            let state = ConversionState::table(self.options.table_font_size_pt);
            self.translate_all(&parse(&cell.markup), state, &mut cell_out);
            out.absorb_links(&mut cell_out);
            let (items, _) = cell_out.into_parts();
            if !items.is_empty() {
                group.push(OpItem::Group(backward(items)));
            }
        }
        group
    }
}

fn push_text(out: &mut Emitter, text: String, style: TextStyle) {
    if !text.is_empty() {
        out.push(OperationKind::InsertText { text, style });
    }
}

fn push_link(out: &mut Emitter, text: String, url: String, style: TextStyle) {
    if !text.is_empty() {
        out.push(OperationKind::InsertLink { text, url, style });
    }
}

fn target_without_escape(target: &str) -> &str {
    target.trim().trim_start_matches(':')
}

/// Level and numbering of a `*`/`#` run.
fn list_marker(markup: &str) -> Option<(usize, bool)> {
    let depth = markup.chars().count();
    if depth == 0 || depth > MAX_LIST_DEPTH || !markup.chars().all(|c| c == '*' || c == '#') {
        return None;
    }
    Some((depth, markup.ends_with('#')))
}

/// Bold and italic toggles of a quote run.
fn quote_toggles(markup: &str) -> Option<(bool, bool)> {
    match markup {
        "''" => Some((false, true)),
        "'''" | "''''" => Some((true, false)),
        "'''''" => Some((true, true)),
        _ => None,
    }
}
