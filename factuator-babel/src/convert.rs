//! Whole-page conversion: title, source backlink, then the page content.

use crate::common::assemble::{assemble, count_operations, Emitter, BODY_ANCHOR};
use crate::common::links::wiki_page_url;
use crate::common::state::ConversionState;
use crate::ir::nodes::Node;
use crate::ir::operations::{OperationKind, OperationList, TextStyle};
use crate::ir::requests::{BatchUpdate, NamedStyle, Request};
use crate::markup::parse;
use crate::translate::Translator;
use serde::Serialize;
use std::collections::BTreeSet;

/// Operations for one page, in document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageConversion {
    pub title: String,
    pub operations: OperationList,
    /// Already converted titles the page links to.
    pub linked_titles: BTreeSet<String>,
}

impl PageConversion {
    /// The primitives to submit, in submission order.
    pub fn requests(&self) -> Vec<Request> {
        assemble(self.operations.clone())
    }

    pub fn batch(&self) -> BatchUpdate {
        BatchUpdate {
            requests: self.requests(),
        }
    }

    pub fn operation_count(&self) -> usize {
        count_operations(&self.operations)
    }
}

pub fn convert_page(title: &str, markup: &str, translator: &Translator) -> PageConversion {
    convert_nodes(title, &parse(markup), translator)
}

pub fn convert_nodes(title: &str, nodes: &[Node], translator: &Translator) -> PageConversion {
    let options = translator.options();
    let body_size = options.body_font_size_pt;
    let mut out = Emitter::at(BODY_ANCHOR);

    if options.include_title {
        out.push(OperationKind::InsertHeadingText {
            text: format!("{title}\n"),
            style: NamedStyle::Title,
        });
    }
    if options.include_source_link {
        out.push(OperationKind::InsertLink {
            text: format!("{}\n", options.source_link_text),
            url: wiki_page_url(&options.wiki_page_prefix, title),
            style: TextStyle::plain(body_size),
        });
    }

    translator.translate_all(nodes, ConversionState::body(body_size), &mut out);
    let (operations, linked_titles) = out.into_parts();
    log::debug!(
        "{title}: {} operations, {} resolved links",
        count_operations(&operations),
        linked_titles.len()
    );
    PageConversion {
        title: title.to_string(),
        operations,
        linked_titles,
    }
}
