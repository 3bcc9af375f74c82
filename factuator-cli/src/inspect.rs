//! Inspection views
//!
//! Each view shows one stage of the pipeline for a single page:
//!
//! - `nodes`: parsed markup nodes as JSON
//! - `node-tree`: the same nodes as an indented outline
//! - `operations`: the operation list in document order, before reversal
//! - `requests`: the batch as it would be submitted
//! - `table-layout`: grid size and cell offsets of every table on the page
//!
//! Example: `factuator inspect page.wiki table-layout`

use factuator_babel::common::assemble::BODY_ANCHOR;
use factuator_babel::common::table::layout_table;
use factuator_babel::convert::convert_nodes;
use factuator_babel::ir::nodes::Node;
use factuator_babel::markup::parse;
use factuator_babel::Translator;
use serde::Serialize;

pub const AVAILABLE_VIEWS: &[&str] = &[
    "nodes",
    "node-tree",
    "operations",
    "requests",
    "table-layout",
];

pub const DEFAULT_VIEW: &str = "node-tree";

/// Renders `view` for the page `title` whose markup is `source`.
pub fn execute_view(
    source: &str,
    title: &str,
    view: &str,
    translator: &Translator,
) -> Result<String, String> {
    let nodes = parse(source);
    match view {
        "nodes" => to_json(&nodes),
        "node-tree" => {
            let mut out = String::new();
            write_tree(&nodes, 0, &mut out);
            Ok(out)
        }
        "operations" => to_json(&convert_nodes(title, &nodes, translator).operations),
        "requests" => to_json(&convert_nodes(title, &nodes, translator).batch()),
        "table-layout" => {
            let mut tables = Vec::new();
            collect_tables(&nodes, &mut tables);
            let layouts: Vec<_> = tables
                .iter()
                .map(|raw| layout_table(raw, BODY_ANCHOR))
                .collect();
            to_json(&layouts)
        }
        other => Err(format!(
            "Unknown view '{other}'. Available views: {}",
            AVAILABLE_VIEWS.join(", ")
        )),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

fn write_tree(nodes: &[Node], depth: usize, out: &mut String) {
    for node in nodes {
        let indent = "  ".repeat(depth);
        let detail = match node {
            Node::Text(text) | Node::Comment(text) | Node::Entity(text) => format!("{text:?}"),
            Node::Heading(heading) => format!("{:?}", heading.raw),
            Node::InternalLink(link) => match &link.text {
                Some(text) => format!("{} | {text}", link.target),
                None => link.target.clone(),
            },
            Node::ExternalLink(link) => link.url.clone(),
            Node::Tag(tag) => tag.markup.clone(),
            Node::Html(html) => html.name.clone(),
            Node::Table(raw) => format!("{} line(s)", raw.lines().count()),
            Node::Template(template) => template.name.clone(),
        };
        out.push_str(&format!("{indent}{} {detail}\n", node.kind()));
        if let Node::Tag(tag) = node {
            write_tree(&tag.contents, depth + 1, out);
        }
    }
}

fn collect_tables<'n>(nodes: &'n [Node], tables: &mut Vec<&'n str>) {
    for node in nodes {
        match node {
            Node::Table(raw) => tables.push(raw),
            Node::Tag(tag) => collect_tables(&tag.contents, tables),
            _ => {}
        }
    }
}
