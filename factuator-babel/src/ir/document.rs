//! The parts of a fetched destination document this crate reads.
//!
//! Only the fields needed to find the end of the body and to walk text runs
//! with their links are modelled. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    pub document_id: String,
    pub title: String,
    pub body: Body,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Body {
    pub content: Vec<StructuralElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuralElement {
    pub start_index: usize,
    pub end_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<Paragraph>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paragraph {
    pub elements: Vec<ParagraphElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParagraphElement {
    pub start_index: usize,
    pub end_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_run: Option<TextRun>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextRun {
    pub content: String,
    pub text_style: RunStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<RunLink>,
}

/// Links may also point at bookmarks or headings, which carry no URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunLink {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Table {
    pub table_rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableRow {
    pub table_cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableCell {
    pub content: Vec<StructuralElement>,
}

impl Document {
    /// End of the body; 1 for a document without content.
    pub fn end_index(&self) -> usize {
        self.body
            .content
            .last()
            .map_or(1, |element| element.end_index.max(1))
    }

    /// Visits every text run, table cells included, in document order.
    pub fn for_each_run(&self, mut visit: impl FnMut(&ParagraphElement, &TextRun)) {
        walk(&self.body.content, &mut visit);
    }
}

fn walk(content: &[StructuralElement], visit: &mut impl FnMut(&ParagraphElement, &TextRun)) {
    for element in content {
        if let Some(paragraph) = &element.paragraph {
            for item in &paragraph.elements {
                if let Some(run) = &item.text_run {
                    visit(item, run);
                }
            }
        }
        if let Some(table) = &element.table {
            for row in &table.table_rows {
                for cell in &row.table_cells {
                    walk(&cell.content, visit);
                }
            }
        }
    }
}
