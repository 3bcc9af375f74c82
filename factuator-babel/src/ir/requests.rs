//! Primitive edit requests of the destination document protocol.
//!
//! These structs serialize to the JSON body expected by the destination batch
//! update endpoint (`{"requests": [{"insertText": {...}}, ...]}`). Indices are
//! offsets into the document's flat stream, counted in UTF-16 code units, and
//! ranges are half open.

use serde::{Deserialize, Serialize};

/// One primitive edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    InsertText(InsertText),
    UpdateParagraphStyle(UpdateParagraphStyle),
    UpdateTextStyle(UpdateTextStyle),
    CreateParagraphBullets(CreateParagraphBullets),
    InsertInlineImage(InsertInlineImage),
    InsertTable(InsertTable),
    DeleteContentRange(DeleteContentRange),
}

/// Body of a batch update call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchUpdate {
    pub requests: Vec<Request>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub start_index: usize,
    pub end_index: usize,
}

impl Range {
    pub fn new(start_index: usize, end_index: usize) -> Self {
        Range {
            start_index,
            end_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertText {
    pub location: Location,
    pub text: String,
}

/// Named paragraph styles understood by the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamedStyle {
    #[serde(rename = "NORMAL_TEXT")]
    NormalText,
    #[serde(rename = "TITLE")]
    Title,
    #[serde(rename = "HEADING_1")]
    Heading1,
    #[serde(rename = "HEADING_2")]
    Heading2,
    #[serde(rename = "HEADING_3")]
    Heading3,
    #[serde(rename = "HEADING_4")]
    Heading4,
    #[serde(rename = "HEADING_5")]
    Heading5,
    #[serde(rename = "HEADING_6")]
    Heading6,
}

impl NamedStyle {
    /// Heading style for a markup level; levels past 6 collapse to `HEADING_6`.
    pub fn heading(level: usize) -> Self {
        match level {
            0 | 1 => NamedStyle::Heading1,
            2 => NamedStyle::Heading2,
            3 => NamedStyle::Heading3,
            4 => NamedStyle::Heading4,
            5 => NamedStyle::Heading5,
            _ => NamedStyle::Heading6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    pub named_style_type: NamedStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParagraphStyle {
    pub range: Range,
    pub paragraph_style: ParagraphStyle,
    pub fields: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub magnitude: f64,
    pub unit: String,
}

impl Dimension {
    pub fn points(magnitude: f64) -> Self {
        Dimension {
            magnitude,
            unit: "PT".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

/// Character-level style. Unset fields are left out of the JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyleFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

impl TextStyleFields {
    /// The field mask naming every set field, as the destination requires.
    pub fn field_mask(&self) -> String {
        let mut fields = Vec::new();
        if self.bold.is_some() {
            fields.push("bold");
        }
        if self.italic.is_some() {
            fields.push("italic");
        }
        if self.font_size.is_some() {
            fields.push("fontSize");
        }
        if self.link.is_some() {
            fields.push("link");
        }
        fields.join(",")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTextStyle {
    pub range: Range,
    pub text_style: TextStyleFields,
    pub fields: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParagraphBullets {
    pub range: Range,
    pub bullet_preset: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub height: Dimension,
    pub width: Dimension,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertInlineImage {
    pub location: Location,
    pub uri: String,
    pub object_size: Size,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertTable {
    pub rows: usize,
    pub columns: usize,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteContentRange {
    pub range: Range,
}
