//! Logical edit operations and their expansion into primitive requests.
//!
//! An [`Operation`] is what the translator thinks in: "insert this heading at
//! the anchor". The destination only understands [`Request`]s, so every
//! operation expands into a short, fixed sequence of primitives that must stay
//! together and in order.

use crate::ir::requests::{
    CreateParagraphBullets, DeleteContentRange, Dimension, InsertInlineImage, InsertTable,
    InsertText, Link, Location, NamedStyle, ParagraphStyle, Range, Request, Size,
    TextStyleFields, UpdateParagraphStyle, UpdateTextStyle,
};
use serde::Serialize;

const BULLET_PRESET: &str = "BULLET_DISC_CIRCLE_SQUARE";
const NUMBERED_PRESET: &str = "NUMBERED_DECIMAL_ALPHA_ROMAN_PARENS";

/// Character style applied to inserted text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub font_size_pt: f64,
}

impl TextStyle {
    pub fn plain(font_size_pt: f64) -> Self {
        TextStyle {
            bold: false,
            italic: false,
            font_size_pt,
        }
    }

    fn fields(&self) -> TextStyleFields {
        TextStyleFields {
            bold: Some(self.bold),
            italic: Some(self.italic),
            font_size: Some(Dimension::points(self.font_size_pt)),
            link: None,
        }
    }
}

/// Range that receives the table font size once the table exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FontRange {
    pub start: usize,
    pub end: usize,
    pub size_pt: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum OperationKind {
    InsertText {
        text: String,
        style: TextStyle,
    },
    InsertHeadingText {
        text: String,
        style: NamedStyle,
    },
    InsertLink {
        text: String,
        url: String,
        style: TextStyle,
    },
    InsertImage {
        uri: String,
        width_pt: f64,
        height_pt: f64,
    },
    InsertBulletText {
        text: String,
        level: usize,
        numeric: bool,
        style: TextStyle,
    },
    InsertTable {
        rows: usize,
        columns: usize,
        font_range: FontRange,
    },
    DeleteRange {
        start: usize,
        end: usize,
    },
    SetLinkStyle {
        start: usize,
        end: usize,
        url: String,
    },
}

/// A logical edit targeted at `index`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    pub index: usize,
    #[serde(flatten)]
    pub kind: OperationKind,
}

/// An entry of an [`OperationList`].
///
/// Groups are indivisible: reversal of the enclosing list moves a group as a
/// whole and never touches its inner order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OpItem {
    Single(Operation),
    Group(OperationList),
}

pub type OperationList = Vec<OpItem>;

/// Length of `text` in the destination's index units.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

impl Operation {
    pub fn new(index: usize, kind: OperationKind) -> Self {
        Operation { index, kind }
    }

    /// Expands this operation into the primitives that carry it out.
    pub fn to_requests(&self) -> Vec<Request> {
        let idx = self.index;
        match &self.kind {
            OperationKind::InsertText { text, style } => {
                let Some(range) = text_range(idx, text) else {
                    return Vec::new();
                };
                vec![
                    insert_text(idx, text),
                    paragraph_style(range, NamedStyle::NormalText),
                    text_style(range, style.fields()),
                ]
            }
            OperationKind::InsertHeadingText { text, style } => {
                let Some(range) = text_range(idx, text) else {
                    return Vec::new();
                };
                // Only the heading's own paragraph: whatever follows was built
                // earlier and already carries its style.
                vec![insert_text(idx, text), paragraph_style(range, *style)]
            }
            OperationKind::InsertLink { text, url, style } => {
                let Some(range) = text_range(idx, text) else {
                    return Vec::new();
                };
                let mut fields = style.fields();
                fields.link = Some(Link { url: url.clone() });
                vec![insert_text(idx, text), text_style(range, fields)]
            }
            OperationKind::InsertImage {
                uri,
                width_pt,
                height_pt,
            } => vec![Request::InsertInlineImage(InsertInlineImage {
                location: Location { index: idx },
                uri: uri.clone(),
                object_size: Size {
                    height: Dimension::points(*height_pt),
                    width: Dimension::points(*width_pt),
                },
            })],
            OperationKind::InsertBulletText {
                text,
                numeric,
                style,
                ..
            } => {
                let Some(range) = text_range(idx, text) else {
                    return Vec::new();
                };
                let preset = if *numeric {
                    NUMBERED_PRESET
                } else {
                    BULLET_PRESET
                };
                vec![
                    insert_text(idx, text),
                    paragraph_style(range, NamedStyle::NormalText),
                    Request::CreateParagraphBullets(CreateParagraphBullets {
                        range,
                        bullet_preset: preset.to_string(),
                    }),
                    text_style(range, style.fields()),
                ]
            }
            OperationKind::InsertTable {
                rows,
                columns,
                font_range,
            } => vec![
                Request::InsertTable(InsertTable {
                    rows: *rows,
                    columns: *columns,
                    location: Location { index: idx },
                }),
                text_style(
                    Range::new(font_range.start, font_range.end),
                    TextStyleFields {
                        font_size: Some(Dimension::points(font_range.size_pt)),
                        ..Default::default()
                    },
                ),
            ],
            OperationKind::DeleteRange { start, end } => {
                vec![Request::DeleteContentRange(DeleteContentRange {
                    range: Range::new(*start, *end),
                })]
            }
            OperationKind::SetLinkStyle { start, end, url } => vec![text_style(
                Range::new(*start, *end),
                TextStyleFields {
                    link: Some(Link { url: url.clone() }),
                    ..Default::default()
                },
            )],
        }
    }
}

fn text_range(idx: usize, text: &str) -> Option<Range> {
    let len = utf16_len(text);
    (len > 0).then(|| Range::new(idx, idx + len))
}

fn insert_text(idx: usize, text: &str) -> Request {
    Request::InsertText(InsertText {
        location: Location { index: idx },
        text: text.to_string(),
    })
}

fn paragraph_style(range: Range, style: NamedStyle) -> Request {
    Request::UpdateParagraphStyle(UpdateParagraphStyle {
        range,
        paragraph_style: ParagraphStyle {
            named_style_type: style,
        },
        fields: "namedStyleType".to_string(),
    })
}

fn text_style(range: Range, fields: TextStyleFields) -> Request {
    let mask = fields.field_mask();
    Request::UpdateTextStyle(UpdateTextStyle {
        range,
        text_style: fields,
        fields: mask,
    })
}
