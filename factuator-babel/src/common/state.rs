//! Cross-node conversion state.
//!
//! The node walk is a fold: every translation step receives the state by value
//! and returns the state for the next node. Nothing here is shared between
//! pages or between table cells.

use crate::ir::operations::TextStyle;
use serde::Serialize;

/// Bullet mode armed by a list marker, waiting for the next text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListMode {
    pub level: usize,
    pub numeric: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConversionState {
    pub list_mode: Option<ListMode>,
    pub is_bold: bool,
    pub is_italic: bool,
    pub font_size_pt: f64,
}

impl ConversionState {
    /// Fresh state for document body content.
    pub fn body(font_size_pt: f64) -> Self {
        ConversionState {
            list_mode: None,
            is_bold: false,
            is_italic: false,
            font_size_pt,
        }
    }

    /// Fresh state for the content of one table cell.
    pub fn table(font_size_pt: f64) -> Self {
        Self::body(font_size_pt)
    }

    pub fn with_list_mode(self, level: usize, numeric: bool) -> Self {
        ConversionState {
            list_mode: Some(ListMode { level, numeric }),
            ..self
        }
    }

    /// Takes the armed list mode, leaving the state without one.
    pub fn consume_list_mode(self) -> (Option<ListMode>, Self) {
        (
            self.list_mode,
            ConversionState {
                list_mode: None,
                ..self
            },
        )
    }

    /// Flips bold and/or italic. Applying the same toggle twice restores the
    /// original values, whatever they were.
    pub fn toggled(self, bold: bool, italic: bool) -> Self {
        ConversionState {
            is_bold: self.is_bold ^ bold,
            is_italic: self.is_italic ^ italic,
            ..self
        }
    }

    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            bold: self.is_bold,
            italic: self.is_italic,
            font_size_pt: self.font_size_pt,
        }
    }
}
