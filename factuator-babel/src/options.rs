//! Knobs of a conversion run.

use serde::{Deserialize, Serialize};

pub const DEFAULT_DOCUMENT_PREFIX: &str = "https://docs.google.com/document/d/";
pub const DEFAULT_ASSET_PREFIX: &str = "https://drive.google.com/file/d/";
pub const DEFAULT_PLACEHOLDER_SCHEME: &str = "internal";

/// Everything the translator and page converter need besides the mappings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Base URL of wiki pages, used for the source backlink.
    pub wiki_page_prefix: String,
    pub document_prefix: String,
    pub asset_prefix: String,
    /// Scheme of links whose target has no document yet.
    pub placeholder_scheme: String,
    pub body_font_size_pt: f64,
    pub table_font_size_pt: f64,
    /// Bounding box of embedded images when the markup gives no width.
    pub image_size_pt: f64,
    pub include_title: bool,
    pub include_source_link: bool,
    pub source_link_text: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            wiki_page_prefix: "https://wiki.example.org/index.php/".to_string(),
            document_prefix: DEFAULT_DOCUMENT_PREFIX.to_string(),
            asset_prefix: DEFAULT_ASSET_PREFIX.to_string(),
            placeholder_scheme: DEFAULT_PLACEHOLDER_SCHEME.to_string(),
            body_font_size_pt: 11.0,
            table_font_size_pt: 8.0,
            image_size_pt: 300.0,
            include_title: true,
            include_source_link: true,
            source_link_text: "Original wiki location".to_string(),
        }
    }
}
