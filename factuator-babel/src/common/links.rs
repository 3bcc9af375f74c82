//! Link targets: title normalisation, file links and the URLs built from them.

use url::Url;

const FILE_NAMESPACES: &[&str] = &["file", "image", "media"];
const THUMBNAIL_OPTIONS: &[&str] = &["thumb", "thumbnail", "frame"];
const LAYOUT_OPTIONS: &[&str] = &[
    "frameless", "border", "left", "right", "center", "centre", "none", "upright", "baseline",
    "middle", "sub", "super", "top", "text-top", "bottom", "text-bottom",
];
const OPTION_PREFIXES: &[&str] = &["link=", "alt=", "page=", "class=", "lang=", "upright="];

/// Canonical form of a page title as used for mapping lookups.
///
/// Underscores become spaces, whitespace runs collapse, a leading `:` and any
/// `#section` suffix are dropped and the first letter is upper-cased.
pub fn normalize_title(raw: &str) -> String {
    let without_section = raw.split('#').next().unwrap_or_default();
    let spaced = without_section.replace('_', " ");
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let bare = collapsed.trim_start_matches(':').trim_start();
    let mut chars = bare.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Returns the file name when `title` lives in a file namespace.
pub fn file_name(title: &str) -> Option<&str> {
    let (namespace, name) = title.trim_start_matches(':').split_once(':')?;
    let namespace = namespace.trim().to_ascii_lowercase();
    FILE_NAMESPACES
        .contains(&namespace.as_str())
        .then(|| name.trim())
}

pub fn is_category(title: &str) -> bool {
    title
        .trim_start_matches(':')
        .split_once(':')
        .is_some_and(|(namespace, _)| namespace.trim().eq_ignore_ascii_case("category"))
}

/// Display options of a `[[File:...|...]]` link.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileLinkOptions {
    pub thumbnail: bool,
    pub width_px: Option<u32>,
    pub caption: Option<String>,
}

impl FileLinkOptions {
    /// Parses the pipe-separated text of a file link.
    ///
    /// The caption is the last part that is not a recognised option.
    pub fn parse(text: Option<&str>) -> Self {
        let mut options = FileLinkOptions::default();
        let Some(text) = text else {
            return options;
        };
        for part in text.split('|').map(str::trim) {
            let lower = part.to_ascii_lowercase();
            if THUMBNAIL_OPTIONS.contains(&lower.as_str()) {
                options.thumbnail = true;
            } else if let Some(width) = parse_width(&lower) {
                options.width_px = Some(width);
            } else if LAYOUT_OPTIONS.contains(&lower.as_str())
                || OPTION_PREFIXES.iter().any(|prefix| lower.starts_with(prefix))
            {
                continue;
            } else if !part.is_empty() {
                options.caption = Some(part.to_string());
            }
        }
        options
    }
}

/// Reads `200px` or `200x150px` into the width in pixels.
fn parse_width(option: &str) -> Option<u32> {
    let size = option.strip_suffix("px")?;
    let width = size.split('x').next()?;
    width.trim().parse().ok()
}

/// URL of a wiki page: spaces become underscores and the title is a single
/// encoded path segment under `prefix`.
pub fn wiki_page_url(prefix: &str, title: &str) -> String {
    prefixed_url(prefix, title)
}

/// Appends `name` to `prefix` as one percent-encoded path segment, with
/// spaces written as underscores.
pub fn prefixed_url(prefix: &str, name: &str) -> String {
    let segment = name.trim().replace(' ', "_");
    match Url::parse(prefix) {
        Ok(mut url) => {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty().push(&segment);
            }
            url.to_string()
        }
        Err(_) => format!("{prefix}{segment}"),
    }
}

pub fn document_url(prefix: &str, document_id: &str) -> String {
    format!("{prefix}{document_id}/edit")
}

pub fn asset_url(prefix: &str, asset_id: &str) -> String {
    format!("{prefix}{asset_id}/view")
}

/// Link used until the target has a document of its own.
pub fn placeholder_url(scheme: &str, title: &str) -> String {
    format!("{scheme}://{title}")
}

/// Title carried by a placeholder link, if `url` is one.
pub fn placeholder_title<'a>(scheme: &str, url: &'a str) -> Option<&'a str> {
    url.strip_prefix(scheme)?.strip_prefix("://")
}
