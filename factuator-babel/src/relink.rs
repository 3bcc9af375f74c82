//! Post-hoc repair of placeholder links.
//!
//! Pages converted before their link targets had documents carry placeholder
//! links. Once more pages are converted, those links can point at the real
//! documents. Restyling a link changes no text, so the repairs never shift
//! indices and can be sent in any order.

use crate::common::links::{asset_url, document_url, file_name, placeholder_title};
use crate::driver::{submit, DocumentService, SubmitMode};
use crate::error::ConvertError;
use crate::ir::document::Document;
use crate::ir::operations::{Operation, OperationKind};
use crate::mappings::Mappings;
use crate::options::ConvertOptions;

/// `SetLinkStyle` operations for every placeholder link that now resolves.
pub fn relink(document: &Document, mappings: &Mappings, options: &ConvertOptions) -> Vec<Operation> {
    let mut operations = Vec::new();
    document.for_each_run(|item, run| {
        let Some(url) = run.text_style.link.as_ref().and_then(|link| link.url.as_deref()) else {
            return;
        };
        let Some(title) = placeholder_title(&options.placeholder_scheme, url) else {
            return;
        };
        let Some(resolved) = resolve(title, mappings, options) else {
            log::debug!("{title} still has no destination");
            return;
        };
        operations.push(Operation::new(
            item.start_index,
            OperationKind::SetLinkStyle {
                start: item.start_index,
                end: item.end_index,
                url: resolved,
            },
        ));
    });
    operations
}

fn resolve(title: &str, mappings: &Mappings, options: &ConvertOptions) -> Option<String> {
    match file_name(title) {
        Some(file) => mappings
            .asset_for(file)
            .map(|id| asset_url(&options.asset_prefix, id)),
        None => mappings
            .document_for(title)
            .map(|id| document_url(&options.document_prefix, id)),
    }
}

/// Fetches `document_id`, repairs what can be repaired and returns the number
/// of links updated.
pub fn relink_document<S: DocumentService + ?Sized>(
    service: &mut S,
    document_id: &str,
    mappings: &Mappings,
    options: &ConvertOptions,
) -> Result<usize, ConvertError> {
    let document = service.get_document(document_id)?;
    let operations = relink(&document, mappings, options);
    if operations.is_empty() {
        return Ok(0);
    }
    log::info!("{document_id}: updating {} link(s)", operations.len());
    let requests = operations.iter().flat_map(Operation::to_requests).collect();
    submit(service, document_id, requests, SubmitMode::Batch)?;
    Ok(operations.len())
}
