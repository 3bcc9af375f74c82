//! Submitting converted pages to the destination document service.
//!
//! The service client itself lives outside this crate and plugs in through
//! [`DocumentService`]. A batch is applied atomically by the destination; a
//! failed page is reported and never retried, since replaying positional
//! edits against a document in an unknown state would corrupt it.

use crate::assets::AssetSource;
use crate::common::assemble::BODY_ANCHOR;
use crate::convert::{convert_page, PageConversion};
use crate::error::ConvertError;
use crate::ir::document::Document;
use crate::ir::operations::{Operation, OperationKind};
use crate::ir::requests::{BatchUpdate, Request};
use crate::mappings::Mappings;
use crate::options::ConvertOptions;
use crate::translate::Translator;

/// Client of the destination document service.
pub trait DocumentService {
    fn get_document(&self, document_id: &str) -> Result<Document, ConvertError>;

    /// Applies `batch` atomically.
    fn batch_update(&mut self, document_id: &str, batch: &BatchUpdate) -> Result<(), ConvertError>;

    fn end_index(&self, document_id: &str) -> Result<usize, ConvertError> {
        Ok(self.get_document(document_id)?.end_index())
    }
}

/// How the requests of a page are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitMode {
    /// One atomic batch per page.
    #[default]
    Batch,
    /// One request per call, to pinpoint the request the destination rejects.
    OneByOne,
}

/// A wiki page to convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub markup: String,
}

/// Outcome of a multi-page run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub converted: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<(String, ConvertError)>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Deletes the body of a document, keeping the final paragraph mark the
/// destination requires. Returns whether anything was deleted.
pub fn clear_document<S: DocumentService + ?Sized>(
    service: &mut S,
    document_id: &str,
) -> Result<bool, ConvertError> {
    let end = service.end_index(document_id)?;
    if end <= BODY_ANCHOR + 1 {
        return Ok(false);
    }
    let delete = Operation::new(
        BODY_ANCHOR,
        OperationKind::DeleteRange {
            start: BODY_ANCHOR,
            end: end - 1,
        },
    );
    let batch = BatchUpdate {
        requests: delete.to_requests(),
    };
    service.batch_update(document_id, &batch)?;
    Ok(true)
}

/// Sends `requests` and returns how many service calls were made.
pub fn submit<S: DocumentService + ?Sized>(
    service: &mut S,
    document_id: &str,
    requests: Vec<Request>,
    mode: SubmitMode,
) -> Result<usize, ConvertError> {
    if requests.is_empty() {
        return Ok(0);
    }
    match mode {
        SubmitMode::Batch => {
            service.batch_update(document_id, &BatchUpdate { requests })?;
            Ok(1)
        }
        SubmitMode::OneByOne => {
            let total = requests.len();
            for (position, request) in requests.into_iter().enumerate() {
                log::debug!("{document_id}: request {} of {total}", position + 1);
                let batch = BatchUpdate {
                    requests: vec![request],
                };
                service.batch_update(document_id, &batch).map_err(|err| {
                    ConvertError::Service(format!("request {} of {total}: {err}", position + 1))
                })?;
            }
            Ok(total)
        }
    }
}

/// Replaces the content of `document_id` with the converted page.
pub fn sync_page<S: DocumentService + ?Sized>(
    service: &mut S,
    document_id: &str,
    title: &str,
    markup: &str,
    translator: &Translator,
    mode: SubmitMode,
) -> Result<PageConversion, ConvertError> {
    clear_document(service, document_id)?;
    let conversion = convert_page(title, markup, translator);
    let calls = submit(service, document_id, conversion.requests(), mode)?;
    log::info!(
        "{title}: {} operations sent in {calls} call(s)",
        conversion.operation_count()
    );
    Ok(conversion)
}

/// Converts `pages` one after the other.
///
/// Pages listed as do-not-convert or without a destination document are
/// skipped. A failing page is logged and reported; the run goes on. Backlinks
/// of converted pages are recorded in `mappings`, which the caller persists.
pub fn convert_pages<S: DocumentService + ?Sized>(
    service: &mut S,
    pages: &[Page],
    mappings: &mut Mappings,
    options: &ConvertOptions,
    assets: &dyn AssetSource,
    mode: SubmitMode,
) -> RunReport {
    let mut report = RunReport::default();
    for page in pages {
        if !mappings.should_convert(&page.title) {
            log::info!("{}: marked do-not-convert, skipping", page.title);
            report.skipped.push(page.title.clone());
            continue;
        }
        let Some(document_id) = mappings.document_for(&page.title).map(str::to_string) else {
            log::warn!("{}: no destination document, skipping", page.title);
            report.skipped.push(page.title.clone());
            continue;
        };

        let result = {
            let translator = Translator::new(options, mappings, assets);
            sync_page(service, &document_id, &page.title, &page.markup, &translator, mode)
        };
        match result {
            Ok(conversion) => {
                mappings.record_links(&document_id, &conversion.linked_titles);
                report.converted.push(page.title.clone());
            }
            Err(err) => {
                log::error!("{}: conversion failed: {err}", page.title);
                report.failed.push((page.title.clone(), err));
            }
        }
    }
    report
}
