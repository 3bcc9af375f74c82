//! Shared helpers: an in-memory document service and conversion shortcuts.
#![allow(dead_code)]

use factuator_babel::assets::NoAssets;
use factuator_babel::driver::DocumentService;
use factuator_babel::ir::document::{Body, Document, StructuralElement};
use factuator_babel::ir::operations::{OpItem, Operation};
use factuator_babel::ir::requests::BatchUpdate;
use factuator_babel::{convert_page, ConvertError, ConvertOptions, Mappings, PageConversion, Translator};
use std::collections::BTreeMap;

/// Options without the title and source link, so tests see page content only.
pub fn content_only() -> ConvertOptions {
    ConvertOptions {
        include_title: false,
        include_source_link: false,
        ..ConvertOptions::default()
    }
}

pub fn convert(markup: &str, mappings: &Mappings) -> PageConversion {
    let options = content_only();
    let translator = Translator::new(&options, mappings, &NoAssets);
    convert_page("Test page", markup, &translator)
}

/// Top-level single operations, groups skipped.
pub fn singles(list: &[OpItem]) -> Vec<&Operation> {
    list.iter()
        .filter_map(|item| match item {
            OpItem::Single(op) => Some(op),
            OpItem::Group(_) => None,
        })
        .collect()
}

pub fn document_ending_at(document_id: &str, end_index: usize) -> Document {
    Document {
        document_id: document_id.to_string(),
        body: Body {
            content: vec![StructuralElement {
                start_index: 0,
                end_index,
                ..StructuralElement::default()
            }],
        },
        ..Document::default()
    }
}

/// Records every batch; can be told to fail a given call.
#[derive(Debug, Default)]
pub struct MemoryService {
    pub documents: BTreeMap<String, Document>,
    pub batches: Vec<(String, BatchUpdate)>,
    /// 1-based number of the `batch_update` call that fails.
    pub fail_on_call: Option<usize>,
    calls: usize,
}

impl MemoryService {
    pub fn with_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        MemoryService {
            documents: documents
                .into_iter()
                .map(|doc| (doc.document_id.clone(), doc))
                .collect(),
            ..MemoryService::default()
        }
    }

    pub fn batches_for(&self, document_id: &str) -> Vec<&BatchUpdate> {
        self.batches
            .iter()
            .filter(|(id, _)| id == document_id)
            .map(|(_, batch)| batch)
            .collect()
    }
}

impl DocumentService for MemoryService {
    fn get_document(&self, document_id: &str) -> Result<Document, ConvertError> {
        self.documents
            .get(document_id)
            .cloned()
            .ok_or_else(|| ConvertError::Service(format!("no document {document_id}")))
    }

    fn batch_update(&mut self, document_id: &str, batch: &BatchUpdate) -> Result<(), ConvertError> {
        self.calls += 1;
        if self.fail_on_call == Some(self.calls) {
            return Err(ConvertError::Service("invalid request".to_string()));
        }
        self.batches.push((document_id.to_string(), batch.clone()));
        Ok(())
    }
}
