use crate::common::MemoryService;
use factuator_babel::ir::document::Document;
use factuator_babel::ir::requests::Request;
use factuator_babel::relink::relink_document;
use factuator_babel::{ConvertOptions, Mappings};

fn fetched_document() -> Document {
    serde_json::from_value(serde_json::json!({
        "documentId": "doc-a",
        "body": {"content": [
            {"endIndex": 1, "sectionBreak": {}},
            {"startIndex": 1, "endIndex": 30, "paragraph": {"elements": [
                {"startIndex": 1, "endIndex": 10, "textRun": {"content": "Links to "}},
                {"startIndex": 10, "endIndex": 14, "textRun": {
                    "content": "Beta",
                    "textStyle": {"link": {"url": "internal://Beta"}}
                }},
                {"startIndex": 14, "endIndex": 21, "textRun": {
                    "content": "Nowhere",
                    "textStyle": {"link": {"url": "internal://Nowhere"}}
                }},
                {"startIndex": 21, "endIndex": 30, "textRun": {
                    "content": "Heading",
                    "textStyle": {"link": {"headingId": "h.123"}}
                }}
            ]}}
        ]}
    }))
    .expect("document json")
}

#[test]
fn test_relink_updates_links_that_now_resolve() {
    let mut mappings = Mappings::default();
    mappings.add("Beta", "doc-b");
    let mut service = MemoryService::with_documents([fetched_document()]);

    let updated = relink_document(&mut service, "doc-a", &mappings, &ConvertOptions::default())
        .expect("relink");
    assert_eq!(updated, 1);

    let batches = service.batches_for("doc-a");
    assert_eq!(batches.len(), 1);
    match batches[0].requests.as_slice() {
        [Request::UpdateTextStyle(update)] => {
            assert_eq!((update.range.start_index, update.range.end_index), (10, 14));
            assert_eq!(update.fields, "link");
            assert_eq!(
                update.text_style.link.as_ref().map(|link| link.url.as_str()),
                Some("https://docs.google.com/document/d/doc-b/edit")
            );
        }
        other => panic!("expected one link update, got {other:?}"),
    }
}

#[test]
fn test_relink_without_matches_sends_nothing() {
    let mut service = MemoryService::with_documents([fetched_document()]);
    let updated = relink_document(
        &mut service,
        "doc-a",
        &Mappings::default(),
        &ConvertOptions::default(),
    )
    .expect("relink");
    assert_eq!(updated, 0);
    assert!(service.batches.is_empty());
}
