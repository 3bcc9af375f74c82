use crate::common::{content_only, document_ending_at, MemoryService};
use factuator_babel::assets::NoAssets;
use factuator_babel::driver::{clear_document, convert_pages, sync_page, Page, SubmitMode};
use factuator_babel::ir::requests::Request;
use factuator_babel::{ConvertError, Mappings, Translator};

fn page(title: &str, markup: &str) -> Page {
    Page {
        title: title.to_string(),
        markup: markup.to_string(),
    }
}

#[test]
fn test_clear_keeps_final_paragraph() {
    let mut service = MemoryService::with_documents([document_ending_at("doc-1", 40)]);
    assert!(clear_document(&mut service, "doc-1").expect("clear"));

    let batches = service.batches_for("doc-1");
    match batches[0].requests.as_slice() {
        [Request::DeleteContentRange(delete)] => {
            assert_eq!((delete.range.start_index, delete.range.end_index), (1, 39));
        }
        other => panic!("expected a single delete, got {other:?}"),
    }
}

#[test]
fn test_empty_document_is_not_cleared() {
    let mut service = MemoryService::with_documents([document_ending_at("doc-1", 2)]);
    assert!(!clear_document(&mut service, "doc-1").expect("clear"));
    assert!(service.batches.is_empty());
}

#[test]
fn test_sync_submits_one_atomic_batch() {
    let mut service = MemoryService::with_documents([document_ending_at("doc-1", 10)]);
    let options = content_only();
    let mappings = Mappings::default();
    let translator = Translator::new(&options, &mappings, &NoAssets);

    let conversion = sync_page(
        &mut service,
        "doc-1",
        "Page",
        "== Title ==\n* first\nsecond\n",
        &translator,
        SubmitMode::Batch,
    )
    .expect("sync");

    let batches = service.batches_for("doc-1");
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[1].requests, conversion.requests());
}

#[test]
fn test_one_by_one_mode_reports_failing_request() {
    let mut service = MemoryService::with_documents([document_ending_at("doc-1", 2)]);
    service.fail_on_call = Some(2);
    let options = content_only();
    let mappings = Mappings::default();
    let translator = Translator::new(&options, &mappings, &NoAssets);

    let err = sync_page(
        &mut service,
        "doc-1",
        "Page",
        "first\n",
        &translator,
        SubmitMode::OneByOne,
    )
    .expect_err("second request to fail");
    assert_eq!(
        err,
        ConvertError::Service(
            "request 2 of 3: Document service error: invalid request".to_string()
        )
    );
    assert_eq!(service.batches.len(), 1);
}

#[test]
fn test_run_skips_and_continues_past_failures() {
    let mut mappings = Mappings::default();
    mappings.add("Alpha", "doc-a");
    mappings.add("Beta", "doc-b");
    mappings.add("Sandbox", "doc-s");
    mappings.do_not_convert.insert("Sandbox".to_string());

    // doc-b is missing from the service, so its page fails.
    let mut service = MemoryService::with_documents([
        document_ending_at("doc-a", 2),
        document_ending_at("doc-s", 2),
    ]);
    let pages = vec![
        page("Alpha", "Links to [[Beta]] and [[Nowhere]].\n"),
        page("Beta", "Plain\n"),
        page("Sandbox", "Scratch\n"),
        page("Orphan", "No document\n"),
    ];

    let report = convert_pages(
        &mut service,
        &pages,
        &mut mappings,
        &content_only(),
        &NoAssets,
        SubmitMode::Batch,
    );

    assert_eq!(report.converted, vec!["Alpha".to_string()]);
    assert_eq!(report.skipped, vec!["Sandbox".to_string(), "Orphan".to_string()]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "Beta");
    assert!(!report.is_success());

    assert!(mappings.backlinks["doc-b"].contains("doc-a"));
    assert!(service.batches_for("doc-s").is_empty());
}
