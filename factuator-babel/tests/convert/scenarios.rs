use crate::common::{content_only, convert, singles};
use factuator_babel::assets::NoAssets;
use factuator_babel::ir::operations::{OpItem, OperationKind, TextStyle};
use factuator_babel::ir::requests::{NamedStyle, Request};
use factuator_babel::translate::TABLE_FAILED_TEXT;
use factuator_babel::{convert_page, ConvertOptions, Mappings, Translator};

#[test]
fn test_heading_bullet_and_text_in_document_order() {
    let page = convert("== Title ==\n* first\nsecond\n", &Mappings::default());
    let kinds: Vec<_> = singles(&page.operations)
        .into_iter()
        .map(|op| {
            assert_eq!(op.index, 1);
            op.kind.clone()
        })
        .collect();

    assert_eq!(
        kinds,
        vec![
            OperationKind::InsertHeadingText {
                text: "Title\n".to_string(),
                style: NamedStyle::Heading2,
            },
            OperationKind::InsertBulletText {
                text: "first\n".to_string(),
                level: 1,
                numeric: false,
                style: TextStyle::plain(11.0),
            },
            OperationKind::InsertText {
                text: "second\n".to_string(),
                style: TextStyle::plain(11.0),
            },
        ]
    );
}

#[test]
fn test_requests_replay_last_operation_first() {
    let page = convert("== Title ==\n* first\nsecond\n", &Mappings::default());
    let requests = page.requests();
    assert_eq!(requests.len(), 9);

    let inserted: Vec<&str> = requests
        .iter()
        .filter_map(|request| match request {
            Request::InsertText(insert) => Some(insert.text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(inserted, vec!["second\n", "first\n", "Title\n"]);

    // The heading is applied last and styles only its own paragraph.
    match &requests[8] {
        Request::UpdateParagraphStyle(update) => {
            assert_eq!(update.range.start_index, 1);
            assert_eq!(update.range.end_index, 7);
            assert_eq!(update.paragraph_style.named_style_type, NamedStyle::Heading2);
        }
        other => panic!("expected the heading style, got {other:?}"),
    }
}

/// `(start, end, style)` of every paragraph style request, in submission order.
fn paragraph_styles(requests: &[Request]) -> Vec<(usize, usize, NamedStyle)> {
    requests
        .iter()
        .filter_map(|request| match request {
            Request::UpdateParagraphStyle(update) => Some((
                update.range.start_index,
                update.range.end_index,
                update.paragraph_style.named_style_type,
            )),
            _ => None,
        })
        .collect()
}

#[test]
fn test_adjacent_headings_keep_their_own_styles() {
    let page = convert("== A ==\n=== B ===\n", &Mappings::default());
    let requests = page.requests();
    assert_eq!(requests.len(), 4);
    assert!(matches!(&requests[0], Request::InsertText(t) if t.text == "B\n"));
    assert!(matches!(&requests[2], Request::InsertText(t) if t.text == "A\n"));
    // Each style covers only the text just inserted at the anchor, so B is
    // never restyled once A pushes it to [3, 5).
    assert_eq!(
        paragraph_styles(&requests),
        vec![(1, 3, NamedStyle::Heading3), (1, 3, NamedStyle::Heading2)]
    );
}

#[test]
fn test_bullet_before_heading_gets_normal_paragraph() {
    let page = convert("* item\n== H ==\n", &Mappings::default());
    let requests = page.requests();
    assert!(matches!(&requests[0], Request::InsertText(t) if t.text == "H\n"));
    assert_eq!(
        paragraph_styles(&requests),
        vec![(1, 3, NamedStyle::Heading2), (1, 6, NamedStyle::NormalText)]
    );

    let bullets = requests
        .iter()
        .position(|request| matches!(request, Request::CreateParagraphBullets(_)))
        .expect("bullet request");
    let item_style = requests
        .iter()
        .position(|request| {
            matches!(request, Request::UpdateParagraphStyle(update)
                if update.paragraph_style.named_style_type == NamedStyle::NormalText)
        })
        .expect("item paragraph style");
    assert!(item_style < bullets);
}

#[test]
fn test_heading_levels_follow_delimiter_count() {
    for level in 1..=6 {
        let marks = "=".repeat(level);
        let markup = format!("{marks} ''Styled'' name {marks}\n");
        let page = convert(&markup, &Mappings::default());
        let ops = singles(&page.operations);
        assert_eq!(ops.len(), 1, "level {level}");
        assert_eq!(
            ops[0].kind,
            OperationKind::InsertHeadingText {
                text: "Styled name\n".to_string(),
                style: NamedStyle::heading(level),
            }
        );
    }

    let page = convert("======== Deep ========\n", &Mappings::default());
    assert!(matches!(
        &singles(&page.operations)[0].kind,
        OperationKind::InsertHeadingText { style: NamedStyle::Heading6, .. }
    ));
}

#[test]
fn test_title_and_source_link_open_the_page() {
    let options = ConvertOptions {
        wiki_page_prefix: "https://wiki.example.org/index.php/".to_string(),
        ..ConvertOptions::default()
    };
    let mappings = Mappings::default();
    let translator = Translator::new(&options, &mappings, &NoAssets);
    let page = convert_page("Lab safety", "Body text\n", &translator);
    let ops = singles(&page.operations);

    assert_eq!(
        ops[0].kind,
        OperationKind::InsertHeadingText {
            text: "Lab safety\n".to_string(),
            style: NamedStyle::Title,
        }
    );
    assert!(matches!(
        &ops[1].kind,
        OperationKind::InsertLink { text, url, .. }
            if text == "Original wiki location\n"
                && url == "https://wiki.example.org/index.php/Lab_safety"
    ));
    assert!(matches!(&ops[2].kind, OperationKind::InsertText { text, .. } if text == "Body text\n"));
}

#[test]
fn test_malformed_table_degrades_to_placeholder() {
    let page = convert("{|\nno cells at all\n|}\n", &Mappings::default());
    assert_eq!(page.operations.len(), 1);
    match &page.operations[0] {
        OpItem::Single(op) => assert_eq!(
            op.kind,
            OperationKind::InsertText {
                text: TABLE_FAILED_TEXT.to_string(),
                style: TextStyle::plain(11.0),
            }
        ),
        other => panic!("expected placeholder text, got {other:?}"),
    }
}

#[test]
fn test_fixture_page_converts() {
    let markup = include_str!("../fixtures/lab_safety.wiki");
    let page = convert(markup, &Mappings::default());
    let ops = singles(&page.operations);

    let headings: Vec<_> = ops
        .iter()
        .filter_map(|op| match &op.kind {
            OperationKind::InsertHeadingText { text, style } => Some((text.as_str(), *style)),
            _ => None,
        })
        .collect();
    assert_eq!(
        headings,
        vec![
            ("Before you start\n", NamedStyle::Heading2),
            ("Equipment\n", NamedStyle::Heading3),
        ]
    );

    let bullets: Vec<bool> = ops
        .iter()
        .filter_map(|op| match &op.kind {
            OperationKind::InsertBulletText { numeric, .. } => Some(*numeric),
            _ => None,
        })
        .collect();
    assert_eq!(bullets, vec![false, false, true, true]);

    let groups = page
        .operations
        .iter()
        .filter(|item| matches!(item, OpItem::Group(_)))
        .count();
    assert_eq!(groups, 1);

    assert!(ops.iter().any(|op| matches!(
        &op.kind,
        OperationKind::InsertText { style, text } if style.bold && text == "lab safety"
    )));
    assert!(!ops.iter().any(|op| matches!(
        &op.kind,
        OperationKind::InsertLink { url, .. } if url.contains("Category")
    )));
    assert!(ops.iter().all(|op| !matches!(
        &op.kind,
        OperationKind::InsertText { text, .. } if text.contains("__NOTOC__")
    )));
}

#[test]
fn test_content_only_options_skip_title() {
    let page = convert("", &Mappings::default());
    assert!(page.operations.is_empty());
    assert!(!content_only().include_title);
}
