use crate::common::{content_only, convert, singles};
use factuator_babel::assets::{AssetSource, DirectoryAssets, NoAssets};
use factuator_babel::ir::operations::OperationKind;
use factuator_babel::{convert_page, Mappings, PageConversion, Translator};

fn link_of(page: &PageConversion) -> (String, String) {
    singles(&page.operations)
        .into_iter()
        .find_map(|op| match &op.kind {
            OperationKind::InsertLink { text, url, .. } => Some((text.clone(), url.clone())),
            _ => None,
        })
        .expect("page to contain a link")
}

fn convert_with_assets(markup: &str, mappings: &Mappings, assets: &dyn AssetSource) -> PageConversion {
    let options = content_only();
    let translator = Translator::new(&options, mappings, assets);
    convert_page("Test page", markup, &translator)
}

#[test]
fn test_mapped_link_points_at_document() {
    let mut mappings = Mappings::default();
    mappings.add("Lab rules", "doc-42");
    let page = convert("See [[Lab rules]].", &mappings);

    assert_eq!(
        link_of(&page),
        (
            "Lab rules".to_string(),
            "https://docs.google.com/document/d/doc-42/edit".to_string()
        )
    );
    assert!(page.linked_titles.contains("Lab rules"));
}

#[test]
fn test_unmapped_link_uses_placeholder_scheme() {
    let page = convert("[[Unknown page|elsewhere]]", &Mappings::default());
    assert_eq!(
        link_of(&page),
        ("elsewhere".to_string(), "internal://Unknown page".to_string())
    );
    assert!(page.linked_titles.is_empty());
}

#[test]
fn test_link_targets_are_normalised_before_lookup() {
    let mut mappings = Mappings::default();
    mappings.add("Lab rules", "doc-42");
    let page = convert("[[lab_rules#Gloves|gloves]]", &mappings);
    assert_eq!(link_of(&page).1, "https://docs.google.com/document/d/doc-42/edit");
}

#[test]
fn test_external_link_falls_back_to_url() {
    let page = convert("[https://example.org/sds]", &Mappings::default());
    assert_eq!(
        link_of(&page),
        ("https://example.org/sds".to_string(), "https://example.org/sds".to_string())
    );

    let page = convert("[https://example.org/sds data sheets]", &Mappings::default());
    assert_eq!(link_of(&page).0, "data sheets");
}

#[test]
fn test_thumbnail_embeds_image_with_caption() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("Gel_scan.png"), b"png").expect("write image");
    let assets = DirectoryAssets::new(dir.path(), "https://files.example.org/");

    let page = convert_with_assets(
        "[[File:Gel scan.png|thumb|200px|Stained gel]]",
        &Mappings::default(),
        &assets,
    );
    let ops = singles(&page.operations);
    assert_eq!(ops.len(), 2);
    assert_eq!(
        ops[0].kind,
        OperationKind::InsertImage {
            uri: "https://files.example.org/Gel_scan.png".to_string(),
            width_pt: 150.0,
            height_pt: 150.0,
        }
    );
    assert!(matches!(
        &ops[1].kind,
        OperationKind::InsertText { text, style } if text == "\nStained gel\n" && style.italic
    ));
}

#[test]
fn test_failed_embed_degrades_to_asset_link() {
    let mut mappings = Mappings::default();
    mappings.add_file("Gel scan.png", "asset-1");
    let page = convert_with_assets(
        "[[File:Gel scan.png|thumb|Stained gel]]",
        &mappings,
        &NoAssets,
    );
    assert_eq!(
        link_of(&page),
        (
            "Stained gel".to_string(),
            "https://drive.google.com/file/d/asset-1/view".to_string()
        )
    );
}

#[test]
fn test_non_image_file_links_to_placeholder() {
    let page = convert("[[Media:Notes.pdf]]", &Mappings::default());
    assert_eq!(
        link_of(&page),
        ("Notes.pdf".to_string(), "internal://Media:Notes.pdf".to_string())
    );
}
