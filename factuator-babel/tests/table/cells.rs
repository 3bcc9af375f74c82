use crate::common::convert;
use factuator_babel::common::table::cell_index;
use factuator_babel::ir::operations::{FontRange, OpItem, Operation, OperationKind};
use factuator_babel::ir::requests::Request;
use factuator_babel::Mappings;

const TABLE: &str = "{| class=\"wikitable\"
! Rule !! Where
|-
| '''Gloves''' || [[Lab rules|the rules]]
|}
";

fn table_group(markup: &str, mappings: &Mappings) -> Vec<OpItem> {
    let page = convert(markup, mappings);
    assert_eq!(page.operations.len(), 1, "expected a single table group");
    match page.operations.into_iter().next() {
        Some(OpItem::Group(group)) => group,
        other => panic!("expected a group, got {other:?}"),
    }
}

fn cell(item: &OpItem) -> Vec<&Operation> {
    match item {
        OpItem::Group(ops) => ops
            .iter()
            .map(|op| match op {
                OpItem::Single(op) => op,
                OpItem::Group(_) => panic!("unexpected nested group"),
            })
            .collect(),
        OpItem::Single(op) => panic!("expected a cell group, got {op:?}"),
    }
}

#[test]
fn test_table_group_sizes_table_and_fills_last_cell_first() {
    let mut mappings = Mappings::default();
    mappings.add("Lab rules", "doc-7");
    let group = table_group(TABLE, &mappings);

    match &group[0] {
        OpItem::Single(op) => assert_eq!(
            op.kind,
            OperationKind::InsertTable {
                rows: 2,
                columns: 2,
                font_range: FontRange {
                    start: 2,
                    end: 13,
                    size_pt: 8.0,
                },
            }
        ),
        other => panic!("expected the table insert first, got {other:?}"),
    }

    let anchors: Vec<usize> = group[1..].iter().map(|item| cell(item)[0].index).collect();
    assert_eq!(
        anchors,
        vec![
            cell_index(1, 2, 1, 1),
            cell_index(1, 2, 1, 0),
            cell_index(1, 2, 0, 1),
            cell_index(1, 2, 0, 0),
        ]
    );
    assert_eq!(anchors, vec![12, 10, 7, 5]);
}

#[test]
fn test_pipe_bearing_link_stays_in_its_cell() {
    let mut mappings = Mappings::default();
    mappings.add("Lab rules", "doc-7");
    let group = table_group(TABLE, &mappings);

    let last_cell = cell(&group[1]);
    assert_eq!(last_cell.len(), 1);
    assert_eq!(
        last_cell[0].kind,
        OperationKind::InsertLink {
            text: "the rules".to_string(),
            url: "https://docs.google.com/document/d/doc-7/edit".to_string(),
            style: factuator_babel::ir::operations::TextStyle::plain(8.0),
        }
    );
}

#[test]
fn test_cells_start_from_fresh_state() {
    let group = table_group(TABLE, &Mappings::default());
    let gloves = cell(&group[2]);
    assert!(matches!(
        &gloves[0].kind,
        OperationKind::InsertText { text, style }
            if text == "Gloves" && style.bold && style.font_size_pt == 8.0
    ));
    let header = cell(&group[4]);
    assert!(matches!(
        &header[0].kind,
        OperationKind::InsertText { text, style } if text == "Rule" && !style.bold
    ));
}

#[test]
fn test_cell_content_keeps_its_internal_order() {
    let markup = "{|\n| one '''two''' three\n|}\n";
    let page = convert(markup, &Mappings::default());
    let requests = page.requests();

    let inserted: Vec<(usize, &str)> = requests
        .iter()
        .filter_map(|request| match request {
            Request::InsertText(insert) => Some((insert.location.index, insert.text.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(
        inserted,
        vec![(5, " three"), (5, "two"), (5, "one ")]
    );
    assert!(matches!(&requests[0], Request::InsertTable(table) if table.rows == 1 && table.columns == 1));
}

#[test]
fn test_nested_table_is_laid_out_at_its_cell() {
    let markup = "{|\n| outer\n|-\n|\n{|\n| inner\n|}\n|}\n";
    let group = table_group(markup, &Mappings::default());
    let outer_index = cell_index(1, 1, 1, 0);

    let nested = match &group[1] {
        OpItem::Group(items) => items,
        other => panic!("expected the second row's cell, got {other:?}"),
    };
    let inner_table = match &nested[0] {
        OpItem::Group(inner) => inner,
        other => panic!("expected the nested table group, got {other:?}"),
    };
    match &inner_table[0] {
        OpItem::Single(op) => {
            assert_eq!(op.index, outer_index);
            assert!(matches!(op.kind, OperationKind::InsertTable { rows: 1, columns: 1, .. }));
        }
        other => panic!("expected the nested table insert, got {other:?}"),
    }
}
