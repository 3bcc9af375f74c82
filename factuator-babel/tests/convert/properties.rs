use crate::common::convert;
use factuator_babel::common::assemble::{backward, BODY_ANCHOR};
use factuator_babel::common::state::ConversionState;
use factuator_babel::ir::operations::OpItem;
use factuator_babel::Mappings;
use proptest::prelude::*;

const MARKUP: &str = "[a-zA-Z =*#'\\[\\]{}|!:<>&;/\n-]{0,160}";

proptest! {
    #[test]
    fn test_conversion_is_deterministic(markup in MARKUP) {
        let mappings = Mappings::default();
        let first = convert(&markup, &mappings);
        let second = convert(&markup, &mappings);
        prop_assert_eq!(first.requests(), second.requests());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_backward_is_an_involution(markup in MARKUP) {
        let operations = convert(&markup, &Mappings::default()).operations;
        prop_assert_eq!(backward(backward(operations.clone())), operations);
    }

    #[test]
    fn test_top_level_operations_target_the_body_anchor(markup in MARKUP) {
        let operations = convert(&markup, &Mappings::default()).operations;
        for item in &operations {
            match item {
                OpItem::Single(op) => prop_assert_eq!(op.index, BODY_ANCHOR),
                OpItem::Group(group) => prop_assert!(matches!(
                    group.first(),
                    Some(OpItem::Single(op)) if op.index == BODY_ANCHOR
                )),
            }
        }
    }

    #[test]
    fn test_double_toggle_restores_state(
        bold in any::<bool>(),
        italic in any::<bool>(),
        toggle_bold in any::<bool>(),
        toggle_italic in any::<bool>(),
    ) {
        let state = ConversionState::body(11.0).toggled(bold, italic);
        prop_assert_eq!(
            state.toggled(toggle_bold, toggle_italic).toggled(toggle_bold, toggle_italic),
            state
        );
    }
}
