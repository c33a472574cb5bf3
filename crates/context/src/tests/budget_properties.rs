//! Property tests for budget and ordering invariants.

use crate::assemble::Assembler;
use crate::score::score_units;
use crate::segment::segment;
use crate::select::select;
use crate::types::{Budget, Document};
use intexta_core::text::char_len;
use proptest::prelude::*;

fn arb_documents() -> impl Strategy<Value = Vec<Document>> {
    prop::collection::vec(
        ("[a-z]{1,12}", "[a-zA-Z0-9áéíóúñ \n.,]{0,3000}"),
        0..5,
    )
    .prop_map(|docs| {
        docs.into_iter()
            .enumerate()
            .map(|(i, (name, text))| Document::new(i.to_string(), format!("{}.txt", name), text))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_assembled_context_fits_budget(
        budget in 0usize..6000,
        floor in 0usize..800,
        query in proptest::option::of("[a-zA-Záéíóúñ ]{0,30}"),
        documents in arb_documents(),
    ) {
        let context = Assembler::new(Budget::new(budget, floor))
            .assemble(&documents, query.as_deref());
        prop_assert!(
            context.char_len() <= budget,
            "assembled {} chars for budget {}",
            context.char_len(),
            budget
        );
    }

    #[test]
    fn prop_selection_preserves_document_order(
        text in "[a-z \n]{0,4000}",
        budget in 0usize..3000,
    ) {
        let units = segment(&text);
        let terms = vec!["abc".to_string(), "xy".to_string()];
        let scored = score_units(&units, &terms);
        let selected = select(&scored, budget);
        prop_assert!(selected.windows(2).all(|w| w[0].index < w[1].index));
        let joined_len: usize = selected.iter().map(|s| char_len(&s.text)).sum::<usize>()
            + 2 * selected.len().saturating_sub(1);
        prop_assert!(joined_len <= budget);
    }
}
