//! Property tests for mark composition
//!
//! However code spans are nested inside emphasis delimiters, a text node that
//! carries `code` must carry nothing else.

use adf_babel::formats::markdown::marks::code_marks_are_exclusive;
use adf_babel::{markdown_to_adf, Block, Inline, Mark};
use proptest::prelude::*;

/// Markdown spans built from words and code spans wrapped in emphasis.
fn span() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        "[a-z]{1,6}",
        "[a-z]{1,6}".prop_map(|word| format!("`{word}`")),
    ];
    leaf.prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(|s| format!("**{s}**")),
            inner.clone().prop_map(|s| format!("__{s}__")),
            inner.clone().prop_map(|s| format!("~~{s}~~")),
            inner.clone().prop_map(|s| format!("*{s}*")),
            inner.clone().prop_map(|s| format!("_{s}_")),
            prop::collection::vec(inner, 2..4).prop_map(|parts| parts.join(" ")),
        ]
    })
}

fn collect_inlines<'a>(blocks: &'a [Block], out: &mut Vec<&'a Inline>) {
    for block in blocks {
        out.extend(block.inlines());
        collect_inlines(block.children(), out);
    }
}

fn all_inlines(blocks: &[Block]) -> Vec<Inline> {
    let mut refs = Vec::new();
    collect_inlines(blocks, &mut refs);
    refs.into_iter().cloned().collect()
}

proptest! {
    #[test]
    fn code_never_combines_with_other_marks(source in span()) {
        let doc = markdown_to_adf(&source);
        let inlines = all_inlines(&doc.content);
        prop_assert!(
            code_marks_are_exclusive(&inlines),
            "violation for {:?}: {:?}",
            source,
            inlines
        );
    }

    #[test]
    fn wrapped_code_span_stays_code_only(word in "[a-z]{1,6}", depth in 1usize..6) {
        let mut source = format!("`{word}`");
        for level in 0..depth {
            source = match level % 3 {
                0 => format!("**x {source} y**"),
                1 => format!("*x {source} y*"),
                _ => format!("~~x {source} y~~"),
            };
        }
        let doc = markdown_to_adf(&source);
        let inlines = all_inlines(&doc.content);
        let code: Vec<&Inline> = inlines
            .iter()
            .filter(|inline| inline.as_text().is_some_and(|t| t.has_mark_kind("code")))
            .collect();
        prop_assert_eq!(code.len(), 1);
        prop_assert_eq!(code[0], &Inline::marked(word, vec![Mark::Code]));
    }
}
