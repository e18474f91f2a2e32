//! Mark composition.
//!
//! The platform rejects any text node that combines `code` with another mark,
//! so outer decorations are composed onto already-parsed inner content and
//! skip every node that carries `code`. Because inner spans are parsed first,
//! the rule holds however deeply delimiters nest.

use crate::adf::{Inline, Mark};

/// Prepend `mark` to every text node in `nodes`.
///
/// Nodes that already carry `code`, or a mark of the same kind, are passed
/// through unchanged. Non-text nodes are passed through as well.
pub fn add_mark(nodes: Vec<Inline>, mark: Mark) -> Vec<Inline> {
    nodes
        .into_iter()
        .map(|node| match node {
            Inline::Text(mut text) => {
                if !text.has_mark_kind("code") && !text.has_mark_kind(mark.kind()) {
                    text.marks.insert(0, mark.clone());
                }
                Inline::Text(text)
            }
            other => other,
        })
        .collect()
}

/// True when no text node combines `code` with another mark.
pub fn code_marks_are_exclusive(nodes: &[Inline]) -> bool {
    nodes.iter().filter_map(Inline::as_text).all(|text| {
        !text.has_mark_kind("code") || text.marks.len() == 1
    })
}
