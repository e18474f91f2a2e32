//! Icon mapping for the tree visualization format

/// Get the Unicode icon for a wire node kind.
///
/// Kinds this crate does not model share the `○` fallback.
pub fn get_icon(kind: &str) -> &'static str {
    match kind {
        "doc" => "⧉",
        "paragraph" => "¶",
        "heading" => "§",
        "text" => "◦",
        "codeBlock" => "𝒱",
        "bulletList" | "orderedList" => "☰",
        "listItem" => "•",
        "blockquote" => "❝",
        "rule" => "⎯",
        "table" => "▦",
        "tableRow" => "⊟",
        "tableHeader" => "⊤",
        "tableCell" => "□",
        "panel" => "ⓘ",
        "expand" => "▸",
        "mediaSingle" | "media" => "▣",
        _ => "○",
    }
}
