//! Plain text rendering of ADF trees
//!
//! Turns a document (typically one received from the platform) into text a
//! person or a language model can read. The output is legible, not
//! reversible: marks are dropped, lists are flattened to `- ` lines and
//! tables to `a | b` rows.
//!
//! Rendering never fails. Known nodes kept raw for their extra attributes
//! render like their typed form. Node kinds this crate does not model are
//! rendered from their `text` attribute when they have one and otherwise by
//! walking their children.

use crate::adf::{Block, Document, Inline, RawNode};
use crate::error::FormatError;
use crate::format::Format;
use std::borrow::Cow;

const BLOCK_SEPARATOR: &str = "\n\n";

/// Render a document as plain text.
pub fn render(doc: &Document) -> String {
    render_blocks(&doc.content)
}

fn render_blocks(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Paragraph(paragraph) => render_inlines(&paragraph.content),
        Block::Heading(heading) => render_inlines(&heading.content) + "\n",
        Block::CodeBlock(code) => format!(
            "```{}\n{}\n```",
            code.language.as_deref().unwrap_or(""),
            code.text
        ),
        Block::BulletList(items) | Block::OrderedList(items) => list_lines(items).join("\n"),
        Block::ListItem(_) => list_lines(std::slice::from_ref(block)).join("\n"),
        Block::Table(rows) => rows
            .iter()
            .map(|row| render_row(&typed(row)))
            .collect::<Vec<_>>()
            .join("\n"),
        Block::TableRow(_) => render_row(block),
        Block::Blockquote(content)
        | Block::TableHeader(content)
        | Block::TableCell(content) => render_blocks(content),
        Block::Panel(panel) => render_blocks(&panel.content),
        Block::Expand(expand) => match &expand.title {
            Some(title) if expand.content.is_empty() => title.clone(),
            Some(title) => format!("{title}\n{}", render_blocks(&expand.content)),
            None => render_blocks(&expand.content),
        },
        Block::Rule => "---".to_string(),
        Block::MediaSingle(single) => media_placeholder(&single.media.id),
        Block::Unknown(raw) => match raw.modelled_view() {
            Some(block) => render_block(&block),
            None => render_raw(raw),
        },
    }
}

/// `block`, or the typed reading of a raw node that has one.
fn typed(block: &Block) -> Cow<'_, Block> {
    match block {
        Block::Unknown(raw) => raw
            .modelled_view()
            .map_or(Cow::Borrowed(block), Cow::Owned),
        _ => Cow::Borrowed(block),
    }
}

/// One `- ` line per item. Nested lists are flattened into the same run.
fn list_lines(items: &[Block]) -> Vec<String> {
    let mut lines = Vec::new();
    for item in items {
        let item = typed(item);
        let children = match item.as_ref() {
            Block::ListItem(children) => children.as_slice(),
            other => std::slice::from_ref(other),
        };
        if children.is_empty() {
            lines.push("- ".to_string());
        }
        for child in children {
            let child = typed(child);
            match child.as_ref() {
                Block::BulletList(nested) | Block::OrderedList(nested) => {
                    lines.extend(list_lines(nested))
                }
                other => lines.push(format!("- {}", render_block(other))),
            }
        }
    }
    lines
}

fn render_row(row: &Block) -> String {
    row.children()
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join(" | ")
}

fn render_inlines(inlines: &[Inline]) -> String {
    inlines.iter().map(render_inline).collect()
}

fn render_inline(inline: &Inline) -> String {
    match inline {
        Inline::Text(text) => text.text.clone(),
        Inline::Media(media) => media_placeholder(&media.id),
        Inline::Unknown(raw) => render_raw(raw),
    }
}

fn media_placeholder(id: &str) -> String {
    format!("[media: {id}]")
}

/// Render a node this crate keeps in wire form.
fn render_raw(raw: &RawNode) -> String {
    match raw.kind.as_str() {
        "hardBreak" => return "\n".to_string(),
        "mention" | "status" => {
            if let Some(text) = raw.attr_str("text") {
                return text.to_string();
            }
        }
        "emoji" => {
            if let Some(text) = raw.attr_str("text").or_else(|| raw.attr_str("shortName")) {
                return text.to_string();
            }
        }
        "inlineCard" | "blockCard" | "embedCard" => {
            if let Some(url) = raw.attr_str("url") {
                return url.to_string();
            }
        }
        "media" | "mediaInline" => {
            if let Some(id) = raw.attr_str("id") {
                return media_placeholder(id);
            }
        }
        _ => {}
    }

    if let Some(text) = &raw.text {
        return text.clone();
    }

    if !raw.content.is_empty() && raw.content.iter().all(RawNode::is_inline_kind) {
        return raw
            .content
            .iter()
            .map(|child| render_inline(&Inline::from(child.clone())))
            .collect();
    }

    raw.content
        .iter()
        .map(|child| {
            if child.is_inline_kind() {
                render_inline(&Inline::from(child.clone()))
            } else {
                render_block(&Block::from(child.clone()))
            }
        })
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

/// Format implementation for plain text output
pub struct TextFormat;

impl Format for TextFormat {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Plain text rendering of an ADF document"
    }

    fn file_extensions(&self) -> &[&str] {
        &["txt"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(render(doc))
    }
}
