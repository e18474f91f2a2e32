//! Treeviz formatter for ADF trees
//!
//! Treeviz is a visual representation of the tree, meant for checking what the
//! markdown parser produced or what the platform sent back before rendering
//! it. Each node is one line:
//!
//! <indentation>(per level) <connector> <icon><space><label> (truncated)
//!
//! Example:
//!
//! ⧉ Document (2 blocks)
//! ├─ § h1 Title
//! │ └─ ◦ Title
//! └─ ¶ Hello world
//!   ├─ ◦ Hello
//!   └─ ◦ world [strong]
//!
//! Icons are listed in [`super::icons`]. Known nodes kept in wire form for
//! their extra attributes are drawn like their typed form; other wire nodes
//! show their `type` as label and are walked through their raw children.
//!
//! Parameters:
//!
//! - `show-marks` (default `true`): append the mark names to text labels
//! - `label-width` (default `30`): maximum label length before truncation

use super::icons::get_icon;
use crate::adf::{Block, Document, Inline, RawNode};
use crate::error::FormatError;
use crate::format::{bool_option, check_known_options, Format};
use std::collections::HashMap;

const KNOWN_OPTIONS: &[&str] = &["show-marks", "label-width"];

/// Options for [`to_treeviz_str_with_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreevizOptions {
    pub show_marks: bool,
    pub label_width: usize,
}

impl Default for TreevizOptions {
    fn default() -> Self {
        TreevizOptions {
            show_marks: true,
            label_width: 30,
        }
    }
}

impl TreevizOptions {
    /// Read options from `--extra-*` style parameters, starting from `self`.
    pub fn with_params(self, params: &HashMap<String, String>) -> Result<Self, FormatError> {
        check_known_options("treeviz", params, KNOWN_OPTIONS)?;
        let show_marks = bool_option(params, "show-marks", self.show_marks)?;
        let label_width = match params.get("label-width") {
            Some(raw) => raw.parse::<usize>().map_err(|_| {
                FormatError::NotSupported(format!(
                    "Invalid value '{raw}' for option 'label-width'"
                ))
            })?,
            None => self.label_width,
        };
        Ok(TreevizOptions {
            show_marks,
            label_width,
        })
    }
}

/// A node as shown in the tree.
struct Entry {
    kind: String,
    label: String,
    suffix: String,
    children: Vec<Entry>,
}

impl Entry {
    fn new(kind: &str, label: impl Into<String>) -> Self {
        Entry {
            kind: kind.to_string(),
            label: label.into(),
            suffix: String::new(),
            children: Vec::new(),
        }
    }

    fn with_children(mut self, children: Vec<Entry>) -> Self {
        self.children = children;
        self
    }
}

fn plain_text(inlines: &[Inline]) -> String {
    inlines.iter().map(Inline::plain_text).collect()
}

fn first_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .find_map(|block| match block {
            Block::Paragraph(paragraph) => Some(plain_text(&paragraph.content)),
            _ => None,
        })
        .unwrap_or_default()
}

fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

fn block_entries(blocks: &[Block], options: &TreevizOptions) -> Vec<Entry> {
    blocks.iter().map(|block| block_entry(block, options)).collect()
}

fn inline_entries(inlines: &[Inline], options: &TreevizOptions) -> Vec<Entry> {
    inlines
        .iter()
        .map(|inline| inline_entry(inline, options))
        .collect()
}

fn block_entry(block: &Block, options: &TreevizOptions) -> Entry {
    let kind = block.kind();
    match block {
        Block::Paragraph(paragraph) => Entry::new(kind, plain_text(&paragraph.content))
            .with_children(inline_entries(&paragraph.content, options)),
        Block::Heading(heading) => Entry::new(
            kind,
            format!("h{} {}", heading.level, plain_text(&heading.content)),
        )
        .with_children(inline_entries(&heading.content, options)),
        Block::CodeBlock(code) => Entry::new(
            kind,
            format!(
                "{} ({})",
                code.language.as_deref().unwrap_or("plain"),
                count(code.text.lines().count(), "line")
            ),
        ),
        Block::BulletList(items) | Block::OrderedList(items) => {
            Entry::new(kind, count(items.len(), "item"))
                .with_children(block_entries(items, options))
        }
        Block::ListItem(content) | Block::TableHeader(content) | Block::TableCell(content) => {
            Entry::new(kind, first_text(content)).with_children(block_entries(content, options))
        }
        Block::Table(rows) => {
            Entry::new(kind, count(rows.len(), "row")).with_children(block_entries(rows, options))
        }
        Block::TableRow(cells) => {
            Entry::new(kind, count(cells.len(), "cell")).with_children(block_entries(cells, options))
        }
        Block::Blockquote(content) => {
            Entry::new(kind, first_text(content)).with_children(block_entries(content, options))
        }
        Block::Panel(panel) => Entry::new(kind, panel.panel_type.as_str())
            .with_children(block_entries(&panel.content, options)),
        Block::Expand(expand) => Entry::new(kind, expand.title.as_deref().unwrap_or(""))
            .with_children(block_entries(&expand.content, options)),
        Block::Rule => Entry::new(kind, "rule"),
        Block::MediaSingle(single) => {
            let media = &single.media;
            let label = match &media.collection {
                Some(collection) => format!("{collection}:{}", media.id),
                None => media.id.clone(),
            };
            Entry::new(kind, label)
        }
        Block::Unknown(raw) => match raw.modelled_view() {
            Some(block) => block_entry(&block, options),
            None => raw_entry(raw),
        },
    }
}

fn inline_entry(inline: &Inline, options: &TreevizOptions) -> Entry {
    match inline {
        Inline::Text(text) => {
            let mut entry = Entry::new("text", text.text.as_str());
            if options.show_marks && !text.marks.is_empty() {
                let names: Vec<&str> = text.marks.iter().map(|mark| mark.kind()).collect();
                entry.suffix = format!(" [{}]", names.join(", "));
            }
            entry
        }
        Inline::Media(media) => Entry::new("media", media.id.as_str()),
        Inline::Unknown(raw) => raw_entry(raw),
    }
}

fn raw_entry(raw: &RawNode) -> Entry {
    let label = raw.text.clone().unwrap_or_else(|| raw.kind.clone());
    Entry::new(&raw.kind, label).with_children(raw.content.iter().map(raw_entry).collect())
}

fn truncate(label: &str, width: usize) -> String {
    let flat = label.replace('\n', " ");
    if flat.chars().count() <= width {
        return flat;
    }
    let mut truncated: String = flat.chars().take(width.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

fn format_entry(
    entry: &Entry,
    prefix: &str,
    child_index: usize,
    child_count: usize,
    options: &TreevizOptions,
) -> String {
    let is_last = child_index == child_count - 1;
    let connector = if is_last { "└─" } else { "├─" };
    let mut output = format!(
        "{}{} {} {}{}\n",
        prefix,
        connector,
        get_icon(&entry.kind),
        truncate(&entry.label, options.label_width),
        entry.suffix
    );

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    output.push_str(&format_children(&entry.children, &child_prefix, options));
    output
}

fn format_children(children: &[Entry], prefix: &str, options: &TreevizOptions) -> String {
    let child_count = children.len();
    children
        .iter()
        .enumerate()
        .map(|(i, child)| format_entry(child, prefix, i, child_count, options))
        .collect()
}

pub fn to_treeviz_str(doc: &Document) -> String {
    to_treeviz_str_with_options(doc, &TreevizOptions::default())
}

/// Convert a document to a treeviz string.
pub fn to_treeviz_str_with_options(doc: &Document, options: &TreevizOptions) -> String {
    let header = format!(
        "{} Document ({})\n",
        get_icon("doc"),
        count(doc.content.len(), "block")
    );
    let entries = block_entries(&doc.content, options);
    header + &format_children(&entries, "", options)
}

/// Format implementation for treeviz format
pub struct TreevizFormat;

impl Format for TreevizFormat {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn description(&self) -> &str {
        "Visual tree representation with indentation and Unicode icons"
    }

    fn file_extensions(&self) -> &[&str] {
        &["tree"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(to_treeviz_str(doc))
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let options = TreevizOptions::default().with_params(options)?;
        Ok(to_treeviz_str_with_options(doc, &options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adf::Mark;

    fn sample() -> Document {
        Document::new(vec![
            Block::heading(1, vec![Inline::text("Title")]),
            Block::paragraph(vec![
                Inline::text("Hello "),
                Inline::marked("world", vec![Mark::Strong]),
            ]),
        ])
    }

    #[test]
    fn test_tree_shape() {
        let expected = "⧉ Document (2 blocks)\n\
                        ├─ § h1 Title\n\
                        │ └─ ◦ Title\n\
                        └─ ¶ Hello world\n  \
                        ├─ ◦ Hello \n  \
                        └─ ◦ world [strong]\n";
        assert_eq!(to_treeviz_str(&sample()), expected);
    }

    #[test]
    fn test_marks_can_be_hidden() {
        let options = TreevizOptions {
            show_marks: false,
            ..Default::default()
        };
        let out = to_treeviz_str_with_options(&sample(), &options);
        assert!(out.ends_with("└─ ◦ world\n"));
    }

    #[test]
    fn test_labels_are_truncated() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abcd", 4), "abcd");
        assert_eq!(truncate("a\nb", 10), "a b");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(to_treeviz_str(&Document::default()), "⧉ Document (0 blocks)\n");
    }

    #[test]
    fn test_params() {
        let mut params = HashMap::new();
        params.insert("label-width".to_string(), "5".to_string());
        params.insert("show-marks".to_string(), "false".to_string());
        let options = TreevizOptions::default().with_params(&params).unwrap();
        assert_eq!(
            options,
            TreevizOptions {
                show_marks: false,
                label_width: 5
            }
        );

        params.insert("label-width".to_string(), "wide".to_string());
        assert!(TreevizOptions::default().with_params(&params).is_err());
    }

    #[test]
    fn test_extra_attrs_do_not_change_the_tree() {
        let list: Block = serde_json::from_value(serde_json::json!({
            "type": "orderedList",
            "attrs": { "order": 4 },
            "content": [
                { "type": "listItem", "content": [] },
                { "type": "listItem", "content": [] }
            ]
        }))
        .unwrap();
        assert!(matches!(list, Block::Unknown(_)));
        let out = to_treeviz_str(&Document::new(vec![list]));
        assert_eq!(
            out,
            "⧉ Document (1 block)\n└─ ☰ 2 items\n  ├─ • \n  └─ • \n"
        );
    }

    #[test]
    fn test_unknown_nodes_show_their_type() {
        let raw: RawNode = serde_json::from_value(serde_json::json!({
            "type": "layoutSection",
            "content": [{ "type": "layoutColumn" }]
        }))
        .unwrap();
        let out = to_treeviz_str(&Document::new(vec![Block::Unknown(raw)]));
        assert_eq!(
            out,
            "⧉ Document (1 block)\n└─ ○ layoutSection\n  └─ ○ layoutColumn\n"
        );
    }
}
