//! Core data structures for the ADF tree.

use super::wire::{RawMark, RawNode, WireDocument};
use serde::{Deserialize, Serialize};

/// The only document version the platform accepts.
pub const DOC_VERSION: u32 = 1;

/// Represents the root of a document (`type: "doc"`, `version: 1`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "WireDocument", into = "WireDocument")]
pub struct Document {
    pub content: Vec<Block>,
}

impl Document {
    pub fn new(content: Vec<Block>) -> Self {
        Document { content }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// A paragraph-level (or higher) node.
///
/// Container kinds hold their children directly. Anything the wire carries
/// that is not modelled here is kept verbatim in [`Block::Unknown`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNode", into = "RawNode")]
pub enum Block {
    Paragraph(Paragraph),
    Heading(Heading),
    CodeBlock(CodeBlock),
    BulletList(Vec<Block>),
    OrderedList(Vec<Block>),
    ListItem(Vec<Block>),
    Blockquote(Vec<Block>),
    Rule,
    Table(Vec<Block>),
    TableRow(Vec<Block>),
    TableHeader(Vec<Block>),
    TableCell(Vec<Block>),
    Panel(Panel),
    Expand(Expand),
    MediaSingle(MediaSingle),
    Unknown(RawNode),
}

impl Block {
    pub fn paragraph(content: Vec<Inline>) -> Self {
        Block::Paragraph(Paragraph { content })
    }

    pub fn heading(level: u8, content: Vec<Inline>) -> Self {
        Block::Heading(Heading { level, content })
    }

    pub fn code_block(language: Option<String>, text: impl Into<String>) -> Self {
        Block::CodeBlock(CodeBlock {
            language,
            text: text.into(),
        })
    }

    /// The wire `type` tag of this node.
    pub fn kind(&self) -> &str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::Heading(_) => "heading",
            Block::CodeBlock(_) => "codeBlock",
            Block::BulletList(_) => "bulletList",
            Block::OrderedList(_) => "orderedList",
            Block::ListItem(_) => "listItem",
            Block::Blockquote(_) => "blockquote",
            Block::Rule => "rule",
            Block::Table(_) => "table",
            Block::TableRow(_) => "tableRow",
            Block::TableHeader(_) => "tableHeader",
            Block::TableCell(_) => "tableCell",
            Block::Panel(_) => "panel",
            Block::Expand(_) => "expand",
            Block::MediaSingle(_) => "mediaSingle",
            Block::Unknown(raw) => &raw.kind,
        }
    }

    /// Block children of a container node; empty for leaves and for
    /// [`Block::Unknown`], whose children stay in raw form.
    pub fn children(&self) -> &[Block] {
        match self {
            Block::BulletList(content)
            | Block::OrderedList(content)
            | Block::ListItem(content)
            | Block::Blockquote(content)
            | Block::Table(content)
            | Block::TableRow(content)
            | Block::TableHeader(content)
            | Block::TableCell(content) => content,
            Block::Panel(panel) => &panel.content,
            Block::Expand(expand) => &expand.content,
            Block::Paragraph(_)
            | Block::Heading(_)
            | Block::CodeBlock(_)
            | Block::Rule
            | Block::MediaSingle(_)
            | Block::Unknown(_) => &[],
        }
    }

    /// Inline children of a textblock (paragraph or heading).
    pub fn inlines(&self) -> &[Inline] {
        match self {
            Block::Paragraph(paragraph) => &paragraph.content,
            Block::Heading(heading) => &heading.content,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    pub content: Vec<Inline>,
}

/// Heading with a level in `1..=6`.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub level: u8,
    pub content: Vec<Inline>,
}

/// Verbatim code; serialized as a single unmarked text child.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub panel_type: PanelType,
    pub content: Vec<Block>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelType {
    Info,
    Note,
    Warning,
    Error,
    Success,
}

impl PanelType {
    pub const ALL: [PanelType; 5] = [
        PanelType::Info,
        PanelType::Note,
        PanelType::Warning,
        PanelType::Error,
        PanelType::Success,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PanelType::Info => "info",
            PanelType::Note => "note",
            PanelType::Warning => "warning",
            PanelType::Error => "error",
            PanelType::Success => "success",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        PanelType::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

/// Collapsible section with an optional title.
#[derive(Debug, Clone, PartialEq)]
pub struct Expand {
    pub title: Option<String>,
    pub content: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaSingle {
    pub media: Media,
}

/// A file attachment reference (`attrs.type` is always `"file"`).
#[derive(Debug, Clone, PartialEq)]
pub struct Media {
    pub id: String,
    pub collection: Option<String>,
}

/// Leaf-level content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNode", into = "RawNode")]
pub enum Inline {
    Text(Text),
    Media(Media),
    Unknown(RawNode),
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text(Text {
            text: text.into(),
            marks: Vec::new(),
        })
    }

    pub fn marked(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        Inline::Text(Text {
            text: text.into(),
            marks,
        })
    }

    pub fn kind(&self) -> &str {
        match self {
            Inline::Text(_) => "text",
            Inline::Media(_) => "media",
            Inline::Unknown(raw) => &raw.kind,
        }
    }

    /// The visible characters of a text node; empty for anything else.
    pub fn plain_text(&self) -> &str {
        match self {
            Inline::Text(text) => &text.text,
            _ => "",
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Inline::Text(text) => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub text: String,
    pub marks: Vec<Mark>,
}

impl Text {
    pub fn has_mark_kind(&self, kind: &str) -> bool {
        self.marks.iter().any(|mark| mark.kind() == kind)
    }

    pub fn is_plain(&self) -> bool {
        self.marks.is_empty()
    }
}

/// Decoration on a text node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMark", into = "RawMark")]
pub enum Mark {
    Strong,
    Em,
    Strike,
    Code,
    Link { href: String },
    Unknown(RawMark),
}

impl Mark {
    pub fn link(href: impl Into<String>) -> Self {
        Mark::Link { href: href.into() }
    }

    pub fn kind(&self) -> &str {
        match self {
            Mark::Strong => "strong",
            Mark::Em => "em",
            Mark::Strike => "strike",
            Mark::Code => "code",
            Mark::Link { .. } => "link",
            Mark::Unknown(raw) => &raw.kind,
        }
    }
}
