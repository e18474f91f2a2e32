//! JSON wire shape of ADF nodes.
//!
//! Every node on the wire is `{type, text?, marks?, attrs?, content?}`. The
//! typed tree in [`super::nodes`] converts to and from [`RawNode`] and
//! [`RawMark`]; serde goes through these conversions via `from`/`into`.
//!
//! Reading is lenient: a node whose tag (or required attribute) is not
//! understood is kept as a raw pass-through so that responses from newer
//! servers load, render and round-trip without loss. The same goes for a
//! known node carrying attributes the typed tree has no field for
//! (`orderedList.order`, `table.layout`, media `width`); renderers read
//! those through [`RawNode::modelled_view`].

use super::nodes::{
    Block, CodeBlock, Document, Expand, Heading, Inline, Mark, Media, MediaSingle, Panel,
    PanelType, Paragraph, Text, DOC_VERSION,
};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A node exactly as it appears in JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<RawMark>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<RawNode>,
}

impl RawNode {
    pub fn new(kind: impl Into<String>) -> Self {
        RawNode {
            kind: kind.into(),
            ..Default::default()
        }
    }

    pub fn with_content(mut self, content: Vec<RawNode>) -> Self {
        self.content = content;
        self
    }

    /// Attach attributes from a JSON object literal; non-objects are ignored.
    pub fn with_attrs(mut self, attrs: Value) -> Self {
        if let Value::Object(map) = attrs {
            self.attrs = Some(map);
        }
        self
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.as_ref().and_then(|attrs| attrs.get(key))
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key).and_then(Value::as_str)
    }

    /// The typed block this node would read as without its unmodelled
    /// attributes. `None` when the tag is not modelled or the node stays raw
    /// for another reason.
    pub fn modelled_view(&self) -> Option<Block> {
        modelled_attrs(&self.kind)?;
        let mut node = self.clone();
        strip_unmodelled_attrs(&mut node);
        if node.kind == "mediaSingle" {
            node.content.iter_mut().for_each(strip_unmodelled_attrs);
        }
        match Block::from(node) {
            Block::Unknown(_) => None,
            block => Some(block),
        }
    }

    /// True for tags that live inside textblocks rather than between blocks.
    pub fn is_inline_kind(&self) -> bool {
        matches!(
            self.kind.as_str(),
            "text"
                | "media"
                | "hardBreak"
                | "mention"
                | "emoji"
                | "inlineCard"
                | "status"
                | "date"
                | "mediaInline"
                | "placeholder"
        )
    }
}

/// A mark exactly as it appears in JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawMark {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Map<String, Value>>,
}

impl RawMark {
    pub fn new(kind: impl Into<String>) -> Self {
        RawMark {
            kind: kind.into(),
            attrs: None,
        }
    }
}

/// Root object on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WireDocument {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    content: Vec<Block>,
}

fn default_version() -> u32 {
    DOC_VERSION
}

impl TryFrom<WireDocument> for Document {
    type Error = String;

    fn try_from(wire: WireDocument) -> Result<Self, Self::Error> {
        if wire.kind != "doc" {
            return Err(format!(
                "expected root node of type `doc`, found `{}`",
                wire.kind
            ));
        }
        if wire.version != DOC_VERSION {
            debug!("reading document with version {}", wire.version);
        }
        Ok(Document {
            content: wire.content,
        })
    }
}

impl From<Document> for WireDocument {
    fn from(doc: Document) -> Self {
        WireDocument {
            kind: "doc".to_string(),
            version: DOC_VERSION,
            content: doc.content,
        }
    }
}

/// Attribute keys the typed tree holds, per modelled tag.
fn modelled_attrs(kind: &str) -> Option<&'static [&'static str]> {
    let keys: &'static [&'static str] = match kind {
        "heading" => &["level"],
        "codeBlock" => &["language"],
        "panel" => &["panelType"],
        "expand" => &["title"],
        "media" => &["type", "id", "collection"],
        "paragraph" | "text" | "bulletList" | "orderedList" | "listItem" | "blockquote"
        | "rule" | "table" | "tableRow" | "tableHeader" | "tableCell" | "mediaSingle" => &[],
        _ => return None,
    };
    Some(keys)
}

/// Whether typed reading would lose some of the node's attributes.
fn has_unmodelled_attrs(node: &RawNode) -> bool {
    let Some(attrs) = &node.attrs else {
        return false;
    };
    let keys = modelled_attrs(&node.kind).unwrap_or(&[]);
    attrs.keys().any(|key| !keys.contains(&key.as_str()))
        || (node.kind == "media"
            && attrs
                .get("type")
                .is_some_and(|kind| kind.as_str() != Some("file")))
}

fn strip_unmodelled_attrs(node: &mut RawNode) {
    let keys = modelled_attrs(&node.kind).unwrap_or(&[]);
    if let Some(attrs) = node.attrs.as_mut() {
        attrs.retain(|key, _| keys.contains(&key.as_str()));
    }
}

fn blocks(content: Vec<RawNode>) -> Vec<Block> {
    content.into_iter().map(Block::from).collect()
}

fn inlines(content: Vec<RawNode>) -> Vec<Inline> {
    content.into_iter().map(Inline::from).collect()
}

fn non_empty_attr(node: &RawNode, key: &str) -> Option<String> {
    node.attr_str(key)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn media_from_raw(node: &RawNode) -> Option<Media> {
    if has_unmodelled_attrs(node) {
        return None;
    }
    let id = node.attr_str("id")?.to_string();
    Some(Media {
        id,
        collection: non_empty_attr(node, "collection"),
    })
}

fn pass_through_block(node: RawNode) -> Block {
    debug!("keeping unmodelled block node `{}` as pass-through", node.kind);
    Block::Unknown(node)
}

impl From<RawNode> for Block {
    fn from(node: RawNode) -> Self {
        if has_unmodelled_attrs(&node) {
            return pass_through_block(node);
        }
        match node.kind.as_str() {
            "paragraph" => Block::paragraph(inlines(node.content)),
            "heading" => {
                let level = node
                    .attr("level")
                    .and_then(Value::as_u64)
                    .map(|level| level.clamp(1, 6) as u8)
                    .unwrap_or(1);
                Block::heading(level, inlines(node.content))
            }
            "codeBlock" => {
                let text: String = node
                    .content
                    .iter()
                    .filter_map(|child| child.text.as_deref())
                    .collect();
                Block::code_block(non_empty_attr(&node, "language"), text)
            }
            "bulletList" => Block::BulletList(blocks(node.content)),
            "orderedList" => Block::OrderedList(blocks(node.content)),
            "listItem" => Block::ListItem(blocks(node.content)),
            "blockquote" => Block::Blockquote(blocks(node.content)),
            "rule" => Block::Rule,
            "table" => Block::Table(blocks(node.content)),
            "tableRow" => Block::TableRow(blocks(node.content)),
            "tableHeader" => Block::TableHeader(blocks(node.content)),
            "tableCell" => Block::TableCell(blocks(node.content)),
            "panel" => match node.attr_str("panelType").and_then(PanelType::parse) {
                Some(panel_type) => Block::Panel(Panel {
                    panel_type,
                    content: blocks(node.content),
                }),
                None => pass_through_block(node),
            },
            "expand" => Block::Expand(Expand {
                title: non_empty_attr(&node, "title"),
                content: blocks(node.content),
            }),
            "mediaSingle" => {
                let media = node
                    .content
                    .iter()
                    .find(|child| child.kind == "media")
                    .and_then(media_from_raw);
                match media {
                    Some(media) => Block::MediaSingle(MediaSingle { media }),
                    None => pass_through_block(node),
                }
            }
            _ => pass_through_block(node),
        }
    }
}

impl From<RawNode> for Inline {
    fn from(node: RawNode) -> Self {
        if has_unmodelled_attrs(&node) {
            return Inline::Unknown(node);
        }
        match node.kind.as_str() {
            "text" => Inline::Text(Text {
                text: node.text.unwrap_or_default(),
                marks: node.marks.into_iter().map(Mark::from).collect(),
            }),
            "media" => match media_from_raw(&node) {
                Some(media) => Inline::Media(media),
                None => Inline::Unknown(node),
            },
            _ => Inline::Unknown(node),
        }
    }
}

impl From<RawMark> for Mark {
    fn from(mark: RawMark) -> Self {
        match mark.kind.as_str() {
            "strong" => Mark::Strong,
            "em" => Mark::Em,
            "strike" => Mark::Strike,
            "code" => Mark::Code,
            "link" if mark
                .attrs
                .as_ref()
                .is_some_and(|attrs| attrs.keys().any(|key| key != "href")) =>
            {
                Mark::Unknown(mark)
            }
            "link" => {
                let href = mark
                    .attrs
                    .as_ref()
                    .and_then(|attrs| attrs.get("href"))
                    .and_then(Value::as_str)
                    .map(str::to_string);
                match href {
                    Some(href) => Mark::Link { href },
                    None => Mark::Unknown(mark),
                }
            }
            _ => Mark::Unknown(mark),
        }
    }
}

fn raw_blocks(content: Vec<Block>) -> Vec<RawNode> {
    content.into_iter().map(RawNode::from).collect()
}

fn raw_container(kind: &str, content: Vec<Block>) -> RawNode {
    RawNode::new(kind).with_content(raw_blocks(content))
}

fn raw_textblock(kind: &str, content: Vec<Inline>) -> RawNode {
    RawNode::new(kind).with_content(content.into_iter().map(RawNode::from).collect())
}

fn raw_media(media: Media) -> RawNode {
    let mut attrs = json!({ "type": "file", "id": media.id });
    if let Some(collection) = media.collection {
        attrs["collection"] = Value::String(collection);
    }
    RawNode::new("media").with_attrs(attrs)
}

impl From<Block> for RawNode {
    fn from(block: Block) -> Self {
        match block {
            Block::Paragraph(Paragraph { content }) => raw_textblock("paragraph", content),
            Block::Heading(Heading { level, content }) => {
                raw_textblock("heading", content).with_attrs(json!({ "level": level }))
            }
            Block::CodeBlock(CodeBlock { language, text }) => {
                let mut node = RawNode::new("codeBlock");
                if let Some(language) = language {
                    node = node.with_attrs(json!({ "language": language }));
                }
                if !text.is_empty() {
                    node.content = vec![RawNode::from(Inline::text(text))];
                }
                node
            }
            Block::BulletList(content) => raw_container("bulletList", content),
            Block::OrderedList(content) => raw_container("orderedList", content),
            Block::ListItem(content) => raw_container("listItem", content),
            Block::Blockquote(content) => raw_container("blockquote", content),
            Block::Rule => RawNode::new("rule"),
            Block::Table(content) => raw_container("table", content),
            Block::TableRow(content) => raw_container("tableRow", content),
            Block::TableHeader(content) => raw_container("tableHeader", content),
            Block::TableCell(content) => raw_container("tableCell", content),
            Block::Panel(Panel {
                panel_type,
                content,
            }) => raw_container("panel", content)
                .with_attrs(json!({ "panelType": panel_type.as_str() })),
            Block::Expand(Expand { title, content }) => {
                let node = raw_container("expand", content);
                match title {
                    Some(title) => node.with_attrs(json!({ "title": title })),
                    None => node,
                }
            }
            Block::MediaSingle(MediaSingle { media }) => {
                RawNode::new("mediaSingle").with_content(vec![raw_media(media)])
            }
            Block::Unknown(raw) => raw,
        }
    }
}

impl From<Inline> for RawNode {
    fn from(inline: Inline) -> Self {
        match inline {
            Inline::Text(Text { text, marks }) => RawNode {
                kind: "text".to_string(),
                text: Some(text),
                marks: marks.into_iter().map(RawMark::from).collect(),
                ..Default::default()
            },
            Inline::Media(media) => raw_media(media),
            Inline::Unknown(raw) => raw,
        }
    }
}

impl From<Mark> for RawMark {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::Strong => RawMark::new("strong"),
            Mark::Em => RawMark::new("em"),
            Mark::Strike => RawMark::new("strike"),
            Mark::Code => RawMark::new("code"),
            Mark::Link { href } => {
                let mut attrs = Map::new();
                attrs.insert("href".to_string(), Value::String(href));
                RawMark {
                    kind: "link".to_string(),
                    attrs: Some(attrs),
                }
            }
            Mark::Unknown(raw) => raw,
        }
    }
}
