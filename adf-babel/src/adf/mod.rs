//! Atlassian Document Format (ADF) tree.
//!
//! [`nodes`] holds the typed tree every format converts to or from, and
//! [`wire`] the loose JSON shape the remote platform speaks. The typed tree
//! (de)serializes through the wire shape, so any JSON the platform sends can
//! be loaded, including node kinds this crate does not model.

pub mod nodes;
pub mod wire;

pub use nodes::{
    Block, CodeBlock, Document, Expand, Heading, Inline, Mark, Media, MediaSingle, Panel,
    PanelType, Paragraph, Text,
};
pub use wire::{RawMark, RawNode};
