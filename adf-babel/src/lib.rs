//! Conversion between markdown and the Atlassian Document Format
//!
//!     Rich-text fields on the platform (issue descriptions, comments, page bodies) only accept
//!     ADF, a JSON tree of typed nodes. This crate turns the markdown people and language models
//!     write into that tree, and turns trees received from the platform back into readable text.
//!
//!     This is a pure lib: no code here reads files, environment variables or stdio. The `adf`
//!     binary (adf-cli) is the shell around it.
//!
//!     The file structure :
//!     .
//!     ├── adf
//!     │   ├── nodes.rs            # Typed tree (Document, Block, Inline, Mark)
//!     │   └── wire.rs             # JSON wire shape and lenient conversion
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── formats
//!     │   ├── markdown            # block.rs, inline.rs, marks.rs
//!     │   ├── json                # ADF JSON
//!     │   ├── text                # Plain text rendering
//!     │   └── treeviz             # Debug tree view
//!     └── lib.rs
//!
//! Core Algorithms
//!
//!     Markdown parsing is two mutually recursive passes. The block pass walks lines and tries a
//!     fixed list of matchers at each position; container bodies (blockquotes, panels, expands,
//!     nested lists) are fed back into it. Leaf text goes through the inline pass, which tries a
//!     fixed list of anchored patterns at the cursor and recurses into emphasis spans.
//!
//!     Marks are composed outside-in onto already parsed inner content. A text node that carries
//!     `code` never receives another mark, which is the one combination the platform rejects.
//!
//!     Neither direction fails on content: malformed markdown degrades to paragraphs, and node
//!     kinds the tree does not model are carried through as raw wire nodes.
//!
//! Testing
//!     tests
//!     └── <format>
//!         └── <testname>.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include
//!     these in the mod.

pub mod adf;
pub mod error;
pub mod format;
pub mod formats;
pub mod registry;

pub use adf::{Block, Document, Inline, Mark};
pub use error::FormatError;
pub use format::Format;
pub use registry::FormatRegistry;

/// Parse markdown into an ADF document. Never fails.
pub fn markdown_to_adf(source: &str) -> Document {
    formats::markdown::block::parse_markdown(source)
}

/// Render an ADF document as plain text. Never fails.
pub fn adf_to_text(doc: &Document) -> String {
    formats::text::render(doc)
}
