//! Markdown format implementation
//!
//! This module implements the markdown → ADF direction. The dialect is a
//! practical, fixed subset written by people and language models for issue
//! descriptions and comments; it is not CommonMark.
//!
//! # Parser Choice
//!
//! The parser is hand-written rather than built on a CommonMark crate:
//! - The dialect adds panels (`:::info`), expands (`+++ Title`) and media
//!   references (`!media[id]`), none of which exist in CommonMark
//! - Malformed input must never error; it degrades to paragraphs
//! - ADF forbids `code` combined with any other mark, which needs control
//!   over how marks compose (see [`marks`])
//!
//! # Element Mapping Table
//!
//! | Markdown                      | ADF node                     | Notes                                  |
//! |-------------------------------|------------------------------|----------------------------------------|
//! | Paragraph                     | paragraph                    | Lines joined by a single space         |
//! | `#`..`######`                 | heading (level 1-6)          | Remainder inline-parsed                |
//! | ```` ```lang ````             | codeBlock (language)         | Verbatim, no inline parsing            |
//! | `:::info` .. `:::`            | panel (panelType)            | info, note, warning, error, success    |
//! | `+++ Title` .. `+++`          | expand (title)               | Body parsed as blocks                  |
//! | `\| a \| b \|` + separator      | table / tableRow             | First row → tableHeader cells          |
//! | `---`, `***`, `___`           | rule                         |                                        |
//! | `> quote`                     | blockquote                   | Body parsed as blocks                  |
//! | `- a`, `* a`, `+ a`           | bulletList / listItem        | Deeper indentation nests               |
//! | `1. a`                        | orderedList / listItem       | Numbers discarded                      |
//! | InlineContent:                |                              |                                        |
//! |   `` `code` ``                | text + code                  | Code is never combined with other marks|
//! |   `[text](url)`               | text + link (href)           |                                        |
//! |   `**b**`, `__b__`            | text + strong                |                                        |
//! |   `~~s~~`                     | text + strike                |                                        |
//! |   `*i*`, `_i_`                | text + em                    |                                        |
//! |   `!media[coll:id]`           | mediaSingle / media          | Hoisted out of the enclosing textblock |
//!
//! # Lossy Conversions
//!
//! - Ordered list numbering is discarded (lists always start at 1)
//! - Table column alignment in the separator row is ignored
//! - Soft line breaks inside a paragraph become single spaces

pub mod block;
pub mod inline;
pub mod marks;

use crate::adf::Document;
use crate::error::FormatError;
use crate::format::Format;

/// Format implementation for the markdown dialect
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "Markdown subset with panels, expands and media references"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        Ok(block::parse_markdown(source))
    }
}
