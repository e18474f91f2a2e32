//! Format trait definition
//!
//! This module defines the core Format trait that all format implementations must implement.
//! The trait provides a uniform interface for parsing and serializing ADF documents.

use crate::adf::Document;
use crate::error::FormatError;
use std::collections::HashMap;

/// Trait for document formats
///
/// Implementors provide conversion between a string representation and the ADF
/// [`Document`]. Formats can support parsing, serialization, or both.
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_serialization(&self) -> bool {
///         true
///     }
///
///     fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
///         Ok(format!("{} blocks", doc.content.len()))
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "markdown", "adf", "text")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format, without the leading dot.
    ///
    /// Used for automatic format detection from filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports parsing (source → Document)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (Document → source)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into a Document
    ///
    /// Default implementation returns NotSupported error.
    fn parse(&self, _source: &str) -> Result<Document, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize a Document into text
    ///
    /// Default implementation returns NotSupported error.
    fn serialize(&self, _doc: &Document) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }

    /// Serialize a Document, optionally using extra parameters.
    ///
    /// Formats without options can rely on the default implementation, which
    /// delegates to [`Format::serialize`] and rejects any parameter.
    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        if options.is_empty() {
            self.serialize(doc)
        } else {
            Err(FormatError::NotSupported(format!(
                "Format '{}' does not support extra parameters",
                self.name()
            )))
        }
    }
}

/// Parse a boolean option value: `true`/`1`/`yes`/`y` or `false`/`0`/`no`/`n`,
/// ignoring case.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Some(true),
        "false" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Read a boolean option, accepting the spellings of [`parse_bool`].
pub(crate) fn bool_option(
    options: &HashMap<String, String>,
    key: &str,
    default: bool,
) -> Result<bool, FormatError> {
    match options.get(key) {
        None => Ok(default),
        Some(raw) => parse_bool(raw).ok_or_else(|| {
            FormatError::NotSupported(format!(
                "Invalid boolean value '{raw}' for option '{key}'"
            ))
        }),
    }
}

/// Reject options a format does not understand.
pub(crate) fn check_known_options(
    format: &str,
    options: &HashMap<String, String>,
    known: &[&str],
) -> Result<(), FormatError> {
    let mut unknown: Vec<&str> = options
        .keys()
        .map(String::as_str)
        .filter(|key| !known.contains(key))
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }
    unknown.sort_unstable();
    Err(FormatError::NotSupported(format!(
        "Format '{format}' does not support parameter(s): {}",
        unknown.join(", ")
    )))
}
