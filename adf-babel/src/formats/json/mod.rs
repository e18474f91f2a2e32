//! ADF JSON format
//!
//! The wire representation the platform's rich-text fields accept and return.
//! Parsing is lenient about node kinds (see [`crate::adf::wire`]) but strict
//! about JSON syntax and the root `doc` node.
//!
//! Serialization options:
//!
//! - `pretty` (default `true`): indent the output. `false` writes one line,
//!   which is what request bodies want.

use crate::adf::Document;
use crate::error::FormatError;
use crate::format::{bool_option, check_known_options, Format};
use std::collections::HashMap;

const KNOWN_OPTIONS: &[&str] = &["pretty"];

/// Parse an ADF JSON document.
pub fn parse_adf_json(source: &str) -> Result<Document, FormatError> {
    serde_json::from_str(source).map_err(|e| FormatError::ParseError(e.to_string()))
}

/// Serialize a document as ADF JSON.
pub fn serialize_adf_json(doc: &Document, pretty: bool) -> Result<String, FormatError> {
    let result = if pretty {
        serde_json::to_string_pretty(doc)
    } else {
        serde_json::to_string(doc)
    };
    result.map_err(|e| FormatError::SerializationError(e.to_string()))
}

/// Format implementation for ADF JSON
pub struct AdfJsonFormat;

impl Format for AdfJsonFormat {
    fn name(&self) -> &str {
        "adf"
    }

    fn description(&self) -> &str {
        "Atlassian Document Format JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json", "adf"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        parse_adf_json(source)
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        serialize_adf_json(doc, true)
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        check_known_options(self.name(), options, KNOWN_OPTIONS)?;
        let pretty = bool_option(options, "pretty", true)?;
        serialize_adf_json(doc, pretty)
    }
}
