//! Format registry for format discovery and selection
//!
//! This module provides a centralized registry for all available formats.
//! Formats can be registered and retrieved by name.

use crate::adf::Document;
use crate::error::FormatError;
use crate::format::Format;
use std::collections::HashMap;

/// Registry of document formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::default();
/// let doc = registry.parse("# Title", "markdown")?;
/// let json = registry.serialize(&doc, "adf")?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Detect format from filename based on file extension
    ///
    /// ```ignore
    /// let registry = FormatRegistry::default();
    /// assert_eq!(registry.detect_format_from_filename("notes.md"), Some("markdown".to_string()));
    /// assert_eq!(registry.detect_format_from_filename("body.json"), Some("adf".to_string()));
    /// assert_eq!(registry.detect_format_from_filename("doc.unknown"), None);
    /// ```
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?
            .to_lowercase();

        self.formats
            .values()
            .find(|format| format.file_extensions().contains(&extension.as_str()))
            .map(|format| format.name().to_string())
    }

    /// Parse source text using the specified format
    pub fn parse(&self, source: &str, format: &str) -> Result<Document, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_parsing() {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' does not support parsing"
            )));
        }
        fmt.parse(source)
    }

    /// Serialize a document using the specified format
    pub fn serialize(&self, doc: &Document, format: &str) -> Result<String, FormatError> {
        self.serialize_with_options(doc, format, &HashMap::new())
    }

    /// Serialize a document using the specified format and options
    pub fn serialize_with_options(
        &self,
        doc: &Document,
        format: &str,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_serialization() {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' does not support serialization"
            )));
        }
        fmt.serialize_with_options(doc, options)
    }

    /// Create a registry with default formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(crate::formats::markdown::MarkdownFormat);
        registry.register(crate::formats::json::AdfJsonFormat);
        registry.register(crate::formats::text::TextFormat);
        registry.register(crate::formats::treeviz::TreevizFormat);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adf::{Block, Inline};

    // Test format
    struct TestFormat;
    impl Format for TestFormat {
        fn name(&self) -> &str {
            "test"
        }
        fn description(&self) -> &str {
            "Test format"
        }
        fn file_extensions(&self) -> &[&str] {
            &["tst"]
        }
        fn supports_parsing(&self) -> bool {
            true
        }
        fn supports_serialization(&self) -> bool {
            true
        }
        fn parse(&self, _source: &str) -> Result<Document, FormatError> {
            Ok(Document::new(vec![Block::paragraph(vec![Inline::text(
                "test",
            )])]))
        }
        fn serialize(&self, _doc: &Document) -> Result<String, FormatError> {
            Ok("test output".to_string())
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = FormatRegistry::new();
        assert_eq!(registry.formats.len(), 0);
    }

    #[test]
    fn test_registry_register() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        assert!(registry.has("test"));
        assert_eq!(registry.list_formats(), vec!["test"]);
    }

    #[test]
    fn test_registry_get_missing() {
        let registry = FormatRegistry::new();
        assert_eq!(
            registry.get("nope").err(),
            Some(FormatError::FormatNotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_registry_parse_and_serialize() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        let doc = registry.parse("anything", "test").unwrap();
        assert_eq!(doc.content.len(), 1);
        assert_eq!(registry.serialize(&doc, "test").unwrap(), "test output");
    }

    #[test]
    fn test_default_formats() {
        let registry = FormatRegistry::default();
        assert_eq!(
            registry.list_formats(),
            vec!["adf", "markdown", "text", "treeviz"]
        );
    }

    #[test]
    fn test_detect_format_from_filename() {
        let registry = FormatRegistry::default();
        assert_eq!(
            registry.detect_format_from_filename("notes.md"),
            Some("markdown".to_string())
        );
        assert_eq!(
            registry.detect_format_from_filename("NOTES.MARKDOWN"),
            Some("markdown".to_string())
        );
        assert_eq!(
            registry.detect_format_from_filename("issue.json"),
            Some("adf".to_string())
        );
        assert_eq!(
            registry.detect_format_from_filename("out.txt"),
            Some("text".to_string())
        );
        assert_eq!(registry.detect_format_from_filename("doc.unknown"), None);
        assert_eq!(registry.detect_format_from_filename("Makefile"), None);
    }

    #[test]
    fn test_direction_support_is_enforced() {
        let registry = FormatRegistry::default();
        let doc = Document::default();
        assert!(matches!(
            registry.parse("x", "text"),
            Err(FormatError::NotSupported(_))
        ));
        assert!(matches!(
            registry.serialize(&doc, "markdown"),
            Err(FormatError::NotSupported(_))
        ));
    }
}
