//! CLI-specific transforms
//!
//! This module defines the views available to `adf inspect`. Each transform is
//! a stage + format combination; the only stage is the parsed ADF tree.
//!
//! - `adf-treeviz`: Tree visualization with Unicode icons (default)
//! - `adf-json`: The ADF JSON that would be sent to the platform
//! - `text`: Plain text rendering of the tree
//!
//! ## Extra Parameters
//!
//! - `show-marks`, `label-width`: forwarded to `adf-treeviz`, on top of the
//!   configured [`TreevizOptions`]
//! - `pretty`: forwarded to `adf-json`
//!
//! Example: `adf inspect notes.md --extra-label-width 60`

use adf_babel::formats::treeviz::{to_treeviz_str_with_options, TreevizOptions};
use adf_babel::{Document, FormatError, FormatRegistry};
use std::collections::HashMap;

/// All available CLI transforms
pub const AVAILABLE_TRANSFORMS: &[&str] = &["adf-treeviz", "adf-json", "text"];

/// Registry format backing each transform.
fn target_format(transform_name: &str) -> Option<&'static str> {
    match transform_name {
        "adf-treeviz" => Some("treeviz"),
        "adf-json" => Some("adf"),
        "text" => Some("text"),
        _ => None,
    }
}

/// Serialize `doc` as `format`. Treeviz output starts from `tree` and applies
/// `params` on top; other formats take `params` as they are.
pub fn serialize_document(
    registry: &FormatRegistry,
    doc: &Document,
    format: &str,
    tree: TreevizOptions,
    params: &HashMap<String, String>,
) -> Result<String, FormatError> {
    if format == "treeviz" {
        let options = tree.with_params(params)?;
        return Ok(to_treeviz_str_with_options(doc, &options));
    }
    registry.serialize_with_options(doc, format, params)
}

/// Parse `source` as `source_format` and render it with the named transform.
///
/// # Examples
///
/// ```ignore
/// let params = HashMap::new();
/// let tree = execute_transform("# Title", "markdown", "adf-treeviz", TreevizOptions::default(), &params)?;
/// ```
pub fn execute_transform(
    source: &str,
    source_format: &str,
    transform_name: &str,
    tree: TreevizOptions,
    extra_params: &HashMap<String, String>,
) -> Result<String, String> {
    let target = target_format(transform_name)
        .ok_or_else(|| format!("Unknown transform: {transform_name}"))?;

    let registry = FormatRegistry::default();
    let doc = registry
        .parse(source, source_format)
        .map_err(|e| format!("Transform failed: {e}"))?;
    serialize_document(&registry, &doc, target, tree, extra_params)
        .map_err(|e| format!("Transform failed: {e}"))
}
