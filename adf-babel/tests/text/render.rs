//! Rendering tests for the text format (ADF → plain text)

use adf_babel::{adf_to_text, markdown_to_adf, FormatRegistry};
use insta::assert_snapshot;
use proptest::prelude::*;

/// Render an ADF JSON document received from the platform.
fn json_to_text(json: &str) -> String {
    let registry = FormatRegistry::default();
    let doc = registry.parse(json, "adf").expect("Should parse ADF JSON");
    registry.serialize(&doc, "text").expect("Should render")
}

#[test]
fn test_markdown_document_renders() {
    let md = "# Release notes\n\nShip **it** with `cargo`.\n\n- one\n- two\n\n| A | B |\n|---|---|\n| 1 | 2 |";
    assert_snapshot!(adf_to_text(&markdown_to_adf(md)), @r"
    Release notes


    Ship it with cargo.

    - one
    - two

    A | B
    1 | 2
    ");
}

#[test]
fn test_code_block_renders_fenced() {
    let md = "```python\nprint('hi')\n```";
    assert_snapshot!(adf_to_text(&markdown_to_adf(md)), @r"
    ```python
    print('hi')
    ```
    ");
}

#[test]
fn test_server_comment_renders() {
    let json = r#"{
        "type": "doc",
        "version": 1,
        "content": [
            {"type": "paragraph", "content": [
                {"type": "mention", "attrs": {"id": "557058", "text": "@Ana"}},
                {"type": "text", "text": " please check "},
                {"type": "inlineCard", "attrs": {"url": "https://example.com/browse/PRJ-1"}}
            ]},
            {"type": "panel", "attrs": {"panelType": "warning"}, "content": [
                {"type": "paragraph", "content": [
                    {"type": "status", "attrs": {"text": "BLOCKED", "color": "red"}}
                ]}
            ]}
        ]
    }"#;
    assert_snapshot!(json_to_text(json), @r"
    @Ana please check https://example.com/browse/PRJ-1

    BLOCKED
    ");
}

#[test]
fn test_unknown_container_is_walked() {
    let json = r#"{"type": "doc", "version": 1, "content": [
        {"type": "decisionList", "content": [
            {"type": "decisionItem", "content": [{"type": "text", "text": "Use ADF"}]}
        ]}
    ]}"#;
    assert_eq!(json_to_text(json), "Use ADF");
}

#[test]
fn test_empty_document_renders_empty() {
    assert_eq!(json_to_text(r#"{"type": "doc", "version": 1, "content": []}"#), "");
}

proptest! {
    #[test]
    fn plain_text_survives_round_trip(text in "[a-zA-Z ,]{0,40}") {
        let rendered = adf_to_text(&markdown_to_adf(&text));
        prop_assert_eq!(rendered, text.trim());
    }
}
