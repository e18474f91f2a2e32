//! Import tests for the markdown format (markdown → ADF JSON)

use adf_babel::FormatRegistry;
use serde_json::{json, Value};

/// Convert markdown to the compact ADF JSON value.
fn md_to_json(md: &str) -> Value {
    let registry = FormatRegistry::default();
    let doc = registry.parse(md, "markdown").expect("markdown never fails");
    let json = registry.serialize(&doc, "adf").expect("Should serialize");
    serde_json::from_str(&json).expect("Should be valid JSON")
}

fn content(md: &str) -> Vec<Value> {
    md_to_json(md)["content"]
        .as_array()
        .expect("content is an array")
        .clone()
}

#[test]
fn test_empty_input() {
    assert_eq!(
        md_to_json(""),
        json!({ "type": "doc", "version": 1, "content": [] })
    );
}

#[test]
fn test_single_paragraph() {
    assert_eq!(
        content("Hello, World!"),
        vec![json!({
            "type": "paragraph",
            "content": [{ "type": "text", "text": "Hello, World!" }]
        })]
    );
}

#[test]
fn test_two_paragraphs() {
    let blocks = content("First\n\nSecond");
    assert_eq!(blocks.len(), 2);
    assert!(blocks.iter().all(|b| b["type"] == "paragraph"));
}

#[test]
fn test_heading() {
    assert_eq!(
        content("# Heading 1"),
        vec![json!({
            "type": "heading",
            "attrs": { "level": 1 },
            "content": [{ "type": "text", "text": "Heading 1" }]
        })]
    );
}

#[test]
fn test_inline_code_in_paragraph() {
    let blocks = content("Use `code` here");
    assert_eq!(
        blocks[0]["content"],
        json!([
            { "type": "text", "text": "Use " },
            { "type": "text", "text": "code", "marks": [{ "type": "code" }] },
            { "type": "text", "text": " here" }
        ])
    );
}

#[test]
fn test_code_block_with_language() {
    assert_eq!(
        content("```go\nfunc main() {}\n```"),
        vec![json!({
            "type": "codeBlock",
            "attrs": { "language": "go" },
            "content": [{ "type": "text", "text": "func main() {}" }]
        })]
    );
}

#[test]
fn test_bullet_list() {
    let blocks = content("- A\n- B\n- C");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0]["type"], "bulletList");
    let items = blocks[0]["content"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(
        items[1],
        json!({
            "type": "listItem",
            "content": [{
                "type": "paragraph",
                "content": [{ "type": "text", "text": "B" }]
            }]
        })
    );
}

#[test]
fn test_code_inside_bold() {
    let blocks = content("**Bold with `code` inside**");
    assert_eq!(
        blocks[0]["content"],
        json!([
            { "type": "text", "text": "Bold with ", "marks": [{ "type": "strong" }] },
            { "type": "text", "text": "code", "marks": [{ "type": "code" }] },
            { "type": "text", "text": " inside", "marks": [{ "type": "strong" }] }
        ])
    );
}

#[test]
fn test_table() {
    let blocks = content("| Name | Role |\n|------|------|\n| Ana | Dev |\n| Bo | QA |");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0]["type"], "table");
    let rows = blocks[0]["content"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["content"][0]["type"], "tableHeader");
    assert_eq!(rows[1]["content"][0]["type"], "tableCell");
    assert_eq!(
        rows[2]["content"][1]["content"][0]["content"][0]["text"],
        "QA"
    );
}

#[test]
fn test_unterminated_fence_consumes_rest() {
    let blocks = content("```\nline one\n\n# not a heading\n- not a list");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0]["type"], "codeBlock");
    assert_eq!(
        blocks[0]["content"][0]["text"],
        "line one\n\n# not a heading\n- not a list"
    );
}

#[test]
fn test_panel_and_expand() {
    let blocks = content(":::note\nRemember\n:::\n\n+++ Logs\n```\nerr\n```\n+++");
    assert_eq!(
        blocks[0],
        json!({
            "type": "panel",
            "attrs": { "panelType": "note" },
            "content": [{
                "type": "paragraph",
                "content": [{ "type": "text", "text": "Remember" }]
            }]
        })
    );
    assert_eq!(blocks[1]["type"], "expand");
    assert_eq!(blocks[1]["attrs"], json!({ "title": "Logs" }));
    assert_eq!(blocks[1]["content"][0]["type"], "codeBlock");
}

#[test]
fn test_media_single() {
    assert_eq!(
        content("!media[uploads:f-1]"),
        vec![json!({
            "type": "mediaSingle",
            "content": [{
                "type": "media",
                "attrs": { "type": "file", "id": "f-1", "collection": "uploads" }
            }]
        })]
    );
}

#[test]
fn test_link_mark() {
    let blocks = content("See [the docs](https://example.com/docs).");
    assert_eq!(
        blocks[0]["content"][1],
        json!({
            "type": "text",
            "text": "the docs",
            "marks": [{ "type": "link", "attrs": { "href": "https://example.com/docs" } }]
        })
    );
}

#[test]
fn test_mixed_document() {
    let md = "# Bug\n\n> Steps\n> 1. open\n> 2. crash\n\n---\n\nThanks";
    let kinds: Vec<Value> = content(md).iter().map(|b| b["type"].clone()).collect();
    assert_eq!(kinds, vec!["heading", "blockquote", "rule", "paragraph"]);
}

#[test]
fn test_json_round_trip_keeps_unknown_nodes() {
    let source = json!({
        "type": "doc",
        "version": 1,
        "content": [
            { "type": "paragraph", "content": [
                { "type": "text", "text": "hi " },
                { "type": "mention", "attrs": { "id": "42", "text": "@ana" } }
            ]},
            { "type": "layoutSection", "content": [
                { "type": "layoutColumn", "attrs": { "width": 50 }, "content": [] }
            ]}
        ]
    });
    let registry = FormatRegistry::default();
    let doc = registry.parse(&source.to_string(), "adf").unwrap();
    let back: Value = serde_json::from_str(&registry.serialize(&doc, "adf").unwrap()).unwrap();
    let expected = json!({
        "type": "doc",
        "version": 1,
        "content": [
            { "type": "paragraph", "content": [
                { "type": "text", "text": "hi " },
                { "type": "mention", "attrs": { "id": "42", "text": "@ana" } }
            ]},
            { "type": "layoutSection", "content": [
                { "type": "layoutColumn", "attrs": { "width": 50 } }
            ]}
        ]
    });
    assert_eq!(back, expected);
}
