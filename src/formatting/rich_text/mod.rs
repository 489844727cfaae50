// src/formatting/rich_text/mod.rs
//! Flattens rich-text span arrays into plain strings.
//!
//! A span contributes its `plain_text` when present, otherwise its nested
//! `text.content`, otherwise nothing. Annotations, links and mention
//! targets are dropped: downstream consumers only need the words.

use serde_json::Value;

/// Text of a single span.
fn span_text(span: &Value) -> &str {
    span.get("plain_text")
        .and_then(Value::as_str)
        .or_else(|| {
            span.get("text")
                .and_then(|t| t.get("content"))
                .and_then(Value::as_str)
        })
        .unwrap_or_default()
}

/// Concatenates the text of every span, in order.
///
/// Anything that is not an array of spans yields an empty string.
pub fn plain_text(spans: &Value) -> String {
    match spans {
        Value::Array(items) => items.iter().map(span_text).collect(),
        _ => String::new(),
    }
}

/// Concatenated text of the `rich_text` field of a block payload.
pub fn payload_text(payload: Option<&Value>) -> String {
    payload
        .and_then(|p| p.get("rich_text"))
        .map(plain_text)
        .unwrap_or_default()
}
