// src/formatting/assembler.rs
//! Joins rendered nodes or summarized rows into one capped text blob.

use super::block_renderer::render_line;
use crate::constants::{CHARS_PER_NODE_ESTIMATE, CONTENT_TEXT_CAP, INDENT_SPACES, TRUNCATION_MARKER};
use crate::model::{ContentNode, NormalizedItem};
use serde_json::Value;
use std::fmt::Write;

/// Cuts `text` to `cap` characters and appends the truncation marker.
///
/// Text within the cap is returned unchanged. The cap counts characters,
/// not bytes, so multi-byte text is never split mid-character.
pub fn truncate_to_cap(text: String, cap: usize) -> String {
    match text.char_indices().nth(cap) {
        None => text,
        Some((cut, _)) => {
            let mut truncated = text;
            truncated.truncate(cut);
            truncated.push_str(TRUNCATION_MARKER);
            truncated
        }
    }
}

/// Content text of a page: every non-blank rendered line, in order.
pub fn assemble_page_text(nodes: &[ContentNode]) -> String {
    let mut output = String::with_capacity(nodes.len() * CHARS_PER_NODE_ESTIMATE);
    for line in nodes.iter().map(render_line) {
        if line.trim().is_empty() {
            continue;
        }
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(&line);
    }
    truncate_to_cap(output, CONTENT_TEXT_CAP)
}

/// Content text of a database: one numbered block per row.
pub fn assemble_database_text(items: &[NormalizedItem]) -> String {
    let indent = " ".repeat(INDENT_SPACES);
    let rows: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let mut row = format!("{}. {}", index + 1, item.title);
            for (name, value) in &item.properties {
                // Writing to a String cannot fail.
                let _ = write!(row, "\n{}{}: {}", indent, name, compact_json(value));
            }
            row
        })
        .collect();
    truncate_to_cap(rows.join("\n\n"), CONTENT_TEXT_CAP)
}

fn compact_json(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}
