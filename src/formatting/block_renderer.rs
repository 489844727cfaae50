// src/formatting/block_renderer.rs
//! Node rendering: one content node to one human-readable line.
//!
//! Rendering is pure and never fails. Every kind has a rule; kinds the
//! renderer does not know fall back to their text, or to a bracketed tag
//! when they carry none. Output is indented by depth, and when a rule
//! produces several lines (fenced code, multi-line text) each of them is
//! indented.

use super::rich_text::{payload_text, plain_text};
use crate::constants::INDENT_SPACES;
use crate::model::{BlockKind, ContentNode};
use serde_json::Value;

// --- Public API ---

/// Renders a node as text, indented for its depth.
pub fn render_line(node: &ContentNode) -> String {
    let body = render_body(node);
    indent(&body, node.depth())
}

// --- Per-Kind Rules ---

fn render_body(node: &ContentNode) -> String {
    let payload = node.payload();
    let text = || payload_text(payload);

    match node.kind() {
        BlockKind::Paragraph => text(),
        BlockKind::Heading1 => format!("# {}", text()),
        BlockKind::Heading2 => format!("## {}", text()),
        BlockKind::Heading3 => format!("### {}", text()),
        BlockKind::BulletedListItem => format!("• {}", text()),
        BlockKind::NumberedListItem => format!("1. {}", text()),
        BlockKind::ToDo => {
            let checked = field(payload, "checked")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            format!("[{}] {}", if checked { "x" } else { " " }, text())
        }
        BlockKind::Toggle => format!("▸ {}", text()),
        BlockKind::Quote => format!("> {}", text()),
        BlockKind::Callout => render_callout(payload),
        BlockKind::Code => render_code(payload),
        BlockKind::Divider => "---".to_string(),
        BlockKind::TableRow => render_table_row(payload),
        BlockKind::ChildPage => format!(
            "📄 {}",
            titled(payload).unwrap_or("Untitled page")
        ),
        BlockKind::ChildDatabase => format!(
            "🗂️ {}",
            titled(payload).unwrap_or("Untitled database")
        ),
        BlockKind::Image | BlockKind::Video | BlockKind::File | BlockKind::Pdf | BlockKind::Audio => {
            format!("[{}]", node.kind())
        }
        BlockKind::Bookmark => match non_empty_str(payload, "url") {
            Some(url) => format!("🔗 {}", url),
            None => "[bookmark]".to_string(),
        },
        BlockKind::Embed => format!(
            "[embed: {}]",
            non_empty_str(payload, "url").unwrap_or("unknown")
        ),
        BlockKind::Equation => match non_empty_str(payload, "expression") {
            Some(expression) => format!("$ {} $", expression),
            None => "[equation]".to_string(),
        },
        BlockKind::LinkToPage => match link_target(payload) {
            Some(target) => format!("↗ {}", target),
            None => "[link_to_page]".to_string(),
        },
        BlockKind::Other(tag) => match payload {
            None => format!("[{}]", tag),
            Some(_) => {
                let text = text();
                if text.trim().is_empty() {
                    format!("[{}]", tag)
                } else {
                    text
                }
            }
        },
    }
}

fn render_callout(payload: Option<&Value>) -> String {
    let text = payload_text(payload);
    let emoji = field(payload, "icon")
        .filter(|icon| icon.get("type").and_then(Value::as_str) == Some("emoji"))
        .and_then(|icon| icon.get("emoji"))
        .and_then(Value::as_str);
    match emoji {
        Some(emoji) => format!("{} {}", emoji, text),
        None => text,
    }
}

fn render_code(payload: Option<&Value>) -> String {
    let language = non_empty_str(payload, "language").unwrap_or_default();
    format!("```{}\n{}\n```", language, payload_text(payload))
}

fn render_table_row(payload: Option<&Value>) -> String {
    let cells = field(payload, "cells")
        .and_then(Value::as_array)
        .map(|cells| cells.iter().map(plain_text).collect::<Vec<_>>())
        .unwrap_or_default();
    if cells.is_empty() {
        return "| |".to_string();
    }
    format!("| {} |", cells.join(" | "))
}

/// Target of a `link_to_page` block, named by the link's own `type`.
fn link_target(payload: Option<&Value>) -> Option<&str> {
    let kind = non_empty_str(payload, "type")?;
    non_empty_str(payload, kind)
}

// --- Helpers ---

fn field<'a>(payload: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    payload.and_then(|p| p.get(key))
}

fn non_empty_str<'a>(payload: Option<&'a Value>, key: &str) -> Option<&'a str> {
    field(payload, key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn titled(payload: Option<&Value>) -> Option<&str> {
    non_empty_str(payload, "title")
}

fn indent(body: &str, depth: usize) -> String {
    if depth == 0 {
        return body.to_string();
    }
    let prefix = " ".repeat(INDENT_SPACES * depth);
    body.split('\n')
        .map(|line| format!("{}{}", prefix, line))
        .collect::<Vec<_>>()
        .join("\n")
}
