// src/formatting/mod.rs
//! Turns fetched Notion data into compact text and plain JSON.
//!
//! Everything in this layer is pure: no I/O, no errors. Malformed input
//! degrades to empty text, `null`, or a bracketed tag.

pub mod assembler;
pub mod block_renderer;
pub mod properties;
pub mod rich_text;

pub use assembler::{assemble_database_text, assemble_page_text, truncate_to_cap};
pub use block_renderer::render_line;
pub use properties::{extract_database_title, extract_title, normalize_properties, normalize_property};
pub use rich_text::plain_text;

use crate::model::NormalizedItem;
use serde_json::{Map, Value};

/// Normalizes one database row into an item.
pub fn normalize_item(row: &Value) -> NormalizedItem {
    let properties_raw = row
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_else(Map::new);

    NormalizedItem {
        id: row
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        title: extract_title(&properties_raw),
        properties: normalize_properties(&properties_raw),
        properties_raw,
    }
}
