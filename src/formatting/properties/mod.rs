// src/formatting/properties/mod.rs
//! Property normalization and title extraction.

mod formatters;

pub use formatters::{normalize_properties, normalize_property};

use crate::constants::{CONVENTIONAL_TITLE_NAMES, UNTITLED};
use crate::formatting::rich_text::plain_text;
use serde_json::{Map, Value};

fn is_title_typed(property: &Value) -> bool {
    property.get("type").and_then(Value::as_str) == Some("title")
}

fn non_empty_or_untitled(text: String) -> String {
    if text.trim().is_empty() {
        UNTITLED.to_string()
    } else {
        text
    }
}

/// Title of a page or database row.
///
/// Looks for a `title`-typed property under a conventional name first,
/// then takes the first `title`-typed property in map order.
pub fn extract_title(properties: &Map<String, Value>) -> String {
    let by_name = CONVENTIONAL_TITLE_NAMES
        .iter()
        .filter_map(|name| properties.get(*name))
        .find(|property| is_title_typed(property));

    let property = by_name.or_else(|| properties.values().find(|p| is_title_typed(p)));

    let text = property
        .and_then(|p| p.get("title"))
        .map(plain_text)
        .unwrap_or_default();
    non_empty_or_untitled(text)
}

/// Title of a database object, carried as a top-level rich-text array.
pub fn extract_database_title(database: &Value) -> String {
    let text = database.get("title").map(plain_text).unwrap_or_default();
    non_empty_or_untitled(text)
}
