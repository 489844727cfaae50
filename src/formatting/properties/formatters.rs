// src/formatting/properties/formatters.rs
//! Type-specific normalization of Notion property values.
//!
//! Each property record is `{ "type": <kind>, <kind>: <payload>, ... }`.
//! Normalization reads the payload under the record's own kind and maps it
//! to a plain JSON value. Every branch is total: a malformed payload
//! degrades to `null` or an empty collection, never to an error.

use crate::formatting::rich_text::plain_text;
use crate::model::PropertyKind;
use serde_json::{json, Map, Value};

// --- Main Normalization Entry Point ---

/// Normalizes one property record into a JSON-safe value.
pub fn normalize_property(property: &Value) -> Value {
    use PropertyKind::*;

    let tag = property
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    let payload = property.get(tag).unwrap_or(&Value::Null);

    log::trace!("Normalizing property of type {}", tag);

    match PropertyKind::from_discriminant(tag) {
        Title | RichText => Value::String(plain_text(payload)),
        Number | Checkbox | Url | Email | PhoneNumber | CreatedTime | LastEditedTime => {
            payload.clone()
        }
        Select | Status => option_name(payload),
        MultiSelect => Value::Array(
            as_items(payload)
                .filter_map(|option| option.get("name").cloned())
                .collect(),
        ),
        Date => normalize_date(payload),
        People => Value::Array(as_items(payload).map(person_name).collect()),
        Relation => Value::Array(
            as_items(payload)
                .filter_map(|reference| reference.get("id").cloned())
                .collect(),
        ),
        Formula | Rollup => nested_by_own_type(payload),
        CreatedBy | LastEditedBy => payload.get("name").cloned().unwrap_or(Value::Null),
        Files => Value::Array(as_items(payload).map(file_name).collect()),
        UniqueId => normalize_unique_id(payload),
        Verification => payload.get("state").cloned().unwrap_or(Value::Null),
        Button => Value::Null,
        Other(tag) => Value::String(format!("[{}]", tag)),
    }
}

// --- Helpers ---

fn as_items(payload: &Value) -> impl Iterator<Item = &Value> {
    payload.as_array().into_iter().flatten()
}

fn option_name(payload: &Value) -> Value {
    payload.get("name").cloned().unwrap_or(Value::Null)
}

fn normalize_date(payload: &Value) -> Value {
    match payload {
        Value::Object(date) => json!({
            "start": date.get("start").cloned().unwrap_or(Value::Null),
            "end": date.get("end").cloned().unwrap_or(Value::Null),
        }),
        _ => Value::Null,
    }
}

fn person_name(person: &Value) -> Value {
    match person.get("name").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => Value::String(name.to_string()),
        _ => Value::String("Unknown".to_string()),
    }
}

/// Formula and rollup results name their own value kind in a nested `type`.
fn nested_by_own_type(payload: &Value) -> Value {
    payload
        .get("type")
        .and_then(Value::as_str)
        .and_then(|inner| payload.get(inner))
        .cloned()
        .unwrap_or(Value::Null)
}

fn file_name(file: &Value) -> Value {
    let name = file.get("name").and_then(Value::as_str).or_else(|| {
        let kind = file.get("type").and_then(Value::as_str)?;
        file.get(kind)?.get("url")?.as_str()
    });
    Value::String(name.unwrap_or("Unknown").to_string())
}

fn normalize_unique_id(payload: &Value) -> Value {
    let Some(number) = payload.get("number").filter(|n| !n.is_null()) else {
        return Value::Null;
    };
    match payload.get("prefix").and_then(Value::as_str) {
        Some(prefix) if !prefix.is_empty() => Value::String(format!("{}-{}", prefix, number)),
        _ => number.clone(),
    }
}

/// Normalizes every property of a record, keeping keys and their order.
pub fn normalize_properties(properties: &Map<String, Value>) -> indexmap::IndexMap<String, Value> {
    properties
        .iter()
        .map(|(name, property)| (name.clone(), normalize_property(property)))
        .collect()
}
