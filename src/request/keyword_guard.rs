// src/request/keyword_guard.rs
//! Request-level scan for write-intent vocabulary.
//!
//! Every string in the decoded payload, object keys and values alike, is
//! lowercased and searched for a word from [`WRITE_INTENT_VOCABULARY`]. A word only counts when no ASCII letter
//! touches it on either side, so `created_time` passes while `delete` and
//! `delete_me` do not.
//!
//! This is a heuristic sitting in front of the gateway's own method/path
//! guard. It rejects some harmless requests (a focus term such as
//! "Remove blocker") and cannot catch intent phrased any other way.

use crate::constants::WRITE_INTENT_VOCABULARY;
use crate::error::AppError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static WRITE_INTENT_WORD: Lazy<Regex> = Lazy::new(|| {
    let alternation = WRITE_INTENT_VOCABULARY.join("|");
    Regex::new(&format!(r"(?:^|[^a-z])({})(?:[^a-z]|$)", alternation))
        .expect("valid write intent pattern")
});

fn keyword_in(text: &str) -> Option<String> {
    WRITE_INTENT_WORD
        .captures(&text.to_lowercase())
        .and_then(|caps| caps.get(1))
        .map(|word| word.as_str().to_string())
}

/// First write-intent word found in `payload`, in document order.
pub fn find_write_intent(payload: &Value) -> Option<String> {
    match payload {
        Value::String(text) => keyword_in(text),
        Value::Array(items) => items.iter().find_map(find_write_intent),
        Value::Object(map) => map
            .iter()
            .find_map(|(key, value)| keyword_in(key).or_else(|| find_write_intent(value))),
        Value::Null | Value::Bool(_) | Value::Number(_) => None,
    }
}

/// Rejects `payload` when it carries write-intent vocabulary.
pub fn scan(payload: &Value) -> Result<(), AppError> {
    match find_write_intent(payload) {
        Some(keyword) => {
            log::warn!("Rejecting request: write intent keyword \"{}\"", keyword);
            Err(AppError::WriteIntentDetected { keyword })
        }
        None => Ok(()),
    }
}
