// src/api/guard.rs
//! Write guard — classifies an outbound call as a read or a mutation.
//!
//! Classification looks at the verb and the path only, never the body.
//! `PATCH`, `PUT` and `DELETE` are mutations on every path. `POST` is a
//! read only for query and search endpoints; every path shaped like a
//! create, append, comment or upload is refused. Paths with dot segments
//! or empty segments are refused for every verb, since the URL parser would
//! resolve them to a different endpoint than the one classified.

use crate::error::{AppError, HttpMethod};
use once_cell::sync::Lazy;
use regex::RegexSet;

/// POST paths that create or change content in the store.
static MUTATING_POST_PATHS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        // create page / create database
        r"^pages/?$",
        r"^databases/?$",
        // page property and move endpoints
        r"^pages/[^/]+(/.*)?$",
        // comments
        r"^comments(/.*)?$",
        // append block children
        r"^blocks/[^/]+/children/?$",
        // file uploads
        r"^file_uploads(/.*)?$",
        // create database (newer API surface)
        r"^data_sources/?$",
    ])
    .expect("mutating path patterns are valid")
});

/// Outcome of classifying a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallClass {
    Read,
    Mutation,
}

/// True when a path segment would be rewritten by URL normalization.
///
/// `.` and `..` (also percent-encoded) are resolved by the URL parser before
/// the request is sent, and empty interior segments change what the
/// patterns anchor on. A backslash counts as a separator for `https` URLs.
fn has_ambiguous_segments(path: &str) -> bool {
    let trimmed = path.trim().trim_start_matches(['/', '\\']);
    let without_query = trimmed.split(['?', '#']).next().unwrap_or_default();
    let lowered = without_query.to_ascii_lowercase().replace("%2e", ".");
    let segments: Vec<&str> = lowered.split(['/', '\\']).collect();
    let last = segments.len().saturating_sub(1);
    segments.iter().enumerate().any(|(index, segment)| {
        matches!(*segment, "." | "..") || (segment.is_empty() && index != last)
    })
}

/// Strips the leading slash and any API version prefix so patterns see `pages/...`.
fn canonical_path(path: &str) -> String {
    let trimmed = path.trim().trim_start_matches('/');
    let trimmed = trimmed.strip_prefix("v1/").unwrap_or(trimmed);
    let without_query = trimmed.split(['?', '#']).next().unwrap_or_default();
    without_query.to_ascii_lowercase()
}

/// Classifies a call by verb and path.
pub fn classify(method: HttpMethod, path: &str) -> CallClass {
    if has_ambiguous_segments(path) {
        return CallClass::Mutation;
    }
    match method {
        HttpMethod::Patch | HttpMethod::Put | HttpMethod::Delete => CallClass::Mutation,
        HttpMethod::Post if MUTATING_POST_PATHS.is_match(&canonical_path(path)) => {
            CallClass::Mutation
        }
        HttpMethod::Get | HttpMethod::Post => CallClass::Read,
    }
}

/// Fails with `BlockedOperation` when the call is a mutation.
pub fn ensure_read_only(method: HttpMethod, path: &str) -> Result<(), AppError> {
    match classify(method, path) {
        CallClass::Read => Ok(()),
        CallClass::Mutation => {
            log::warn!("Blocked write-shaped call: {} {}", method, path);
            Err(AppError::BlockedOperation {
                method,
                path: path.to_string(),
            })
        }
    }
}
