// src/request/mod.rs
//! Inbound analyze requests: parsing, screening and validation.
//!
//! A body goes through three gates in a fixed order: it must be JSON, it
//! must pass the write-intent keyword scan, and only then is its shape
//! checked field by field. Validation messages name the offending field
//! (`targets[1].id`) so callers can fix their payload.

pub mod keyword_guard;

use crate::constants::MAX_TARGETS_PER_REQUEST;
use crate::error::AppError;
use crate::model::TargetKind;
use crate::types::{NotionId, ValidationError};
use serde_json::{Map, Value};
use std::fmt;

/// Which analysis profile to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisMode {
    Project,
    #[default]
    Generic,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page or database to fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSpec {
    pub kind: TargetKind,
    pub id: NotionId,
    /// Query body for database targets (filter, sorts).
    pub query: Option<Map<String, Value>>,
}

/// A validated analyze request.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeRequest {
    pub targets: Vec<TargetSpec>,
    pub mode: AnalysisMode,
    pub instructions: Option<String>,
    pub focus: Vec<String>,
}

/// Parses and validates a raw request body.
pub fn parse_request(body: &[u8]) -> Result<AnalyzeRequest, AppError> {
    let payload: Value = serde_json::from_slice(body)
        .map_err(|e| ValidationError::MalformedBody(e.to_string()))?;

    keyword_guard::scan(&payload)?;

    Ok(validate(&payload)?)
}

/// Checks the shape of an already-screened payload.
pub fn validate(payload: &Value) -> Result<AnalyzeRequest, ValidationError> {
    let object = payload
        .as_object()
        .ok_or_else(|| ValidationError::MalformedBody("expected a JSON object".to_string()))?;

    let targets = parse_targets(object.get("targets"))?;
    let mode = parse_mode(object.get("mode"))?;
    let instructions = parse_instructions(object.get("instructions"))?;
    let focus = parse_focus(object.get("focus"))?;

    Ok(AnalyzeRequest {
        targets,
        mode,
        instructions,
        focus,
    })
}

fn parse_targets(raw: Option<&Value>) -> Result<Vec<TargetSpec>, ValidationError> {
    let entries = match raw {
        None | Some(Value::Null) => return Err(ValidationError::EmptyField("targets")),
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(ValidationError::field("targets", "must be an array")),
    };
    if entries.is_empty() {
        return Err(ValidationError::EmptyField("targets"));
    }
    if entries.len() > MAX_TARGETS_PER_REQUEST {
        return Err(ValidationError::OutOfBounds {
            field: "targets",
            value: entries.len(),
            min: 1,
            max: MAX_TARGETS_PER_REQUEST,
        });
    }
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_target(index, entry))
        .collect()
}

fn parse_target(index: usize, entry: &Value) -> Result<TargetSpec, ValidationError> {
    let at = |field: &str| format!("targets[{}].{}", index, field);

    let object = entry
        .as_object()
        .ok_or_else(|| ValidationError::field(format!("targets[{}]", index), "must be an object"))?;

    let kind = match object.get("type").and_then(Value::as_str) {
        Some("page") => TargetKind::Page,
        Some("database") => TargetKind::Database,
        _ => {
            return Err(ValidationError::field(
                at("type"),
                "must be \"page\" or \"database\"",
            ))
        }
    };

    let raw_id = object
        .get("id")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ValidationError::field(at("id"), "must be a non-empty string"))?;
    let id = NotionId::parse(raw_id).map_err(|e| ValidationError::field(at("id"), e.to_string()))?;

    let query = match object.get("query") {
        None | Some(Value::Null) => None,
        Some(Value::Object(query)) if kind == TargetKind::Database => Some(query.clone()),
        Some(Value::Object(_)) => {
            return Err(ValidationError::field(
                at("query"),
                "is only supported for database targets",
            ))
        }
        Some(_) => return Err(ValidationError::field(at("query"), "must be an object")),
    };

    Ok(TargetSpec { kind, id, query })
}

fn parse_mode(raw: Option<&Value>) -> Result<AnalysisMode, ValidationError> {
    match raw {
        None | Some(Value::Null) => Ok(AnalysisMode::default()),
        Some(Value::String(mode)) => match mode.as_str() {
            "project" => Ok(AnalysisMode::Project),
            "generic" => Ok(AnalysisMode::Generic),
            _ => Err(ValidationError::field("mode", "must be \"project\" or \"generic\"")),
        },
        Some(_) => Err(ValidationError::field("mode", "must be a string")),
    }
}

fn parse_instructions(raw: Option<&Value>) -> Result<Option<String>, ValidationError> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(ValidationError::field("instructions", "must be a string")),
    }
}

fn parse_focus(raw: Option<&Value>) -> Result<Vec<String>, ValidationError> {
    let entries = match raw {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(ValidationError::field("focus", "must be an array of strings")),
    };
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match entry {
            Value::String(term) if term.trim().is_empty() => None,
            Value::String(term) => Some(Ok(term.trim().to_string())),
            _ => Some(Err(ValidationError::field(
                format!("focus[{}]", index),
                "must be a string",
            ))),
        })
        .collect()
}
