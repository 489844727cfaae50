// src/api/types.rs
//! Type definitions for the Notion API module.
//!
//! This module defines immutable types for API operations,
//! following data-oriented design principles.

use crate::error::HttpMethod;
use crate::model::ContentNode;
use crate::types::ValidationError;
use serde_json::Value;

// --- Traversal Budget ---

/// Limits bounding one recursive tree fetch.
///
/// Read once per request and passed by reference into the walk; nothing
/// downstream can widen it. Root children sit at depth 0, so `max_depth`
/// of 0 means "direct children only".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalBudget {
    max_depth: usize,
    max_nodes: usize,
}

impl TraversalBudget {
    pub fn new(max_depth: usize, max_nodes: usize) -> Result<Self, ValidationError> {
        if max_nodes == 0 {
            return Err(ValidationError::OutOfBounds {
                field: "max_nodes",
                value: max_nodes,
                min: 1,
                max: usize::MAX,
            });
        }
        Ok(Self {
            max_depth,
            max_nodes,
        })
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }

    /// Whether a node may be emitted at `depth`.
    pub fn allows_depth(&self, depth: usize) -> bool {
        depth <= self.max_depth
    }

    /// Whether `emitted` nodes have used up the budget.
    pub fn is_exhausted(&self, emitted: usize) -> bool {
        emitted >= self.max_nodes
    }
}

// --- Outbound Requests ---

/// A request that has passed the write guard.
///
/// Only the gateway can build one, so a transport never sees a call that
/// skipped classification.
#[derive(Debug, Clone)]
pub struct ClearedRequest {
    method: HttpMethod,
    path: String,
    body: Option<Value>,
    query: Vec<(String, String)>,
}

impl ClearedRequest {
    pub(crate) fn new(
        method: HttpMethod,
        path: String,
        body: Option<Value>,
        query: Vec<(String, String)>,
    ) -> Self {
        Self {
            method,
            path,
            body,
            query,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Path relative to the API base, without a leading slash.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }
}

/// Status and body of an upstream response, before interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// --- Fetch Results ---

/// What happened during one tree fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Child-listing calls issued
    pub listing_calls: usize,
    /// Deepest depth at which a node was emitted
    pub deepest_depth: usize,
    /// Whether the node budget cut the walk short
    pub truncated: bool,
}

/// Nodes of one tree fetch, in pre-order, plus the fetch report.
#[derive(Debug, Clone)]
pub struct FetchedTree {
    pub nodes: Vec<ContentNode>,
    pub report: FetchReport,
}
