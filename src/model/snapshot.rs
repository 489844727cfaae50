use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Whether a target names a page or a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Page,
    Database,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Database => "database",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which target a snapshot belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetRef {
    #[serde(rename = "type")]
    pub kind: TargetKind,
    pub id: String,
}

/// Normalized output for one requested target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTarget {
    pub target: TargetRef,
    pub title: String,
    pub properties: IndexMap<String, Value>,
    pub content_text: String,
    /// Nodes (pages) or rows (databases) actually processed.
    pub node_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<NormalizedItem>>,
}

/// One row of a queried database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedItem {
    pub id: String,
    pub title: String,
    pub properties: IndexMap<String, Value>,
    pub properties_raw: Map<String, Value>,
}
