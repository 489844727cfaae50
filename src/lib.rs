// src/lib.rs
//! notion2insight library: a read-only analysis service over Notion pages
//! and databases.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ValidationError`
//! - **Configuration**: `ServerArgs`, `ServiceConfig`
//! - **Notion access**: `NotionGateway`, `NotionHttpClient`, `TreeFetcher`
//! - **Normalization**: `normalize_properties`, `render_line`, the assemblers
//! - **Requests and analysis**: `parse_request`, `run_analysis`, `PatternAnalyzer`
//! - **HTTP surface**: `router`, `AppState`

pub mod analysis;
pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod formatting;
pub mod model;
pub mod pipeline;
pub mod request;
pub mod server;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, HttpMethod};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{ServerArgs, ServiceConfig, UpstreamConfig};

// --- Domain Model ---
pub use crate::model::{
    BlockKind, ContentNode, NormalizedItem, NormalizedTarget, PropertyKind, TargetKind, TargetRef,
};

// --- Domain Types ---
pub use crate::types::{AccessSecret, ApiKey, NotionId};

// --- Notion Access ---
pub use crate::api::{
    ClearedRequest, FetchReport, FetchedTree, HttpTransport, NotionGateway, NotionHttpClient,
    NotionRepository, RawResponse, TraversalBudget, TreeFetcher,
};

// --- Normalization ---
pub use crate::formatting::{
    assemble_database_text, assemble_page_text, extract_database_title, extract_title,
    normalize_item, normalize_properties, normalize_property, plain_text, render_line,
    truncate_to_cap,
};

// --- Requests, Pipeline, Analysis ---
pub use crate::analysis::{Analysis, PatternAnalyzer};
pub use crate::pipeline::{run_analysis, AnalysisComposer, AnalysisOutcome, SnapshotSource, Snapshotter};
pub use crate::request::{parse_request, AnalysisMode, AnalyzeRequest, TargetSpec};

// --- HTTP Surface ---
pub use crate::server::{router, AppState};
