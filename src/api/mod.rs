// src/api/mod.rs
//! Notion API interaction — the ability to read content from a workspace.
//!
//! Layering, leaves first:
//! - `client` — reqwest transport carrying credentials
//! - `guard` — verb/path classification of reads and mutations
//! - `gateway` — the only holder of a transport; guards every call
//! - `reader` — typed read operations expressed as gateway calls
//! - `fetcher` — budgeted pre-order walk of a block tree

pub mod client;
pub mod fetcher;
pub mod gateway;
pub mod guard;
mod reader;
mod types;

use crate::error::AppError;
use crate::types::NotionId;
use serde_json::{Map, Value};

/// The ability to read content from a Notion workspace.
///
/// Business logic depends on this trait, never on HTTP details. Every
/// method is a read; there is deliberately no way to express a write.
#[async_trait::async_trait]
pub trait NotionRepository: Send + Sync {
    /// Retrieves a page object (properties, no content).
    async fn retrieve_page(&self, id: &NotionId) -> Result<Value, AppError>;

    /// Retrieves a database object (title and schema).
    async fn retrieve_database(&self, id: &NotionId) -> Result<Value, AppError>;

    /// Lists the first page of a block's (or page's) children.
    async fn list_children(&self, parent: &NotionId) -> Result<Vec<Value>, AppError>;

    /// Queries one page of database rows.
    ///
    /// `query` carries caller-supplied `filter`/`sorts`; `page_size` is the
    /// configured cap and always wins over a larger requested size.
    async fn query_rows(
        &self,
        database: &NotionId,
        query: Option<&Map<String, Value>>,
        page_size: usize,
    ) -> Result<Vec<Value>, AppError>;
}

// Re-export the public interface
pub use client::{HttpTransport, NotionHttpClient};
pub use fetcher::TreeFetcher;
pub use gateway::NotionGateway;
pub use types::{ClearedRequest, FetchReport, FetchedTree, RawResponse, TraversalBudget};
