// src/api/reader.rs
//! Read operations of the store, expressed as guarded gateway calls.

use super::gateway::NotionGateway;
use super::NotionRepository;
use crate::constants::NOTION_API_PAGE_SIZE;
use crate::error::{AppError, HttpMethod};
use crate::types::NotionId;
use serde_json::{Map, Value};

/// Pulls the `results` array out of a list response.
fn into_results(mut response: Value, path: &str) -> Result<Vec<Value>, AppError> {
    match response.get_mut("results").map(Value::take) {
        Some(Value::Array(results)) => {
            if response.get("has_more").and_then(Value::as_bool) == Some(true) {
                log::debug!("{} has more results; only the first page is used", path);
            }
            Ok(results)
        }
        _ => Err(AppError::MalformedResponse(format!(
            "Missing 'results' array in response from {}",
            path
        ))),
    }
}

/// Builds a query body from caller input, capping the page size.
fn query_body(query: Option<&Map<String, Value>>, page_size_cap: usize) -> Value {
    let mut body = query.cloned().unwrap_or_default();
    let requested = body
        .get("page_size")
        .and_then(Value::as_u64)
        .map(|n| n as usize)
        .filter(|n| *n > 0);
    let page_size = requested.map_or(page_size_cap, |n| n.min(page_size_cap));
    body.remove("start_cursor");
    body.insert("page_size".to_string(), Value::from(page_size));
    Value::Object(body)
}

#[async_trait::async_trait]
impl NotionRepository for NotionGateway {
    async fn retrieve_page(&self, id: &NotionId) -> Result<Value, AppError> {
        let path = format!("pages/{}", id.to_hyphenated());
        self.call(HttpMethod::Get, &path, None, &[]).await
    }

    async fn retrieve_database(&self, id: &NotionId) -> Result<Value, AppError> {
        let path = format!("databases/{}", id.to_hyphenated());
        self.call(HttpMethod::Get, &path, None, &[]).await
    }

    async fn list_children(&self, parent: &NotionId) -> Result<Vec<Value>, AppError> {
        let path = format!("blocks/{}/children", parent.to_hyphenated());
        let response = self
            .call(
                HttpMethod::Get,
                &path,
                None,
                &[("page_size", NOTION_API_PAGE_SIZE.to_string())],
            )
            .await?;
        into_results(response, &path)
    }

    async fn query_rows(
        &self,
        database: &NotionId,
        query: Option<&Map<String, Value>>,
        page_size: usize,
    ) -> Result<Vec<Value>, AppError> {
        let path = format!("databases/{}/query", database.to_hyphenated());
        let body = query_body(query, page_size);
        log::debug!("Query body for {}: {}", path, body);
        let response = self.call(HttpMethod::Post, &path, Some(body), &[]).await?;
        into_results(response, &path)
    }
}
