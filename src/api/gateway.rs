// src/api/gateway.rs
//! The single choke point between the service and the content store.
//!
//! Every call is classified by [`super::guard`] before a
//! [`ClearedRequest`] exists, so a mutation can never reach the transport.
//! Non-success responses become `AppError::Upstream`; success bodies are
//! parsed as JSON.

use super::client::HttpTransport;
use super::guard::ensure_read_only;
use super::types::ClearedRequest;
use crate::error::{AppError, HttpMethod};
use serde_json::Value;
use std::sync::Arc;

/// Read-only gateway to the content store.
#[derive(Clone)]
pub struct NotionGateway {
    transport: Arc<dyn HttpTransport>,
}

impl NotionGateway {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Classifies, forwards and decodes one call.
    pub async fn call(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        query: &[(&str, String)],
    ) -> Result<Value, AppError> {
        ensure_read_only(method, path)?;

        let request = ClearedRequest::new(
            method,
            path.trim_start_matches('/').to_string(),
            body,
            query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        );

        let response = self.transport.send(&request).await?;
        if !response.is_success() {
            log::error!(
                "Notion API returned {} for {} {}",
                response.status,
                method,
                path
            );
            return Err(AppError::upstream(response.status, &response.body));
        }

        serde_json::from_str(&response.body).map_err(|e| {
            AppError::MalformedResponse(format!("{} {}: {}", method, path, e))
        })
    }
}
