// src/api/client.rs
//! Pure HTTP transport for the Notion API.
//!
//! This module provides a thin wrapper around reqwest that carries the
//! upstream credential and protocol-version header. It performs no
//! classification of its own: it only accepts [`ClearedRequest`]s, which
//! the gateway builds after the write guard has passed them.

use super::types::{ClearedRequest, RawResponse};
use crate::config::UpstreamConfig;
use crate::error::{AppError, HttpMethod};
use reqwest::{header, Client, Method};
use url::Url;

/// Sends cleared requests to the content store.
///
/// Production uses [`NotionHttpClient`]; tests substitute an in-memory
/// fake. Either way the only caller is the gateway.
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &ClearedRequest) -> Result<RawResponse, AppError>;
}

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: Url,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(config: &UpstreamConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(config)?)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(config: &UpstreamConfig) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", config.api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_str(&config.notion_version).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid Notion-Version value: {}", e))
            })?,
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait::async_trait]
impl HttpTransport for NotionHttpClient {
    async fn send(&self, request: &ClearedRequest) -> Result<RawResponse, AppError> {
        let url = self.endpoint_url(request.path());
        log::debug!("{} {}", request.method(), url);

        let mut builder = self
            .client
            .request(reqwest_method(request.method()), &url)
            .query(request.query());
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        log::debug!("{} {} -> {}", request.method(), url, status);
        Ok(RawResponse { status, body })
    }
}
