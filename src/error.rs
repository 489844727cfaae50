// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the service.
//! Every variant knows which HTTP status it surfaces as, so the server
//! catches an error once at the top level and reports it without
//! re-classifying strings.

use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use std::fmt;
use thiserror::Error;

/// HTTP verbs the gateway understands.
///
/// The store's own API only uses a handful of verbs; keeping them as a
/// closed enum means the write guard matches on variants, not strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),

    #[error("Write intent detected in request: \"{keyword}\"")]
    WriteIntentDetected { keyword: String },

    #[error("Unauthorized: {0}")]
    Authentication(String),

    #[error("Server misconfigured: {0}")]
    ServerMisconfigured(String),

    #[error("Blocked write operation: {method} {path}")]
    BlockedOperation { method: HttpMethod, path: String },

    #[error("Notion API error ({status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Method {0} not allowed")]
    MethodNotAllowed(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),
}

impl AppError {
    /// Builds an upstream error, keeping only a preview of long bodies.
    pub fn upstream(status: u16, body: &str) -> Self {
        let body = if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
            format!("{}...", preview)
        } else {
            body.to_string()
        };
        Self::Upstream { status, body }
    }

    /// The HTTP status this error surfaces as.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::WriteIntentDetected { .. } => 400,
            Self::Authentication(_) => 401,
            Self::MethodNotAllowed(_) => 405,
            Self::ServerMisconfigured(_)
            | Self::BlockedOperation { .. }
            | Self::Upstream { .. }
            | Self::NetworkFailure(_)
            | Self::MalformedResponse(_)
            | Self::MissingConfiguration(_) => 500,
        }
    }

    /// Whether the failure is the caller's fault rather than the service's.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
