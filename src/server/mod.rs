// src/server/mod.rs
//! HTTP surface: `/health` and `/analyze`.
//!
//! Handlers accept any method and dispatch on it themselves so that
//! `OPTIONS` preflights and wrong methods get the same JSON envelope and
//! CORS headers as everything else. Every failure is an [`AppError`],
//! reported once here as `{ok: false, error}` with its own status.

use crate::analysis::{Analysis, PatternAnalyzer};
use crate::api::{HttpTransport, NotionGateway};
use crate::config::ServiceConfig;
use crate::error::AppError;
use crate::model::NormalizedTarget;
use crate::pipeline::{run_analysis, AnalysisOutcome, Snapshotter};
use crate::request::parse_request;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Shared, read-only state of the server.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub transport: Arc<dyn HttpTransport>,
}

impl AppState {
    pub fn new(config: ServiceConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }
}

/// Builds the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", any(health))
        .route("/analyze", any(analyze))
        .with_state(state)
}

#[derive(Serialize)]
struct AnalyzeResponse {
    ok: bool,
    summary: String,
    analysis: Analysis,
    notion_snapshot: NotionSnapshot,
}

#[derive(Serialize)]
struct NotionSnapshot {
    targets: Vec<NormalizedTarget>,
}

impl From<AnalysisOutcome> for AnalyzeResponse {
    fn from(outcome: AnalysisOutcome) -> Self {
        Self {
            ok: true,
            summary: outcome.summary,
            analysis: outcome.analysis,
            notion_snapshot: NotionSnapshot {
                targets: outcome.targets,
            },
        }
    }
}

// --- Handlers ---

async fn health(method: Method) -> Response {
    match method {
        Method::GET => with_cors((StatusCode::OK, Json(json!({"ok": true}))).into_response()),
        Method::OPTIONS => preflight(),
        other => error_response(AppError::MethodNotAllowed(other.to_string())),
    }
}

async fn analyze(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method == Method::OPTIONS {
        return preflight();
    }
    match handle_analyze(&state, &method, &headers, &body).await {
        Ok(outcome) => {
            log::info!("Analyze request served: {}", outcome.summary);
            with_cors((StatusCode::OK, Json(AnalyzeResponse::from(outcome))).into_response())
        }
        Err(err) => error_response(err),
    }
}

async fn handle_analyze(
    state: &AppState,
    method: &Method,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<AnalysisOutcome, AppError> {
    if *method != Method::POST {
        return Err(AppError::MethodNotAllowed(method.to_string()));
    }
    authorize(&state.config, headers)?;

    let request = parse_request(body)?;
    log::info!(
        "Analyze request: {} target(s), mode {}",
        request.targets.len(),
        request.mode
    );

    let gateway = NotionGateway::new(Arc::clone(&state.transport));
    let snapshotter = Snapshotter::new(&gateway, &state.config.budget, state.config.db_page_size);
    let analyzer = PatternAnalyzer::new(Utc::now());
    run_analysis(&snapshotter, &analyzer, &request).await
}

/// Checks the bearer token; a server without a secret refuses everyone.
fn authorize(config: &ServiceConfig, headers: &HeaderMap) -> Result<(), AppError> {
    let secret = config.access_secret.as_ref().ok_or_else(|| {
        AppError::ServerMisconfigured("ANALYZER_API_KEY is not configured".to_string())
    })?;
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Authentication("missing bearer token".to_string()))?;
    if secret.matches_authorization_header(presented) {
        Ok(())
    } else {
        Err(AppError::Authentication("invalid bearer token".to_string()))
    }
}

// --- Responses ---

fn error_response(err: AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if err.is_client_error() {
        log::warn!("Request rejected ({}): {}", status.as_u16(), err);
    } else {
        log::error!("Request failed ({}): {}", status.as_u16(), err);
    }

    let mut response = (status, Json(json!({"ok": false, "error": err.to_string()}))).into_response();
    if status == StatusCode::UNAUTHORIZED {
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    with_cors(response)
}

fn preflight() -> Response {
    with_cors(StatusCode::OK.into_response())
}

fn with_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Authorization, Content-Type"),
    );
    response
}
