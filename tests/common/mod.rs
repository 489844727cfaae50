// tests/common/mod.rs
//! Shared test doubles: an in-memory Notion transport and server setup.

#![allow(dead_code)]

use clap::Parser;
use notion2insight::{
    AppError, AppState, ClearedRequest, HttpTransport, RawResponse, ServerArgs, ServiceConfig,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const PAGE_ID: &str = "1f2e3d4c-0000-4000-8000-000000000001";
pub const TOGGLE_ID: &str = "1f2e3d4c-0000-4000-8000-0000000000a1";
pub const DATABASE_ID: &str = "1f2e3d4c-0000-4000-8000-0000000000d1";
pub const SECRET: &str = "test-analyzer-secret";

pub const PAGE_FIXTURE: &str = include_str!("../fixtures/api_responses/page_launch_plan.json");
pub const BLOCKS_FIXTURE: &str =
    include_str!("../fixtures/api_responses/blocks_launch_plan.json");
pub const TOGGLE_FIXTURE: &str =
    include_str!("../fixtures/api_responses/blocks_checklist_toggle.json");
pub const DATABASE_FIXTURE: &str =
    include_str!("../fixtures/api_responses/database_launch_tasks.json");
pub const QUERY_FIXTURE: &str =
    include_str!("../fixtures/api_responses/query_launch_tasks.json");

/// A recorded outbound call: method, path and body.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

/// Serves canned responses keyed by `"METHOD path"`; anything else is a 404.
#[derive(Default)]
pub struct FakeTransport {
    routes: HashMap<String, (u16, String)>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, method: &str, path: &str, status: u16, body: impl Into<String>) -> Self {
        self.routes
            .insert(format!("{} {}", method, path), (status, body.into()));
        self
    }

    /// The launch-plan page, its toggle's children and the launch-tasks database.
    pub fn launch_workspace() -> Self {
        Self::new()
            .respond("GET", &format!("pages/{PAGE_ID}"), 200, PAGE_FIXTURE)
            .respond("GET", &format!("blocks/{PAGE_ID}/children"), 200, BLOCKS_FIXTURE)
            .respond("GET", &format!("blocks/{TOGGLE_ID}/children"), 200, TOGGLE_FIXTURE)
            .respond("GET", &format!("databases/{DATABASE_ID}"), 200, DATABASE_FIXTURE)
            .respond("POST", &format!("databases/{DATABASE_ID}/query"), 200, QUERY_FIXTURE)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: &ClearedRequest) -> Result<RawResponse, AppError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method: request.method().to_string(),
            path: request.path().to_string(),
            body: request.body().cloned(),
        });
        let key = format!("{} {}", request.method(), request.path());
        let (status, body) = self.routes.get(&key).cloned().unwrap_or_else(|| {
            (
                404,
                r#"{"object":"error","status":404,"code":"object_not_found"}"#.to_string(),
            )
        });
        Ok(RawResponse { status, body })
    }
}

/// Resolved configuration with a known secret and the given budget.
pub fn service_config(secret: Option<&str>, max_depth: usize, max_nodes: usize) -> ServiceConfig {
    let depth = max_depth.to_string();
    let nodes = max_nodes.to_string();
    let mut argv = vec![
        "notion2insight",
        "--notion-api-key",
        "secret_test_key_123456789",
        "--max-depth",
        depth.as_str(),
        "--max-nodes",
        nodes.as_str(),
    ];
    if let Some(secret) = secret {
        argv.extend(["--api-secret", secret]);
    }
    ServiceConfig::resolve(ServerArgs::parse_from(argv)).expect("test config resolves")
}

pub fn app_state(transport: Arc<FakeTransport>) -> AppState {
    AppState::new(service_config(Some(SECRET), 2, 400), transport)
}
