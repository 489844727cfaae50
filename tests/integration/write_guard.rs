// tests/integration/write_guard.rs
//! Mutation-shaped calls never reach the transport.

use crate::common::{FakeTransport, DATABASE_ID, PAGE_ID};
use notion2insight::{AppError, HttpMethod, NotionGateway};
use serde_json::json;
use std::sync::Arc;

fn gateway() -> (Arc<FakeTransport>, NotionGateway) {
    let transport = Arc::new(FakeTransport::launch_workspace());
    (transport.clone(), NotionGateway::new(transport))
}

#[tokio::test]
async fn every_patch_put_and_delete_is_blocked() {
    let (transport, gateway) = gateway();
    let paths = [
        format!("pages/{PAGE_ID}"),
        format!("blocks/{PAGE_ID}"),
        format!("databases/{DATABASE_ID}"),
        "search".to_string(),
    ];

    for method in [HttpMethod::Patch, HttpMethod::Put, HttpMethod::Delete] {
        for path in &paths {
            let result = gateway.call(method, path, Some(json!({})), &[]).await;
            assert!(
                matches!(result, Err(AppError::BlockedOperation { .. })),
                "{method} {path} should be blocked"
            );
        }
    }
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn creation_shaped_posts_are_blocked() {
    let (transport, gateway) = gateway();
    let paths = [
        "pages".to_string(),
        "/v1/pages".to_string(),
        "databases".to_string(),
        "comments".to_string(),
        format!("blocks/{PAGE_ID}/children"),
        format!("pages/{PAGE_ID}/properties/title"),
        "file_uploads".to_string(),
        "search/../pages".to_string(),
        "./pages".to_string(),
        format!("databases/{DATABASE_ID}/query/../../../pages"),
        "search/%2e%2e/comments".to_string(),
    ];

    for path in &paths {
        let err = gateway
            .call(HttpMethod::Post, path, Some(json!({})), &[])
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Blocked write operation: POST"));
        assert_eq!(err.status_code(), 500);
    }
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn reads_pass_through() {
    let (transport, gateway) = gateway();

    let page = gateway
        .call(HttpMethod::Get, &format!("pages/{PAGE_ID}"), None, &[])
        .await
        .unwrap();
    assert_eq!(page["object"], json!("page"));

    let rows = gateway
        .call(
            HttpMethod::Post,
            &format!("databases/{DATABASE_ID}/query"),
            Some(json!({"page_size": 10})),
            &[],
        )
        .await
        .unwrap();
    assert_eq!(rows["results"].as_array().map(Vec::len), Some(2));

    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn upstream_errors_carry_status_and_body() {
    let (_, gateway) = gateway();

    let err = gateway
        .call(HttpMethod::Get, "pages/missing", None, &[])
        .await
        .unwrap_err();

    match err {
        AppError::Upstream { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("object_not_found"));
        }
        other => panic!("expected an upstream error, got {other:?}"),
    }
}
