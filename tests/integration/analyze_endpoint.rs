// tests/integration/analyze_endpoint.rs
//! The HTTP surface, driven through the router with an in-memory transport.

use crate::common::{app_state, service_config, FakeTransport, DATABASE_ID, PAGE_ID, SECRET};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use notion2insight::{router, AppState};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn analyze_request(body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/analyze")
        .header(header::AUTHORIZATION, format!("Bearer {SECRET}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn five_paragraph_page() -> FakeTransport {
    let children: Vec<Value> = (1..=5)
        .map(|i| {
            json!({
                "object": "block",
                "id": format!("para{i}"),
                "type": "paragraph",
                "has_children": false,
                "paragraph": {"rich_text": [{"plain_text": format!("Paragraph number {i}")}]}
            })
        })
        .collect();
    FakeTransport::new()
        .respond("GET", "pages/abc", 200, json!({"object": "page", "properties": {}}).to_string())
        .respond(
            "GET",
            "blocks/abc/children",
            200,
            json!({"object": "list", "results": children, "has_more": false}).to_string(),
        )
}

#[tokio::test]
async fn health_reports_ok_without_auth() {
    let app = router(app_state(Arc::new(FakeTransport::new())));
    let request = Request::get("/health").body(Body::empty()).unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn health_rejects_other_methods() {
    let app = router(app_state(Arc::new(FakeTransport::new())));
    let request = Request::post("/health").body(Body::empty()).unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["ok"], json!(false));
}

#[tokio::test]
async fn preflight_returns_empty_ok_with_cors() {
    let app = router(app_state(Arc::new(FakeTransport::new())));
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/analyze")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn analyze_requires_post() {
    let app = router(app_state(Arc::new(FakeTransport::new())));
    let request = Request::get("/analyze")
        .header(header::AUTHORIZATION, format!("Bearer {SECRET}"))
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["ok"], json!(false));
}

#[tokio::test]
async fn analyze_rejects_missing_or_wrong_token() {
    let transport = Arc::new(FakeTransport::launch_workspace());
    let body = json!({"targets": [{"type": "page", "id": PAGE_ID}]}).to_string();

    let missing = Request::post("/analyze").body(Body::from(body.clone())).unwrap();
    let (status, _) = send(router(app_state(transport.clone())), missing).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let wrong = Request::post("/analyze")
        .header(header::AUTHORIZATION, "Bearer not-the-secret")
        .body(Body::from(body))
        .unwrap();
    let (status, body) = send(router(app_state(transport.clone())), wrong).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["ok"], json!(false));

    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn analyze_without_configured_secret_is_a_server_error() {
    let transport = Arc::new(FakeTransport::launch_workspace());
    let state = AppState::new(service_config(None, 2, 400), transport.clone());
    let request = analyze_request(json!({"targets": [{"type": "page", "id": PAGE_ID}]}));

    let (status, body) = send(router(state), request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["ok"], json!(false));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn five_childless_paragraphs_yield_five_lines() {
    let transport = Arc::new(five_paragraph_page());
    let app = router(app_state(transport.clone()));

    let (status, body) = send(app, analyze_request(json!({"targets": [{"type": "page", "id": "abc"}]}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    let target = &body["notion_snapshot"]["targets"][0];
    assert_eq!(target["target"], json!({"type": "page", "id": "abc"}));
    assert_eq!(target["title"], json!("Untitled"));
    assert_eq!(target["node_count"], json!(5));
    let text = target["content_text"].as_str().unwrap();
    assert_eq!(text.lines().count(), 5);
    assert!(text.lines().all(|line| !line.trim().is_empty()));
    assert!(target.get("items").is_none());
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn write_intent_is_rejected_before_any_network_call() {
    let transport = Arc::new(FakeTransport::launch_workspace());

    let as_value = analyze_request(json!({
        "targets": [{"type": "page", "id": PAGE_ID}],
        "instructions": "delete"
    }));
    let (status, body) = send(router(app_state(transport.clone())), as_value).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("delete"));

    let as_key = analyze_request(json!({
        "targets": [{"type": "page", "id": PAGE_ID}],
        "delete": true
    }));
    let (status, _) = send(router(app_state(transport.clone())), as_key).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let multi_line = analyze_request(json!({
        "targets": [{"type": "page", "id": PAGE_ID}],
        "instructions": "Tasks:\nRemove stale entries"
    }));
    let (status, body) = send(router(app_state(transport.clone())), multi_line).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("remove"));

    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn invalid_body_is_a_bad_request() {
    let transport = Arc::new(FakeTransport::launch_workspace());

    let (status, body) = send(
        router(app_state(transport.clone())),
        analyze_request(json!({"targets": [{"type": "block", "id": PAGE_ID}]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("targets[0].type"));

    let request = Request::post("/analyze")
        .header(header::AUTHORIZATION, format!("Bearer {SECRET}"))
        .body(Body::from("{oops"))
        .unwrap();
    let (status, _) = send(router(app_state(transport.clone())), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn upstream_failure_fails_the_whole_request() {
    // The database is missing from this workspace, so its retrieval is a 404.
    let transport = Arc::new(five_paragraph_page());
    let request = analyze_request(json!({
        "targets": [
            {"type": "page", "id": "abc"},
            {"type": "database", "id": DATABASE_ID}
        ]
    }));

    let (status, body) = send(router(app_state(transport)), request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["ok"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("404"));
    assert!(body.get("notion_snapshot").is_none());
}

#[tokio::test]
async fn project_analysis_covers_pages_and_databases() {
    let transport = Arc::new(FakeTransport::launch_workspace());
    let request = analyze_request(json!({
        "targets": [
            {"type": "page", "id": PAGE_ID},
            {"type": "database", "id": DATABASE_ID}
        ],
        "mode": "project",
        "focus": ["beta"]
    }));

    let (status, body) = send(router(app_state(transport)), request).await;

    assert_eq!(status, StatusCode::OK);
    let analysis = &body["analysis"];
    assert_eq!(analysis["mode"], json!("project"));
    assert_eq!(analysis["headings"], json!(["Goals"]));
    assert_eq!(analysis["open_todos"], json!(["Load test the beta"]));
    assert_eq!(analysis["completed_todos"], json!(["Draft announcement"]));
    assert_eq!(analysis["status_breakdown"], json!({"In progress": 1, "Done": 1}));
    assert_eq!(analysis["overdue"][0]["title"], json!("Write release notes"));
    assert_eq!(analysis["overdue"].as_array().unwrap().len(), 1);
    assert_eq!(analysis["focus"][0]["term"], json!("beta"));
    assert!(analysis["focus"][0]["occurrences"].as_u64().unwrap() >= 3);
    assert!(body["summary"].as_str().unwrap().starts_with("Analyzed 2 targets"));
}
