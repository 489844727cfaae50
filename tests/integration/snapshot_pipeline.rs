// tests/integration/snapshot_pipeline.rs
//! Snapshots built through the real gateway and fetcher from fixture responses.

use crate::common::{FakeTransport, DATABASE_ID, PAGE_ID, TOGGLE_ID};
use notion2insight::{
    NotionGateway, NotionId, SnapshotSource, Snapshotter, TargetKind, TargetSpec, TraversalBudget,
    TreeFetcher,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};
use std::sync::Arc;

fn target(kind: TargetKind, id: &str, query: Option<Value>) -> TargetSpec {
    TargetSpec {
        kind,
        id: NotionId::parse(id).unwrap(),
        query: query.and_then(|q| q.as_object().cloned()),
    }
}

#[tokio::test]
async fn page_snapshot_renders_the_whole_tree_in_pre_order() {
    let transport = Arc::new(FakeTransport::launch_workspace());
    let gateway = NotionGateway::new(transport.clone());
    let budget = TraversalBudget::new(2, 400).unwrap();

    let snapshot = Snapshotter::new(&gateway, &budget, 50)
        .snapshot(&target(TargetKind::Page, PAGE_ID, None))
        .await
        .unwrap();

    assert_eq!(snapshot.title, "Launch plan");
    assert_eq!(snapshot.node_count, 8);
    assert_eq!(
        snapshot.content_text,
        "# Goals\n\
         Ship the public beta before July.\n\
         ▸ Checklist\n  \
         [x] Draft announcement\n  \
         [ ] Load test the beta\n\
         ⚠️ Beta feedback is due Friday.\n\
         🗂️ Launch tasks"
    );
    assert_eq!(snapshot.properties["Owner"], json!(["Ada Lovelace"]));
    assert_eq!(snapshot.properties["Stage"], json!("Beta"));
    assert_eq!(
        snapshot.properties["Launch date"],
        json!({"start": "2024-07-01", "end": null})
    );
    assert_eq!(
        snapshot.properties.keys().collect::<Vec<_>>(),
        vec!["Owner", "Stage", "Launch date", "title"]
    );

    let paths: Vec<String> = transport.calls().into_iter().map(|c| c.path).collect();
    assert_eq!(
        paths,
        vec![
            format!("pages/{PAGE_ID}"),
            format!("blocks/{PAGE_ID}/children"),
            format!("blocks/{TOGGLE_ID}/children"),
        ]
    );
}

#[tokio::test]
async fn depth_zero_keeps_nested_blocks_out() {
    let transport = Arc::new(FakeTransport::launch_workspace());
    let gateway = NotionGateway::new(transport.clone());
    let budget = TraversalBudget::new(0, 400).unwrap();

    let snapshot = Snapshotter::new(&gateway, &budget, 50)
        .snapshot(&target(TargetKind::Page, PAGE_ID, None))
        .await
        .unwrap();

    assert_eq!(snapshot.node_count, 6);
    assert!(!snapshot.content_text.contains("Draft announcement"));
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn node_budget_caps_the_walk() {
    let transport = Arc::new(FakeTransport::launch_workspace());
    let gateway = NotionGateway::new(transport);
    let budget = TraversalBudget::new(2, 5).unwrap();
    let root = NotionId::parse(PAGE_ID).unwrap();

    let tree = TreeFetcher::new(&gateway, &budget).fetch_tree(&root).await.unwrap();

    let kinds: Vec<String> = tree.nodes.iter().map(|n| n.kind().to_string()).collect();
    assert_eq!(kinds, vec!["heading_1", "paragraph", "paragraph", "toggle", "to_do"]);
    assert!(tree.report.truncated);
    assert_eq!(tree.report.deepest_depth, 1);
}

#[tokio::test]
async fn database_snapshot_lists_rows_with_capped_page_size() {
    let transport = Arc::new(FakeTransport::launch_workspace());
    let gateway = NotionGateway::new(transport.clone());
    let budget = TraversalBudget::new(2, 400).unwrap();
    let query = json!({
        "filter": {"property": "Status", "status": {"does_not_equal": "Archived"}},
        "page_size": 500,
        "start_cursor": "ignored"
    });

    let snapshot = Snapshotter::new(&gateway, &budget, 50)
        .snapshot(&target(TargetKind::Database, DATABASE_ID, Some(query)))
        .await
        .unwrap();

    assert_eq!(snapshot.title, "Launch tasks");
    assert_eq!(
        snapshot.properties.values().cloned().collect::<Vec<_>>(),
        vec![json!("title"), json!("status"), json!("date"), json!("multi_select")]
    );
    assert_eq!(snapshot.node_count, 2);
    assert_eq!(
        snapshot.content_text,
        "1. Write release notes\n  \
         Task: \"Write release notes\"\n  \
         Status: \"In progress\"\n  \
         Due: {\"start\":\"2020-01-15\",\"end\":null}\n  \
         Tags: [\"docs\"]\n\
         \n\
         2. Freeze API\n  \
         Task: \"Freeze API\"\n  \
         Status: \"Done\"\n  \
         Due: {\"start\":\"2020-01-10\",\"end\":null}\n  \
         Tags: []"
    );

    let items = snapshot.items.as_ref().unwrap();
    assert_eq!(items[0].title, "Write release notes");
    assert_eq!(items[1].properties["Status"], json!("Done"));
    assert_eq!(items[1].properties_raw["Status"]["type"], json!("status"));

    let query_call = transport
        .calls()
        .into_iter()
        .find(|c| c.method == "POST")
        .unwrap();
    let body: Map<String, Value> = query_call.body.unwrap().as_object().cloned().unwrap();
    assert_eq!(body["page_size"], json!(50));
    assert!(body.contains_key("filter"));
    assert!(!body.contains_key("start_cursor"));
}
