// src/pipeline.rs
//! Pipeline capability traits and the sequential analyze pipeline.
//!
//! Two stages, each behind its own trait so it can be tested alone:
//! a [`SnapshotSource`] turns one requested target into a normalized
//! snapshot, and an [`AnalysisComposer`] derives the analysis from all of
//! them. Targets are processed one after another; the first failure
//! aborts the whole request and earlier snapshots are dropped.

use crate::analysis::{summarize, Analysis, PatternAnalyzer};
use crate::api::{NotionRepository, TraversalBudget, TreeFetcher};
use crate::error::AppError;
use crate::formatting::{
    assemble_database_text, assemble_page_text, extract_database_title, extract_title,
    normalize_item, normalize_properties,
};
use crate::model::{NormalizedTarget, TargetKind, TargetRef};
use crate::request::{AnalyzeRequest, TargetSpec};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Produces the normalized snapshot of one target.
#[async_trait::async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn snapshot(&self, target: &TargetSpec) -> Result<NormalizedTarget, AppError>;
}

/// Derives an analysis from a request's snapshots.
pub trait AnalysisComposer: Send + Sync {
    fn compose(&self, request: &AnalyzeRequest, targets: &[NormalizedTarget]) -> Analysis;
}

impl AnalysisComposer for PatternAnalyzer {
    fn compose(&self, request: &AnalyzeRequest, targets: &[NormalizedTarget]) -> Analysis {
        self.analyze(request, targets)
    }
}

/// Everything an analyze request returns.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub summary: String,
    pub analysis: Analysis,
    pub targets: Vec<NormalizedTarget>,
}

/// Builds snapshots by reading through a repository under a budget.
pub struct Snapshotter<'a> {
    repository: &'a dyn NotionRepository,
    budget: &'a TraversalBudget,
    db_page_size: usize,
}

impl<'a> Snapshotter<'a> {
    pub fn new(
        repository: &'a dyn NotionRepository,
        budget: &'a TraversalBudget,
        db_page_size: usize,
    ) -> Self {
        Self {
            repository,
            budget,
            db_page_size,
        }
    }

    async fn page_snapshot(&self, target: &TargetSpec) -> Result<NormalizedTarget, AppError> {
        let page = self.repository.retrieve_page(&target.id).await?;
        let properties = properties_of(&page);

        let tree = TreeFetcher::new(self.repository, self.budget)
            .fetch_tree(&target.id)
            .await?;

        Ok(NormalizedTarget {
            target: target_ref(target),
            title: extract_title(&properties),
            properties: normalize_properties(&properties),
            content_text: assemble_page_text(&tree.nodes),
            node_count: tree.nodes.len(),
            items: None,
        })
    }

    async fn database_snapshot(&self, target: &TargetSpec) -> Result<NormalizedTarget, AppError> {
        let database = self.repository.retrieve_database(&target.id).await?;
        let rows = self
            .repository
            .query_rows(&target.id, target.query.as_ref(), self.db_page_size)
            .await?;

        let items: Vec<_> = rows.iter().map(normalize_item).collect();

        Ok(NormalizedTarget {
            target: target_ref(target),
            title: extract_database_title(&database),
            properties: schema_of(&database),
            content_text: assemble_database_text(&items),
            node_count: items.len(),
            items: Some(items),
        })
    }
}

#[async_trait::async_trait]
impl<'a> SnapshotSource for Snapshotter<'a> {
    async fn snapshot(&self, target: &TargetSpec) -> Result<NormalizedTarget, AppError> {
        log::info!("Fetching {} {}", target.kind, target.id);
        let snapshot = match target.kind {
            TargetKind::Page => self.page_snapshot(target).await?,
            TargetKind::Database => self.database_snapshot(target).await?,
        };
        log::info!(
            "Normalized {} {} \"{}\": {} {}",
            target.kind,
            target.id,
            snapshot.title,
            snapshot.node_count,
            match target.kind {
                TargetKind::Page => "nodes",
                TargetKind::Database => "rows",
            }
        );
        Ok(snapshot)
    }
}

/// Runs a validated request through both stages.
pub async fn run_analysis(
    source: &dyn SnapshotSource,
    composer: &dyn AnalysisComposer,
    request: &AnalyzeRequest,
) -> Result<AnalysisOutcome, AppError> {
    let mut targets = Vec::with_capacity(request.targets.len());
    for target in &request.targets {
        targets.push(source.snapshot(target).await?);
    }

    let analysis = composer.compose(request, &targets);
    let summary = summarize(&analysis);
    log::debug!("Analysis summary: {}", summary);

    Ok(AnalysisOutcome {
        summary,
        analysis,
        targets,
    })
}

// --- Helpers ---

fn target_ref(target: &TargetSpec) -> TargetRef {
    TargetRef {
        kind: target.kind,
        id: target.id.to_string(),
    }
}

fn properties_of(object: &Value) -> Map<String, Value> {
    object
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

/// Schema of a database: property name to property type.
fn schema_of(database: &Value) -> IndexMap<String, Value> {
    properties_of(database)
        .into_iter()
        .map(|(name, definition)| {
            let kind = definition
                .get("type")
                .cloned()
                .unwrap_or_else(|| Value::String("unknown".to_string()));
            (name, kind)
        })
        .collect()
}
