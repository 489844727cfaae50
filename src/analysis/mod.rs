// src/analysis/mod.rs
//! Mechanical pattern extraction over normalized snapshots.
//!
//! Nothing here infers meaning. Headings and to-dos are recognized from the
//! rendered line prefixes, status breakdowns and due dates from typed row
//! properties, and focus terms by case-insensitive substring match.

use crate::model::{NormalizedItem, NormalizedTarget, TargetKind};
use crate::request::{AnalysisMode, AnalyzeRequest};
use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Lines kept per focus term.
const FOCUS_LINES_PER_TERM: usize = 5;

/// Status names that mark a row as finished.
const DONE_STATUSES: [&str; 5] = ["done", "complete", "completed", "closed", "shipped"];

/// Derived facts about a set of snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub mode: &'static str,
    pub generated_at: DateTime<Utc>,
    pub targets_analyzed: usize,
    pub pages: usize,
    pub databases: usize,
    pub nodes_processed: usize,
    pub headings: Vec<String>,
    pub open_todos: Vec<String>,
    pub completed_todos: Vec<String>,
    pub status_breakdown: IndexMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overdue: Option<Vec<OverdueItem>>,
    pub focus: Vec<FocusHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// A database row whose due date has passed without reaching a done status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverdueItem {
    pub id: String,
    pub title: String,
    pub due: String,
}

/// Where a focus term showed up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocusHit {
    pub term: String,
    pub occurrences: usize,
    pub lines: Vec<String>,
}

/// Extracts patterns as of a fixed instant.
#[derive(Debug, Clone)]
pub struct PatternAnalyzer {
    now: DateTime<Utc>,
}

impl PatternAnalyzer {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    /// Analyzes snapshots for a request.
    pub fn analyze(&self, request: &AnalyzeRequest, targets: &[NormalizedTarget]) -> Analysis {
        let mut headings = Vec::new();
        let mut open_todos = Vec::new();
        let mut completed_todos = Vec::new();

        for target in targets {
            let mut in_code = false;
            for line in target.content_text.lines() {
                let line = line.trim_start();
                if line.starts_with("```") {
                    in_code = !in_code;
                    continue;
                }
                if in_code {
                    continue;
                }
                if let Some(heading) = heading_text(line) {
                    headings.push(heading.trim().to_string());
                } else if let Some(task) = line.strip_prefix("[ ] ") {
                    open_todos.push(task.trim().to_string());
                } else if let Some(task) = line.strip_prefix("[x] ") {
                    completed_todos.push(task.trim().to_string());
                }
            }
        }

        let items: Vec<&NormalizedItem> = targets
            .iter()
            .filter_map(|t| t.items.as_ref())
            .flatten()
            .collect();

        let overdue = match request.mode {
            AnalysisMode::Project => Some(self.overdue_items(&items)),
            AnalysisMode::Generic => None,
        };

        Analysis {
            mode: request.mode.as_str(),
            generated_at: self.now,
            targets_analyzed: targets.len(),
            pages: count_kind(targets, TargetKind::Page),
            databases: count_kind(targets, TargetKind::Database),
            nodes_processed: targets.iter().map(|t| t.node_count).sum(),
            headings,
            open_todos,
            completed_todos,
            status_breakdown: status_breakdown(&items),
            overdue,
            focus: focus_hits(&request.focus, targets),
            instructions: request.instructions.clone(),
        }
    }

    fn overdue_items(&self, items: &[&NormalizedItem]) -> Vec<OverdueItem> {
        let today = self.today();
        items
            .iter()
            .filter(|item| !status_of(item).is_some_and(|s| is_done(&s)))
            .filter_map(|item| {
                let due = due_date(item)?;
                (due < today).then(|| OverdueItem {
                    id: item.id.clone(),
                    title: item.title.clone(),
                    due: due.to_string(),
                })
            })
            .collect()
    }
}

/// One-line human summary of an analysis.
pub fn summarize(analysis: &Analysis) -> String {
    let mut parts = vec![
        format!(
            "Analyzed {} target{} ({} page{}, {} database{})",
            analysis.targets_analyzed,
            plural(analysis.targets_analyzed),
            analysis.pages,
            plural(analysis.pages),
            analysis.databases,
            plural(analysis.databases)
        ),
        format!("{} nodes processed", analysis.nodes_processed),
    ];
    if !analysis.headings.is_empty() {
        parts.push(format!("{} headings", analysis.headings.len()));
    }
    if !analysis.open_todos.is_empty() || !analysis.completed_todos.is_empty() {
        parts.push(format!(
            "{} open / {} completed to-dos",
            analysis.open_todos.len(),
            analysis.completed_todos.len()
        ));
    }
    if let Some(overdue) = analysis.overdue.as_ref().filter(|o| !o.is_empty()) {
        parts.push(format!("{} overdue items", overdue.len()));
    }
    let matched = analysis.focus.iter().filter(|f| f.occurrences > 0).count();
    if !analysis.focus.is_empty() {
        parts.push(format!(
            "{} of {} focus terms found",
            matched,
            analysis.focus.len()
        ));
    }
    format!("{}.", parts.join("; "))
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn heading_text(line: &str) -> Option<&str> {
    ["# ", "## ", "### "]
        .iter()
        .find_map(|prefix| line.strip_prefix(prefix))
}

fn count_kind(targets: &[NormalizedTarget], kind: TargetKind) -> usize {
    targets.iter().filter(|t| t.target.kind == kind).count()
}

fn is_done(status: &str) -> bool {
    DONE_STATUSES.contains(&status.to_lowercase().as_str())
}

fn raw_type<'a>(item: &'a NormalizedItem, name: &str) -> Option<&'a str> {
    item.properties_raw
        .get(name)
        .and_then(|p| p.get("type"))
        .and_then(Value::as_str)
}

/// Status of a row: its first `status` property, else a select named "Status".
fn status_of(item: &NormalizedItem) -> Option<String> {
    let by_type = item
        .properties
        .iter()
        .find(|(name, _)| raw_type(item, name) == Some("status"));
    let by_name = || {
        item.properties
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("status"))
    };
    by_type
        .or_else(by_name)
        .and_then(|(_, value)| value.as_str())
        .map(str::to_string)
}

/// Start date of the row's first `date` property.
fn due_date(item: &NormalizedItem) -> Option<NaiveDate> {
    let (_, value) = item
        .properties
        .iter()
        .find(|(name, _)| raw_type(item, name) == Some("date"))?;
    let start = value.get("start")?.as_str()?;
    let day = start.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn status_breakdown(items: &[&NormalizedItem]) -> IndexMap<String, usize> {
    let mut breakdown = IndexMap::new();
    for status in items.iter().filter_map(|item| status_of(item)) {
        *breakdown.entry(status).or_insert(0) += 1;
    }
    breakdown
}

fn focus_hits(terms: &[String], targets: &[NormalizedTarget]) -> Vec<FocusHit> {
    terms
        .iter()
        .map(|term| {
            let needle = term.to_lowercase();
            let mut occurrences = 0;
            let mut lines = Vec::new();
            let haystack = targets
                .iter()
                .flat_map(|t| std::iter::once(t.title.as_str()).chain(t.content_text.lines()));
            for line in haystack {
                let count = line.to_lowercase().matches(&needle).count();
                if count == 0 {
                    continue;
                }
                occurrences += count;
                if lines.len() < FOCUS_LINES_PER_TERM {
                    lines.push(line.trim().to_string());
                }
            }
            FocusHit {
                term: term.clone(),
                occurrences,
                lines,
            }
        })
        .collect()
}
