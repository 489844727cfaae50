// src/api/fetcher.rs
//! Bounded pre-order walk of a block tree.
//!
//! The walk lists one parent's children at a time and descends into a
//! child before moving to its next sibling. Two limits apply: a node is
//! only descended into when its children would still sit within
//! `max_depth`, and the whole walk stops the moment `max_nodes` nodes
//! have been emitted. The node count is shared across every level of
//! the walk, not reset per parent.
//!
//! The walk is sequential: one listing call in flight at a time.

use super::types::{FetchReport, FetchedTree, TraversalBudget};
use super::NotionRepository;
use crate::error::AppError;
use crate::model::ContentNode;
use crate::types::NotionId;
use serde_json::Value;

/// Children of one parent still waiting to be emitted.
struct PendingLevel {
    children: std::vec::IntoIter<Value>,
    depth: usize,
}

/// Walks block trees through a repository under a fixed budget.
pub struct TreeFetcher<'a> {
    repository: &'a dyn NotionRepository,
    budget: &'a TraversalBudget,
}

impl<'a> TreeFetcher<'a> {
    pub fn new(repository: &'a dyn NotionRepository, budget: &'a TraversalBudget) -> Self {
        Self { repository, budget }
    }

    /// Fetches the descendants of `root` in pre-order.
    ///
    /// Any repository error aborts the walk; nodes gathered so far are
    /// dropped with it.
    pub async fn fetch_tree(&self, root: &NotionId) -> Result<FetchedTree, AppError> {
        let mut nodes: Vec<ContentNode> = Vec::new();
        let mut report = FetchReport::default();

        log::debug!(
            "Walking {} (max depth: {}, max nodes: {})",
            root,
            self.budget.max_depth(),
            self.budget.max_nodes()
        );

        let first_level = self.list(root, &mut report).await?;
        let mut stack = vec![PendingLevel {
            children: first_level.into_iter(),
            depth: 0,
        }];

        while let Some(level) = stack.last_mut() {
            let Some(raw) = level.children.next() else {
                stack.pop();
                continue;
            };
            let depth = level.depth;

            if self.budget.is_exhausted(nodes.len()) {
                report.truncated = true;
                break;
            }

            let node = ContentNode::from_block(raw, depth);
            let descend_into = if node.has_children() && self.budget.allows_depth(depth + 1) {
                match NotionId::parse(node.id()) {
                    Ok(id) => Some(id),
                    Err(e) => {
                        log::debug!("Not descending into block {:?}: {}", node.id(), e);
                        None
                    }
                }
            } else {
                None
            };

            report.deepest_depth = report.deepest_depth.max(depth);
            nodes.push(node);

            if let Some(child_id) = descend_into {
                if self.budget.is_exhausted(nodes.len()) {
                    report.truncated = true;
                    break;
                }
                let children = self.list(&child_id, &mut report).await?;
                stack.push(PendingLevel {
                    children: children.into_iter(),
                    depth: depth + 1,
                });
            }
        }

        if report.truncated {
            log::warn!(
                "Node budget of {} reached while walking {}; remaining content skipped",
                self.budget.max_nodes(),
                root
            );
        }
        log::debug!(
            "Walked {}: {} nodes, {} listing calls, deepest depth {}",
            root,
            nodes.len(),
            report.listing_calls,
            report.deepest_depth
        );

        Ok(FetchedTree { nodes, report })
    }

    async fn list(
        &self,
        parent: &NotionId,
        report: &mut FetchReport,
    ) -> Result<Vec<Value>, AppError> {
        report.listing_calls += 1;
        self.repository.list_children(parent).await
    }
}
