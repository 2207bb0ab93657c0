#![forbid(unsafe_code)]

//! Tree reconstruction from flat parent pointers, with bottom-up effort rollups.

use crate::model::{RecordSummary, WorkRecord};
use crate::progress;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq)]
pub struct HierarchyNode {
    pub summary: RecordSummary,
    pub children: Vec<HierarchyNode>,
    /// Own effort plus the effort of every descendant.
    pub total_effort: f64,
    /// Effort of `Done` nodes in this subtree, this node included.
    pub completed_effort: f64,
    pub progress_percent: f64,
}

impl HierarchyNode {
    /// Number of nodes in this subtree, this node included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(HierarchyNode::node_count)
            .sum::<usize>()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Builds the hierarchy view.
///
/// With `root_id`, returns the subtree under that record (empty when the id is
/// unknown). Without it, returns one tree per parentless epic in input order;
/// parentless records of other kinds are not roots.
///
/// A child whose id is already on the path from the root is not expanded, so
/// malformed parent cycles truncate instead of recursing forever.
pub fn build_hierarchy(records: &[WorkRecord], root_id: Option<&str>) -> Vec<HierarchyNode> {
    let builder = TreeBuilder::new(records);
    let mut path = Vec::new();

    match root_id.filter(|id| !id.is_empty()) {
        Some(root_id) => match builder.index.get(root_id) {
            Some(&root) => vec![builder.node(root, &mut path)],
            None => Vec::new(),
        },
        None => records
            .iter()
            .filter(|record| record.kind.is_epic() && record.parent().is_none())
            .map(|record| builder.node(record, &mut path))
            .collect(),
    }
}

struct TreeBuilder<'a> {
    index: HashMap<&'a str, &'a WorkRecord>,
    children: HashMap<&'a str, Vec<&'a WorkRecord>>,
}

impl<'a> TreeBuilder<'a> {
    fn new(records: &'a [WorkRecord]) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        let mut children: HashMap<&str, Vec<&WorkRecord>> = HashMap::new();
        for record in records {
            // Later duplicates replace earlier ones; duplicates are a validation finding.
            index.insert(record.id.as_str(), record);
            if let Some(parent) = record.parent() {
                children.entry(parent).or_default().push(record);
            }
        }
        Self { index, children }
    }

    fn node(&self, record: &'a WorkRecord, path: &mut Vec<&'a str>) -> HierarchyNode {
        path.push(record.id.as_str());

        let mut child_nodes = Vec::new();
        if let Some(kids) = self.children.get(record.id.as_str()) {
            for &kid in kids {
                if path.contains(&kid.id.as_str()) {
                    continue;
                }
                child_nodes.push(self.node(kid, path));
            }
        }

        path.pop();

        let total_effort = child_nodes
            .iter()
            .fold(record.effort_days, |acc, child| acc + child.total_effort);
        let completed_effort = child_nodes
            .iter()
            .fold(record.completed_effort(), |acc, child| {
                acc + child.completed_effort
            });

        HierarchyNode {
            summary: record.summary(),
            children: child_nodes,
            total_effort,
            completed_effort,
            progress_percent: progress::percent(completed_effort, total_effort),
        }
    }
}
