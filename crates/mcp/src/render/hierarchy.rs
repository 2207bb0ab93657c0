#![forbid(unsafe_code)]

use super::number;
use wbs_core::hierarchy::HierarchyNode;
use wbs_core::model::Status;

fn status_icon(status: &Status) -> &'static str {
    match status {
        Status::Done => "✅",
        Status::InProgress => "🔄",
        Status::Todo => "📋",
        Status::Blocked => "🚫",
        Status::Other(_) => "❓",
    }
}

/// Two lines per node, children indented two spaces per level.
pub(crate) fn render_hierarchy(nodes: &[HierarchyNode]) -> String {
    let mut lines = Vec::new();
    for node in nodes {
        push_node(node, 0, &mut lines);
    }
    lines.join("\n")
}

fn push_node(node: &HierarchyNode, depth: usize, lines: &mut Vec<String>) {
    let prefix = "  ".repeat(depth);
    let item = &node.summary;
    lines.push(format!(
        "{prefix}{} **{}**: {} [{}] ({}% complete)",
        status_icon(&item.status),
        item.id,
        item.title,
        item.status,
        number(node.progress_percent)
    ));
    lines.push(format!(
        "{prefix}   Effort: {}d | Total w/ children: {}d",
        number(item.effort_days),
        number(node.total_effort)
    ));
    for child in &node.children {
        push_node(child, depth + 1, lines);
    }
}
