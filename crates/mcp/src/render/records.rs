#![forbid(unsafe_code)]

use super::number;
use wbs_core::model::WorkRecord;

fn summary(record: &WorkRecord) -> String {
    let mut lines = vec![
        format!("**{}**: {}", record.id, record.title),
        format!(
            "Type: {} | Status: {} | Priority: {}",
            record.kind, record.status, record.priority
        ),
        format!(
            "Effort: {} days | Stream: {}",
            number(record.effort_days),
            record.work_stream
        ),
    ];
    if let Some(milestone) = record.milestone_label() {
        lines.push(format!("Milestone: {milestone}"));
    }
    if let Some(parent) = record.parent() {
        lines.push(format!("Parent: {parent}"));
    }
    if !record.meta.responsible_architect.is_empty() {
        lines.push(format!("Owner: {}", record.meta.responsible_architect));
    }
    if let Some((start, end)) = timeline(record) {
        lines.push(format!("Timeline: {start} → {end}"));
    }
    lines.join("\n")
}

fn timeline(record: &WorkRecord) -> Option<(&str, &str)> {
    let start = record.meta.start_date.as_deref().filter(|d| !d.is_empty())?;
    let end = record.meta.end_date.as_deref().filter(|d| !d.is_empty())?;
    Some((start, end))
}

pub(crate) fn render_list(records: &[WorkRecord]) -> String {
    if records.is_empty() {
        return "No work items found matching the specified criteria.".to_string();
    }
    let mut lines = vec![
        format!("Found {} work items", records.len()),
        String::new(),
        "---".to_string(),
        String::new(),
    ];
    for record in records {
        lines.push(summary(record));
        lines.push(String::new());
        lines.push("---".to_string());
        lines.push(String::new());
    }
    lines.join("\n")
}

pub(crate) fn render_detail(record: &WorkRecord) -> String {
    let mut lines = vec![
        format!("# {}: {}", record.id, record.title),
        String::new(),
        format!("**Type**: {}", record.kind),
        format!("**Status**: {}", record.status),
        format!("**Priority**: {}", record.priority),
        format!("**Work Stream**: {}", record.work_stream),
        format!("**Effort**: {} days", number(record.effort_days)),
        String::new(),
    ];
    if let Some(milestone) = record.milestone_label() {
        lines.push(format!("**Milestone**: {milestone}"));
    }
    if let Some(parent) = record.parent() {
        lines.push(format!("**Parent WBS**: {parent}"));
    }
    if !record.meta.responsible_architect.is_empty() {
        lines.push(format!(
            "**Responsible Architect**: {}",
            record.meta.responsible_architect
        ));
    }
    if let Some((start, end)) = timeline(record) {
        lines.push(String::new());
        lines.push(format!("**Timeline**: {start} → {end}"));
    }
    if !record.meta.assignees.is_empty() {
        lines.push(String::new());
        lines.push(format!("**Assignees**: {}", record.meta.assignees.join(", ")));
    }
    lines.push(String::new());
    lines.push(format!("**GitHub Issue**: #{}", record.issue_number));
    lines.push(String::new());
    lines.push("## Description".to_string());
    lines.push(String::new());
    lines.push(if record.meta.description.is_empty() {
        "*No description provided*".to_string()
    } else {
        record.meta.description.clone()
    });
    lines.join("\n")
}
