#![forbid(unsafe_code)]

use super::number;
use wbs_core::milestones::MilestoneProgress;
use wbs_core::model::WorkRecord;
use wbs_core::orphans::OrphanReport;
use wbs_core::validate::{Severity, ValidationResult};

const BAR_CELLS: usize = 20;

pub(crate) fn render_validation(result: &ValidationResult, checked_at: &str) -> String {
    let mut lines = vec![
        "# Validation Result".to_string(),
        String::new(),
        format!(
            "**Status**: {}",
            if result.is_valid { "✅ VALID" } else { "❌ INVALID" }
        ),
        format!("**Total Items**: {}", result.total_items),
        format!("**Issues Found**: {}", result.issues.len()),
        format!("**Checked At**: {checked_at}"),
        String::new(),
    ];
    if result.issues.is_empty() {
        lines.push("No issues found! All work items are consistent.".to_string());
        return lines.join("\n");
    }

    let sections = [
        (Severity::Error, "## ❌ Errors"),
        (Severity::Warning, "## ⚠️ Warnings"),
        (Severity::Info, "## ℹ️ Info"),
    ];
    let mut blocks = Vec::new();
    for (severity, heading) in sections {
        let mut block = vec![heading.to_string(), String::new()];
        block.extend(result.with_severity(severity).map(|issue| {
            format!(
                "- **{}** [{}]: {}",
                issue.record_id, issue.issue_type, issue.message
            )
        }));
        if block.len() > 2 {
            blocks.push(block.join("\n"));
        }
    }
    lines.push(blocks.join("\n\n"));
    lines.join("\n")
}

pub(crate) fn render_orphans(report: &OrphanReport<'_>) -> String {
    let mut lines = vec!["# Orphan Work Items".to_string(), String::new()];
    if report.is_empty() {
        lines.push(
            "✅ No orphan items found! All work items have proper relationships.".to_string(),
        );
        return lines.join("\n");
    }
    lines.push(format!(
        "Found {} orphan items across {} categories:",
        report.total(),
        report.categories()
    ));
    lines.push(String::new());

    orphan_section(
        &mut lines,
        "🔴 Features Without Parent Epic",
        "These features should be assigned to an epic:",
        &report.features_without_epic,
        |item| format!("Status: {} | Stream: {}", item.status, item.work_stream),
    );
    orphan_section(
        &mut lines,
        "🟡 Items Without Milestone",
        "These items should be assigned to a milestone:",
        &report.items_without_milestone,
        |item| format!("Type: {} | Status: {}", item.kind, item.status),
    );
    orphan_section(
        &mut lines,
        "🚨 Broken Parent References",
        "These items reference non-existent parents:",
        &report.broken_parent_refs,
        |item| {
            format!(
                "References missing parent: {}",
                item.parent().unwrap_or_default()
            )
        },
    );
    lines.join("\n")
}

fn orphan_section(
    lines: &mut Vec<String>,
    title: &str,
    intro: &str,
    items: &[&WorkRecord],
    detail: impl Fn(&WorkRecord) -> String,
) {
    if items.is_empty() {
        return;
    }
    lines.push(format!("## {title} ({})", items.len()));
    lines.push(String::new());
    lines.push(intro.to_string());
    lines.push(String::new());
    for item in items {
        lines.push(format!("- **{}**: {}", item.id, item.title));
        lines.push(format!("  {}", detail(item)));
    }
    lines.push(String::new());
}

/// Twenty cells, filled in proportion to `percent` and truncated toward zero.
fn progress_bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_CELLS as f64).floor().clamp(0.0, BAR_CELLS as f64) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_CELLS - filled))
}

pub(crate) fn render_milestones(progress: &[MilestoneProgress]) -> String {
    if progress.is_empty() {
        return "No milestones found with assigned work items.".to_string();
    }
    let mut lines = vec![
        "# Milestone Progress Report".to_string(),
        String::new(),
        format!("Tracking {} milestone(s)", progress.len()),
        String::new(),
    ];
    for entry in progress {
        lines.extend([
            format!("## {}", entry.milestone),
            String::new(),
            format!(
                "**Progress**: {}% | {}",
                number(entry.progress_percent),
                progress_bar(entry.progress_percent)
            ),
            String::new(),
            "**Item Status**:".to_string(),
            format!("- ✅ Done: {}", entry.completed_items),
            format!("- 🔄 In Progress: {}", entry.in_progress_items),
            format!("- 🚫 Blocked: {}", entry.blocked_items),
            format!("- 📋 Todo: {}", entry.todo_items()),
            format!("- **Total**: {} items", entry.total_items),
            String::new(),
            "**Effort**:".to_string(),
            format!("- Completed: {} days", number(entry.completed_effort_days)),
            format!("- Total: {} days", number(entry.total_effort_days)),
            String::new(),
        ]);
        if !entry.epics.is_empty() {
            lines.push(format!("**Epics**: {}", entry.epics.join(", ")));
            lines.push(String::new());
        }
        lines.push("---".to_string());
        lines.push(String::new());
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures::record;
    use wbs_core::milestones::milestone_progress;
    use wbs_core::orphans::find_orphans;
    use wbs_core::validate::validate;

    #[test]
    fn clean_validation_report() {
        let mut epic = record("E1", "Epic", None, 0.0, "Todo");
        epic.milestone = Some("M1".to_string());
        let text = render_validation(&validate(&[epic]), "2024-01-01T00:00:00Z");
        assert_eq!(
            text,
            "# Validation Result\n\n**Status**: ✅ VALID\n**Total Items**: 1\n**Issues Found**: 0\n\
             **Checked At**: 2024-01-01T00:00:00Z\n\nNo issues found! All work items are consistent."
        );
    }

    #[test]
    fn validation_groups_by_severity_in_order() {
        let records = vec![
            record("E1", "Epic", None, 0.0, "Todo"),
            record("F1", "Feature", None, 1.0, "Todo"),
            record("T1", "Task", Some("WS-404"), 1.0, "Todo"),
        ];
        let text = render_validation(&validate(&records), "now");
        assert!(text.contains("**Status**: ❌ INVALID"));
        let errors = text.find("## ❌ Errors").expect("errors");
        let warnings = text.find("## ⚠️ Warnings").expect("warnings");
        let info = text.find("## ℹ️ Info").expect("info");
        assert!(errors < warnings && warnings < info);
        assert!(text.contains(
            "- **T1** [missing_parent]: References non-existent parent: WS-404\n\n## ⚠️ Warnings"
        ));
        assert!(text.contains("- **F1** [orphan_feature]: Feature has no parent epic"));
        assert!(text.ends_with("- **F1** [missing_milestone]: Feature has no milestone assigned"));
    }

    #[test]
    fn orphans_all_clear() {
        assert_eq!(
            render_orphans(&find_orphans(&[])),
            "# Orphan Work Items\n\n✅ No orphan items found! All work items have proper relationships."
        );
    }

    #[test]
    fn orphans_list_each_bucket() {
        let mut feature = record("F1", "Feature", None, 1.0, "Todo");
        feature.milestone = Some("M1".to_string());
        let records = vec![feature, record("T1", "Task", Some("GONE"), 1.0, "Done")];
        let text = render_orphans(&find_orphans(&records));
        assert!(text.contains("Found 2 orphan items across 2 categories:"));
        assert!(text.contains(
            "## 🔴 Features Without Parent Epic (1)\n\nThese features should be assigned to an epic:\n\n\
             - **F1**: F1 title\n  Status: Todo | Stream: WS1\n"
        ));
        assert!(!text.contains("Items Without Milestone"));
        assert!(text.contains("- **T1**: T1 title\n  References missing parent: GONE\n"));
    }

    #[test]
    fn progress_bar_truncates() {
        assert_eq!(progress_bar(0.0), "░".repeat(20));
        assert_eq!(progress_bar(100.0), "█".repeat(20));
        assert_eq!(progress_bar(62.5), format!("{}{}", "█".repeat(12), "░".repeat(8)));
        assert_eq!(progress_bar(4.9), "░".repeat(20));
    }

    #[test]
    fn milestone_report_sections() {
        let mut records = vec![
            record("E1", "Epic", None, 0.0, "In Progress"),
            record("F1", "Feature", Some("E1"), 3.0, "Done"),
            record("F2", "Feature", Some("E1"), 1.0, "Blocked"),
        ];
        for item in &mut records {
            item.milestone = Some("M1.2: Logical Layer Integration".to_string());
        }
        let text = render_milestones(&milestone_progress(&records, Some("m1")));
        assert!(text.starts_with("# Milestone Progress Report\n\nTracking 1 milestone(s)\n\n## M1.2: Logical Layer Integration\n"));
        assert!(text.contains("**Progress**: 75.0% | ███████████████░░░░░"));
        assert!(text.contains("- ✅ Done: 1\n- 🔄 In Progress: 1\n- 🚫 Blocked: 1\n- 📋 Todo: 0\n- **Total**: 3 items"));
        assert!(text.contains("- Completed: 3.0 days\n- Total: 4.0 days"));
        assert!(text.contains("**Epics**: E1\n\n---\n"));
        assert_eq!(
            render_milestones(&[]),
            "No milestones found with assigned work items."
        );
    }
}
