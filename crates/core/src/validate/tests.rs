#![forbid(unsafe_code)]

use super::*;
use crate::fixtures::{epic, record};

fn types(result: &ValidationResult) -> Vec<(&str, &str)> {
    result
        .issues
        .iter()
        .map(|issue| (issue.record_id.as_str(), issue.issue_type.as_str()))
        .collect()
}

#[test]
fn clean_backlog_is_valid() {
    let records = vec![
        epic("E1"),
        record("F1", "Feature", Some("E1"), 2.0, "Done").with_milestone("M1"),
        record("T1", "Task", Some("F1"), 1.0, "In Progress"),
    ];
    let result = validate(&records);
    assert!(result.is_valid);
    assert!(result.issues.is_empty());
    assert_eq!(result.total_items, 3);
}

#[test]
fn empty_input_is_valid() {
    let result = validate(&[]);
    assert!(result.is_valid);
    assert_eq!(result.total_items, 0);
}

#[test]
fn repeated_id_reports_each_repeat() {
    let records = vec![
        record("A", "Task", None, 1.0, "Todo"),
        record("A", "Task", None, 1.0, "Todo"),
        record("A", "Task", None, 1.0, "Todo"),
        record("B", "Task", None, 1.0, "Todo"),
    ];
    let result = validate(&records);
    assert_eq!(result.of_type(IssueType::DuplicateWbsId).count(), 2);
    assert_eq!(result.issues[0].message, "Duplicate WBS ID: A");
    assert!(!result.is_valid);
}

#[test]
fn dangling_parent_is_one_error() {
    let records = vec![record("T1", "Task", Some("WS-404"), 1.0, "Todo")];
    let result = validate(&records);
    assert_eq!(types(&result), vec![("T1", "missing_parent")]);
    let issue = &result.issues[0];
    assert_eq!(issue.severity, Severity::Error);
    assert_eq!(issue.message, "References non-existent parent: WS-404");
    assert!(!result.is_valid);
}

#[test]
fn dangling_issue_parent_is_an_error() {
    let records = vec![
        record("T1", "Task", None, 1.0, "Todo").with_issue(7, Some(404)),
        record("T2", "Task", None, 1.0, "Todo").with_issue(8, Some(7)),
    ];
    let result = validate(&records);
    assert_eq!(types(&result), vec![("T1", "missing_issue_parent")]);
    assert_eq!(
        result.issues[0].message,
        "References non-existent issue parent: #404"
    );
}

#[test]
fn warnings_and_info_keep_backlog_valid() {
    let records = vec![
        record("E1", "Epic", None, 0.0, "Todo"),
        record("F1", "Feature", None, 1.0, "Todo").with_milestone("M1"),
    ];
    let result = validate(&records);
    assert_eq!(
        types(&result),
        vec![("E1", "missing_milestone"), ("F1", "orphan_feature")]
    );
    assert_eq!(result.issues[0].severity, Severity::Info);
    assert_eq!(result.issues[0].message, "Epic has no milestone assigned");
    assert_eq!(result.issues[1].severity, Severity::Warning);
    assert_eq!(result.issues[1].message, "Feature has no parent epic");
    assert!(result.is_valid);
    assert_eq!(result.count(Severity::Warning), 1);
    assert_eq!(result.count(Severity::Info), 1);
    assert_eq!(result.count(Severity::Error), 0);
}

#[test]
fn invalid_status_lists_allowed_values() {
    let records = vec![record("T1", "Task", None, 1.0, "Waiting")];
    let result = validate(&records);
    assert_eq!(types(&result), vec![("T1", "invalid_status")]);
    assert_eq!(
        result.issues[0].message,
        "Invalid status 'Waiting' (must be one of: Todo, In Progress, Done, Blocked)"
    );
}

#[test]
fn status_match_is_case_sensitive() {
    let records = vec![record("T1", "Task", None, 1.0, "done")];
    assert_eq!(
        validate(&records).of_type(IssueType::InvalidStatus).count(),
        1
    );
}

#[test]
fn per_record_checks_come_first_then_duplicates() {
    let records = vec![
        record("F1", "Feature", None, 1.0, "Nope"),
        record("F1", "Feature", Some("X"), 1.0, "Todo"),
    ];
    let result = validate(&records);
    assert_eq!(
        types(&result),
        vec![
            ("F1", "orphan_feature"),
            ("F1", "missing_milestone"),
            ("F1", "invalid_status"),
            ("F1", "missing_parent"),
            ("F1", "missing_milestone"),
            ("F1", "duplicate_wbs_id"),
        ]
    );
}

#[test]
fn two_node_cycle_reports_both_members() {
    let records = vec![
        record("A", "Task", Some("B"), 1.0, "Todo"),
        record("B", "Task", Some("A"), 1.0, "Todo"),
    ];
    let result = validate(&records);
    assert_eq!(
        types(&result),
        vec![("A", "parent_cycle"), ("B", "parent_cycle")]
    );
    assert_eq!(
        result.issues[0].message,
        "Parent chain forms a cycle: A -> B -> A"
    );
    assert_eq!(
        result.issues[1].message,
        "Parent chain forms a cycle: B -> A -> B"
    );
    assert!(!result.is_valid);
}

#[test]
fn self_parent_is_a_cycle() {
    let records = vec![record("A", "Task", Some("A"), 1.0, "Todo")];
    let result = validate(&records);
    assert_eq!(types(&result), vec![("A", "parent_cycle")]);
    assert_eq!(result.issues[0].message, "Parent chain forms a cycle: A -> A");
}

#[test]
fn tail_leading_into_cycle_is_not_reported() {
    let records = vec![
        record("T", "Task", Some("A"), 1.0, "Todo"),
        record("A", "Task", Some("B"), 1.0, "Todo"),
        record("B", "Task", Some("C"), 1.0, "Todo"),
        record("C", "Task", Some("A"), 1.0, "Todo"),
        record("U", "Task", Some("T"), 1.0, "Todo"),
    ];
    let result = validate(&records);
    assert_eq!(
        types(&result),
        vec![
            ("A", "parent_cycle"),
            ("B", "parent_cycle"),
            ("C", "parent_cycle")
        ]
    );
    assert_eq!(
        result.issues[1].message,
        "Parent chain forms a cycle: B -> C -> A -> B"
    );
}

#[test]
fn validation_is_idempotent() {
    let records = vec![
        record("F1", "Feature", None, 1.0, "Nope"),
        record("F1", "Feature", Some("X"), 1.0, "Todo"),
        record("A", "Task", Some("A"), 1.0, "Todo"),
    ];
    assert_eq!(validate(&records), validate(&records));
}
