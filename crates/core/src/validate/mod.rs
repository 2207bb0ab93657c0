#![forbid(unsafe_code)]

//! Cross-record consistency checks.

mod cycles;

use crate::checks::{self, IdIndex};
use crate::model::{KNOWN_STATUSES, WorkRecord};
use std::collections::HashSet;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IssueType {
    MissingParent,
    MissingIssueParent,
    OrphanFeature,
    MissingMilestone,
    InvalidStatus,
    DuplicateWbsId,
    ParentCycle,
}

impl IssueType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingParent => "missing_parent",
            Self::MissingIssueParent => "missing_issue_parent",
            Self::OrphanFeature => "orphan_feature",
            Self::MissingMilestone => "missing_milestone",
            Self::InvalidStatus => "invalid_status",
            Self::DuplicateWbsId => "duplicate_wbs_id",
            Self::ParentCycle => "parent_cycle",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Self::OrphanFeature => Severity::Warning,
            Self::MissingMilestone => Severity::Info,
            Self::MissingParent
            | Self::MissingIssueParent
            | Self::InvalidStatus
            | Self::DuplicateWbsId
            | Self::ParentCycle => Severity::Error,
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub record_id: String,
    pub issue_type: IssueType,
    pub message: String,
}

impl ValidationIssue {
    fn new(issue_type: IssueType, record_id: &str, message: String) -> Self {
        Self {
            severity: issue_type.severity(),
            record_id: record_id.to_string(),
            issue_type,
            message,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationResult {
    /// True when no issue has `Severity::Error`.
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
    pub total_items: usize,
}

impl ValidationResult {
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(move |issue| issue.severity == severity)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.with_severity(severity).count()
    }

    pub fn of_type(&self, issue_type: IssueType) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(move |issue| issue.issue_type == issue_type)
    }
}

/// Checks every record and returns the findings in a stable order: all
/// per-record findings in input order, then duplicate ids, then parent cycles.
pub fn validate(records: &[WorkRecord]) -> ValidationResult {
    let index = IdIndex::build(records);
    let mut issues = Vec::new();

    for record in records {
        check_record(record, &index, &mut issues);
    }

    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id.as_str()) {
            issues.push(ValidationIssue::new(
                IssueType::DuplicateWbsId,
                &record.id,
                format!("Duplicate WBS ID: {}", record.id),
            ));
        }
    }

    for cycle in cycles::find_parent_cycles(records) {
        issues.push(ValidationIssue::new(
            IssueType::ParentCycle,
            cycle.record_id,
            format!("Parent chain forms a cycle: {}", cycle.chain.join(" -> ")),
        ));
    }

    ValidationResult {
        is_valid: !issues.iter().any(|issue| issue.severity == Severity::Error),
        issues,
        total_items: records.len(),
    }
}

fn check_record(record: &WorkRecord, index: &IdIndex<'_>, issues: &mut Vec<ValidationIssue>) {
    if let Some(parent) = checks::dangling_parent(record, index) {
        issues.push(ValidationIssue::new(
            IssueType::MissingParent,
            &record.id,
            format!("References non-existent parent: {parent}"),
        ));
    }
    if let Some(parent) = checks::dangling_issue_parent(record, index) {
        issues.push(ValidationIssue::new(
            IssueType::MissingIssueParent,
            &record.id,
            format!("References non-existent issue parent: #{parent}"),
        ));
    }
    if checks::is_orphan_feature(record) {
        issues.push(ValidationIssue::new(
            IssueType::OrphanFeature,
            &record.id,
            "Feature has no parent epic".to_string(),
        ));
    }
    if checks::is_missing_milestone(record) {
        issues.push(ValidationIssue::new(
            IssueType::MissingMilestone,
            &record.id,
            format!("{} has no milestone assigned", record.kind),
        ));
    }
    if checks::has_invalid_status(record) {
        issues.push(ValidationIssue::new(
            IssueType::InvalidStatus,
            &record.id,
            format!(
                "Invalid status '{}' (must be one of: {})",
                record.status,
                KNOWN_STATUSES.join(", ")
            ),
        ));
    }
}

#[cfg(test)]
mod tests;
