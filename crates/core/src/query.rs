#![forbid(unsafe_code)]

//! Lookups and listing filters over the loaded records.

use crate::model::WorkRecord;

/// Listing criteria combined with AND. Unset or empty criteria match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Case-insensitive equality.
    pub status: Option<String>,
    /// Case-insensitive equality.
    pub kind: Option<String>,
    /// Case-insensitive substring; records without a milestone never match.
    pub milestone: Option<String>,
    /// Case-insensitive substring.
    pub work_stream: Option<String>,
    /// Exact parent id.
    pub parent_id: Option<String>,
}

impl RecordFilter {
    pub fn is_empty(&self) -> bool {
        [
            &self.status,
            &self.kind,
            &self.milestone,
            &self.work_stream,
            &self.parent_id,
        ]
        .iter()
        .all(|criterion| active(criterion).is_none())
    }

    pub fn matches(&self, record: &WorkRecord) -> bool {
        if let Some(status) = active(&self.status)
            && !record.status.as_str().eq_ignore_ascii_case(status)
        {
            return false;
        }
        if let Some(kind) = active(&self.kind)
            && !record.kind.as_str().eq_ignore_ascii_case(kind)
        {
            return false;
        }
        if let Some(milestone) = active(&self.milestone) {
            match record.milestone_label() {
                Some(label) if contains_ignore_case(label, milestone) => {}
                _ => return false,
            }
        }
        if let Some(work_stream) = active(&self.work_stream)
            && !contains_ignore_case(&record.work_stream, work_stream)
        {
            return false;
        }
        if let Some(parent_id) = active(&self.parent_id)
            && record.parent_id.as_deref() != Some(parent_id)
        {
            return false;
        }
        true
    }

    /// Matching records in input order.
    pub fn apply<'a>(&self, records: &'a [WorkRecord]) -> Vec<&'a WorkRecord> {
        records.iter().filter(|record| self.matches(record)).collect()
    }
}

/// First record carrying `id`.
pub fn find_by_id<'a>(records: &'a [WorkRecord], id: &str) -> Option<&'a WorkRecord> {
    records.iter().find(|record| record.id == id)
}

/// First record linked to tracker issue `number`.
pub fn find_by_issue(records: &[WorkRecord], number: i64) -> Option<&WorkRecord> {
    records.iter().find(|record| record.issue_number == number)
}

fn active(criterion: &Option<String>) -> Option<&str> {
    criterion.as_deref().filter(|value| !value.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
