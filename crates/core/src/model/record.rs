#![forbid(unsafe_code)]

use super::{RecordKind, Status};

/// One backlog entry as loaded from the store.
///
/// Nothing here is guaranteed to be consistent with the other records: ids may
/// repeat and parent references may dangle. The analysis passes report those
/// defects instead of assuming them away.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkRecord {
    pub id: String,
    pub issue_number: i64,
    pub kind: RecordKind,
    pub parent_id: Option<String>,
    pub issue_parent: Option<i64>,
    pub milestone: Option<String>,
    pub title: String,
    pub priority: String,
    pub effort_days: f64,
    pub work_stream: String,
    pub status: Status,
    pub meta: RecordMeta,
}

/// Metadata carried for detail views and writes; never read by the analysis passes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordMeta {
    pub assignees: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub responsible_architect: String,
    pub github_type: String,
    pub github_created_at: Option<String>,
    pub github_updated_at: Option<String>,
    pub last_synced_at: Option<String>,
    pub allow_yaml_override: bool,
    pub description: String,
}

impl WorkRecord {
    /// Parent id, treating an empty string as absent.
    pub fn parent(&self) -> Option<&str> {
        non_empty(self.parent_id.as_deref())
    }

    pub fn milestone_label(&self) -> Option<&str> {
        non_empty(self.milestone.as_deref())
    }

    /// Issue numbers start at 1; zero is how unlinked parents show up in exports.
    pub fn issue_parent(&self) -> Option<i64> {
        self.issue_parent.filter(|n| *n != 0)
    }

    pub fn completed_effort(&self) -> f64 {
        if self.status.is_done() {
            self.effort_days
        } else {
            0.0
        }
    }

    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            kind: self.kind.clone(),
            status: self.status.clone(),
            priority: self.priority.clone(),
            milestone: self.milestone.clone(),
            effort_days: self.effort_days,
        }
    }
}

/// Lightweight projection used by hierarchy and listing views.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordSummary {
    pub id: String,
    pub title: String,
    pub kind: RecordKind,
    pub status: Status,
    pub priority: String,
    pub milestone: Option<String>,
    pub effort_days: f64,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
