#![forbid(unsafe_code)]

use crate::model::{RecordKind, RecordMeta, Status, WorkRecord};

pub(crate) fn record(
    id: &str,
    kind: &str,
    parent: Option<&str>,
    effort: f64,
    status: &str,
) -> WorkRecord {
    WorkRecord {
        id: id.to_string(),
        issue_number: 0,
        kind: RecordKind::parse(kind),
        parent_id: parent.map(str::to_string),
        issue_parent: None,
        milestone: None,
        title: format!("{id} title"),
        priority: "🟡 Medium".to_string(),
        effort_days: effort,
        work_stream: "WS1".to_string(),
        status: Status::parse(status),
        meta: RecordMeta::default(),
    }
}

pub(crate) fn epic(id: &str) -> WorkRecord {
    record(id, "Epic", None, 0.0, "Todo").with_milestone("M1.1: Foundations")
}

impl WorkRecord {
    pub(crate) fn with_milestone(mut self, milestone: &str) -> Self {
        self.milestone = Some(milestone.to_string());
        self
    }

    pub(crate) fn with_issue(mut self, number: i64, parent: Option<i64>) -> Self {
        self.issue_number = number;
        self.issue_parent = parent;
        self
    }

    pub(crate) fn with_work_stream(mut self, work_stream: &str) -> Self {
        self.work_stream = work_stream.to_string();
        self
    }
}
