#![forbid(unsafe_code)]

//! Record-level predicates shared by the validator and the orphan finder.
//!
//! Both consumers must agree on what "orphaned" means, so the conditions live
//! here and nowhere else.

use crate::model::WorkRecord;
use std::collections::HashSet;

/// Membership sets over one record slice, built once per pass.
#[derive(Debug, Default)]
pub struct IdIndex<'a> {
    ids: HashSet<&'a str>,
    issues: HashSet<i64>,
}

impl<'a> IdIndex<'a> {
    pub fn build(records: &'a [WorkRecord]) -> Self {
        let mut index = Self::default();
        for record in records {
            index.ids.insert(record.id.as_str());
            index.issues.insert(record.issue_number);
        }
        index
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn has_issue(&self, number: i64) -> bool {
        self.issues.contains(&number)
    }
}

pub fn is_orphan_feature(record: &WorkRecord) -> bool {
    record.kind.is_feature() && record.parent().is_none()
}

pub fn is_missing_milestone(record: &WorkRecord) -> bool {
    record.kind.expects_milestone() && record.milestone_label().is_none()
}

pub fn has_invalid_status(record: &WorkRecord) -> bool {
    !record.status.is_known()
}

/// The declared parent id when it points at no record.
pub fn dangling_parent<'r>(record: &'r WorkRecord, index: &IdIndex<'_>) -> Option<&'r str> {
    record.parent().filter(|parent| !index.has_id(parent))
}

pub fn dangling_issue_parent(record: &WorkRecord, index: &IdIndex<'_>) -> Option<i64> {
    record.issue_parent().filter(|parent| !index.has_issue(*parent))
}
