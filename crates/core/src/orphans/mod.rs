#![forbid(unsafe_code)]

//! Remediation buckets for records with missing or broken relationships.

use crate::checks::{self, IdIndex};
use crate::model::WorkRecord;

/// Records needing attention, grouped by the fix they need.
///
/// A record may appear in several buckets. Entries borrow from the input slice
/// and keep its order.
#[derive(Debug, Default, PartialEq)]
pub struct OrphanReport<'a> {
    pub features_without_epic: Vec<&'a WorkRecord>,
    pub items_without_milestone: Vec<&'a WorkRecord>,
    pub broken_parent_refs: Vec<&'a WorkRecord>,
}

impl OrphanReport<'_> {
    /// Total bucket entries, counting a record once per bucket it lands in.
    pub fn total(&self) -> usize {
        self.features_without_epic.len()
            + self.items_without_milestone.len()
            + self.broken_parent_refs.len()
    }

    /// Number of non-empty buckets.
    pub fn categories(&self) -> usize {
        [
            &self.features_without_epic,
            &self.items_without_milestone,
            &self.broken_parent_refs,
        ]
        .iter()
        .filter(|bucket| !bucket.is_empty())
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

pub fn find_orphans(records: &[WorkRecord]) -> OrphanReport<'_> {
    let index = IdIndex::build(records);
    let mut report = OrphanReport::default();
    for record in records {
        if checks::is_orphan_feature(record) {
            report.features_without_epic.push(record);
        }
        if checks::is_missing_milestone(record) {
            report.items_without_milestone.push(record);
        }
        if checks::dangling_parent(record, &index).is_some() {
            report.broken_parent_refs.push(record);
        }
    }
    report
}
