#![forbid(unsafe_code)]

//! Per-milestone status counts and effort rollups.

use crate::model::{Status, WorkRecord};
use crate::progress;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, PartialEq)]
pub struct MilestoneProgress {
    pub milestone: String,
    pub total_items: usize,
    pub completed_items: usize,
    pub in_progress_items: usize,
    pub blocked_items: usize,
    pub total_effort_days: f64,
    pub completed_effort_days: f64,
    pub progress_percent: f64,
    /// Ids of the epics planned against this milestone, sorted and deduplicated.
    pub epics: Vec<String>,
}

impl MilestoneProgress {
    /// Everything not done, in progress or blocked, unknown statuses included.
    pub fn todo_items(&self) -> usize {
        self.total_items
            - self.completed_items
            - self.in_progress_items
            - self.blocked_items
    }
}

/// Groups records by their exact milestone label, sorted by label.
///
/// Records without a milestone are skipped. `filter` keeps only labels that
/// contain it, ignoring case.
pub fn milestone_progress(records: &[WorkRecord], filter: Option<&str>) -> Vec<MilestoneProgress> {
    let needle = filter
        .filter(|filter| !filter.is_empty())
        .map(str::to_lowercase);

    let mut groups: BTreeMap<&str, Vec<&WorkRecord>> = BTreeMap::new();
    for record in records {
        let Some(label) = record.milestone_label() else {
            continue;
        };
        if needle
            .as_deref()
            .is_some_and(|needle| !label.to_lowercase().contains(needle))
        {
            continue;
        }
        groups.entry(label).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|(label, members)| summarize(label, &members))
        .collect()
}

fn summarize(label: &str, members: &[&WorkRecord]) -> MilestoneProgress {
    let count = |status: Status| members.iter().filter(|r| r.status == status).count();
    let total_effort_days: f64 = members.iter().map(|r| r.effort_days).sum();
    let completed_effort_days: f64 = members.iter().map(|r| r.completed_effort()).sum();
    let epics: BTreeSet<&str> = members
        .iter()
        .filter(|r| r.kind.is_epic())
        .map(|r| r.id.as_str())
        .collect();

    MilestoneProgress {
        milestone: label.to_string(),
        total_items: members.len(),
        completed_items: count(Status::Done),
        in_progress_items: count(Status::InProgress),
        blocked_items: count(Status::Blocked),
        total_effort_days,
        completed_effort_days,
        progress_percent: progress::percent(completed_effort_days, total_effort_days),
        epics: epics.into_iter().map(str::to_string).collect(),
    }
}
