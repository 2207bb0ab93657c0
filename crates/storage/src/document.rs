#![forbid(unsafe_code)]

use crate::StoreError;
use serde::Deserialize;
use serde_yaml::Value;
use tracing::warn;
use wbs_core::model::{RecordKind, RecordMeta, Status, WorkRecord};

/// One `work_items` entry as written in the document.
#[derive(Debug, Deserialize)]
struct WorkItemRow {
    issue_number: i64,
    wbs_id: String,
    wbs_type: String,
    #[serde(default)]
    wbs_parent: Option<String>,
    #[serde(default)]
    issue_parent: Option<i64>,
    #[serde(default)]
    milestone: Option<String>,
    title: String,
    priority: String,
    effort_days: f64,
    work_stream: String,
    status: String,
    #[serde(default)]
    assignees: Option<Vec<String>>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default)]
    responsible_architect: Option<String>,
    #[serde(default)]
    github_type: Option<String>,
    #[serde(default)]
    github_created_at: Option<String>,
    #[serde(default)]
    github_updated_at: Option<String>,
    #[serde(default)]
    last_synced_at: Option<String>,
    #[serde(default)]
    allow_yaml_override: Option<bool>,
    #[serde(default)]
    description: Option<String>,
}

impl WorkItemRow {
    fn into_record(self) -> Result<WorkRecord, String> {
        if !self.effort_days.is_finite() || self.effort_days < 0.0 {
            return Err(format!(
                "effort_days must be a non-negative number (got {})",
                self.effort_days
            ));
        }
        Ok(WorkRecord {
            id: self.wbs_id,
            issue_number: self.issue_number,
            kind: RecordKind::parse(&self.wbs_type),
            parent_id: self.wbs_parent,
            issue_parent: self.issue_parent,
            milestone: self.milestone,
            title: self.title,
            priority: self.priority,
            effort_days: self.effort_days,
            work_stream: self.work_stream,
            status: Status::parse(&self.status),
            meta: RecordMeta {
                assignees: self.assignees.unwrap_or_default(),
                start_date: self.start_date,
                end_date: self.end_date,
                responsible_architect: self.responsible_architect.unwrap_or_default(),
                github_type: self.github_type.unwrap_or_default(),
                github_created_at: self.github_created_at,
                github_updated_at: self.github_updated_at,
                last_synced_at: self.last_synced_at,
                allow_yaml_override: self.allow_yaml_override.unwrap_or(false),
                description: self.description.unwrap_or_default(),
            },
        })
    }
}

/// The raw `work_items` sequence of a document.
pub(crate) fn work_item_entries(text: &str) -> Result<Vec<Value>, StoreError> {
    let root: Value = serde_yaml::from_str(text)
        .map_err(|err| StoreError::Corrupt(format!("invalid YAML syntax: {err}")))?;
    match root.get("work_items") {
        None => Err(StoreError::Corrupt("missing 'work_items' key".to_string())),
        Some(Value::Sequence(entries)) => Ok(entries.clone()),
        Some(_) => Err(StoreError::Corrupt(
            "'work_items' must be a list".to_string(),
        )),
    }
}

/// Parses a work-items document.
///
/// Entries that do not describe a valid record are skipped with a warning;
/// only document-level problems are errors.
pub fn parse_work_items(text: &str) -> Result<Vec<WorkRecord>, StoreError> {
    let entries = work_item_entries(text)?;
    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let parsed = serde_yaml::from_value::<WorkItemRow>(entry)
            .map_err(|err| err.to_string())
            .and_then(WorkItemRow::into_record);
        match parsed {
            Ok(record) => records.push(record),
            Err(reason) => warn!(index, %reason, "skipping invalid work item"),
        }
    }
    Ok(records)
}
