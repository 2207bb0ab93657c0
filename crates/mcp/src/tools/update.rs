#![forbid(unsafe_code)]

use super::{ToolResult, invalid};
use crate::render::{SyncOutcome, UpdateOutcome, render_update};
use crate::tracker::{GhProjectSync, sync_record};
use crate::{ArgMap, McpServer, optional_bool, optional_object, require_string};
use tracing::warn;
use wbs_storage::{FieldUpdates, StoreError, WorkItemWriter};

impl McpServer {
    pub(crate) fn tool_update_work_item(&mut self, args: &ArgMap) -> ToolResult {
        let wbs_id = require_string(args, "wbs_id").map_err(invalid)?;
        let updates = optional_object(args, "updates")
            .map_err(invalid)?
            .filter(|updates| !updates.is_empty())
            .ok_or_else(|| invalid("updates must be a non-empty object"))?;
        let push = optional_bool(args, "push_to_github")
            .map_err(invalid)?
            .unwrap_or(false);

        FieldUpdates::from_json(updates)
            .and_then(|updates| self.apply_update(&wbs_id, &updates, push))
            .map(|outcome| render_update(&outcome))
            .map_err(|err| format!("❌ Update failed: {err}"))
    }

    /// Writes the document, refreshes the cached snapshot, then optionally
    /// pushes the tracked fields. A failed push never undoes the write.
    pub(crate) fn apply_update(
        &mut self,
        wbs_id: &str,
        updates: &FieldUpdates,
        push: bool,
    ) -> Result<UpdateOutcome, StoreError> {
        let record = WorkItemWriter::new(self.store.path()).update(
            wbs_id,
            updates,
            self.create_backup,
        )?;
        if let Err(err) = self.store.reload() {
            warn!(error = %err, "reload after update failed");
        }

        let sync = if !push {
            SyncOutcome::NotRequested
        } else if record.issue_number == 0 {
            SyncOutcome::Failed("No GitHub issue linked to work item".to_string())
        } else {
            self.push_to_tracker(record.issue_number, updates)
        };

        Ok(UpdateOutcome {
            record_id: record.id,
            issue_number: record.issue_number,
            fields: updates.iter().map(|(field, _)| field.to_string()).collect(),
            sync,
        })
    }

    fn push_to_tracker(&mut self, issue_number: i64, updates: &FieldUpdates) -> SyncOutcome {
        if self.tracker.is_none() {
            match GhProjectSync::connect(&self.tracker_config) {
                Ok(connected) => self.tracker = Some(Box::new(connected)),
                Err(err) => {
                    warn!(error = %err, "tracker unavailable");
                    return SyncOutcome::Failed(err.to_string());
                }
            }
        }
        let Some(tracker) = self.tracker.as_mut() else {
            return SyncOutcome::Failed("tracker unavailable".to_string());
        };

        let results = sync_record(tracker.as_mut(), issue_number, updates);
        if results.is_empty() {
            return SyncOutcome::Failed("No tracker-mapped fields to sync".to_string());
        }
        let failed: Vec<&str> = results
            .iter()
            .filter(|(_, done)| !**done)
            .map(|(field, _)| field.as_str())
            .collect();
        if failed.is_empty() {
            SyncOutcome::Synced
        } else {
            SyncOutcome::Failed(format!("Failed to sync fields: {}", failed.join(", ")))
        }
    }
}
