#![forbid(unsafe_code)]

use super::{ToolResult, invalid, store_failure};
use crate::render::{render_detail, render_list};
use crate::{ArgMap, McpServer, optional_i64, optional_string, optional_usize};
use wbs_core::query::RecordFilter;

const DEFAULT_LIST_LIMIT: usize = 50;

impl McpServer {
    pub(crate) fn tool_list_work_items(&mut self, args: &ArgMap) -> ToolResult {
        let filter = RecordFilter {
            status: optional_string(args, "status").map_err(invalid)?,
            kind: optional_string(args, "wbs_type").map_err(invalid)?,
            milestone: optional_string(args, "milestone").map_err(invalid)?,
            work_stream: optional_string(args, "work_stream").map_err(invalid)?,
            parent_id: optional_string(args, "parent_wbs").map_err(invalid)?,
        };
        let limit = optional_usize(args, "limit")
            .map_err(invalid)?
            .unwrap_or(DEFAULT_LIST_LIMIT);

        let mut records = self.store.filter(&filter).map_err(store_failure)?;
        records.truncate(limit);
        Ok(render_list(&records))
    }

    /// `wbs_id` wins when both keys are given.
    pub(crate) fn tool_get_work_item(&mut self, args: &ArgMap) -> ToolResult {
        let wbs_id = optional_string(args, "wbs_id")
            .map_err(invalid)?
            .filter(|id| !id.is_empty());
        let issue_number = optional_i64(args, "issue_number")
            .map_err(invalid)?
            .filter(|number| *number != 0);

        let (found, missing) = match (wbs_id, issue_number) {
            (Some(id), _) => (
                self.store.get_by_id(&id).map_err(store_failure)?,
                id,
            ),
            (None, Some(number)) => (
                self.store.get_by_issue(number).map_err(store_failure)?,
                format!("#{number}"),
            ),
            (None, None) => {
                return Err(invalid("Must provide either wbs_id or issue_number"));
            }
        };
        Ok(match found {
            Some(record) => render_detail(&record),
            None => format!("Work item not found: {missing}"),
        })
    }
}
