#![forbid(unsafe_code)]

use super::{ToolResult, invalid, store_failure};
use crate::render::{render_hierarchy, render_milestones, render_orphans, render_validation};
use crate::{ArgMap, McpServer, now_rfc3339, optional_string};
use wbs_core::hierarchy::build_hierarchy;
use wbs_core::milestones::milestone_progress;
use wbs_core::orphans::find_orphans;
use wbs_core::validate::validate;

impl McpServer {
    pub(crate) fn tool_get_hierarchy(&mut self, args: &ArgMap) -> ToolResult {
        let root = optional_string(args, "root_wbs")
            .map_err(invalid)?
            .filter(|root| !root.is_empty());
        let records = self.store.load().map_err(store_failure)?;
        let trees = build_hierarchy(records, root.as_deref());
        if trees.is_empty() {
            return Ok(match root {
                Some(root) => format!("No hierarchy found for root {root}"),
                None => "No hierarchy found".to_string(),
            });
        }
        Ok(render_hierarchy(&trees))
    }

    pub(crate) fn tool_validate_sync(&mut self) -> ToolResult {
        let records = self.store.load().map_err(store_failure)?;
        Ok(render_validation(&validate(records), &now_rfc3339()))
    }

    pub(crate) fn tool_find_orphans(&mut self) -> ToolResult {
        let records = self.store.load().map_err(store_failure)?;
        Ok(render_orphans(&find_orphans(records)))
    }

    pub(crate) fn tool_get_milestone_coverage(&mut self, args: &ArgMap) -> ToolResult {
        let filter = optional_string(args, "milestone_filter").map_err(invalid)?;
        let records = self.store.load().map_err(store_failure)?;
        Ok(render_milestones(&milestone_progress(
            records,
            filter.as_deref(),
        )))
    }
}
