#![forbid(unsafe_code)]

use super::ToolResult;
use crate::{ArgMap, McpServer};

impl McpServer {
    pub(crate) fn call_tool(&mut self, name: &str, args: &ArgMap) -> ToolResult {
        match name {
            "list_work_items" => self.tool_list_work_items(args),
            "get_work_item" => self.tool_get_work_item(args),
            "get_hierarchy" => self.tool_get_hierarchy(args),
            "validate_sync" => self.tool_validate_sync(),
            "find_orphans" => self.tool_find_orphans(),
            "get_milestone_coverage" => self.tool_get_milestone_coverage(args),
            "update_work_item" => self.tool_update_work_item(args),
            "list_pr_review_threads" => self.tool_list_pr_review_threads(args),
            "reply_to_review_thread" => self.tool_reply_to_review_thread(args),
            "resolve_review_thread" => self.tool_resolve_review_thread(args),
            _ => Err(format!("Unknown tool: {name}")),
        }
    }
}
