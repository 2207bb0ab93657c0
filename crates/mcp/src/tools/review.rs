#![forbid(unsafe_code)]

use super::{ToolResult, invalid};
use crate::render::{render_reply, render_resolve, render_threads};
use crate::tracker::{GhCli, review};
use crate::{ArgMap, McpServer, optional_i64, require_string};

impl McpServer {
    fn gh(&self) -> GhCli {
        GhCli::new(self.tracker_config.gh_bin.clone())
    }

    pub(crate) fn tool_list_pr_review_threads(&mut self, args: &ArgMap) -> ToolResult {
        let pr_number = optional_i64(args, "pr_number").map_err(invalid)?;
        review::list_unresolved(&self.gh(), pr_number)
            .map(|found| render_threads(&found))
            .map_err(|err| format!("❌ Failed to get review threads: {err}"))
    }

    pub(crate) fn tool_reply_to_review_thread(&mut self, args: &ArgMap) -> ToolResult {
        let thread_id = require_string(args, "thread_id").map_err(invalid)?;
        let body = require_string(args, "body").map_err(invalid)?;
        review::reply(&self.gh(), &thread_id, &body)
            .map(|_| render_reply(&thread_id))
            .map_err(|err| format!("❌ Failed to reply: {err}"))
    }

    pub(crate) fn tool_resolve_review_thread(&mut self, args: &ArgMap) -> ToolResult {
        let thread_id = require_string(args, "thread_id").map_err(invalid)?;
        review::resolve(&self.gh(), &thread_id)
            .map(|_| render_resolve(&thread_id))
            .map_err(|err| format!("❌ Failed to resolve: {err}"))
    }
}
