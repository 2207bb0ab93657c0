#![forbid(unsafe_code)]

use serde_json::{Value, json};

pub(crate) fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": "list_work_items",
            "description": "List and filter work items from work-items.yaml. Use this to explore the backlog by status, type, milestone, work stream or parent.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "status": { "type": "string", "description": "Status, case-insensitive (Todo, In Progress, Done, Blocked)" },
                    "wbs_type": { "type": "string", "description": "Type, case-insensitive (Epic, Feature, Task)" },
                    "milestone": { "type": "string", "description": "Milestone substring, e.g. 'M1.1'" },
                    "work_stream": { "type": "string", "description": "Work stream substring, e.g. 'WS1'" },
                    "parent_wbs": { "type": "string", "description": "Exact parent WBS ID, e.g. 'WS-11100'" },
                    "limit": { "type": "integer", "minimum": 0, "default": 50, "description": "Maximum number of results" }
                }
            }
        }),
        json!({
            "name": "get_work_item",
            "description": "Get full details of one work item by WBS ID or GitHub issue number.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "wbs_id": { "type": "string", "description": "WBS ID, e.g. 'WS-17101'" },
                    "issue_number": { "type": "integer", "description": "GitHub issue number (alternative to wbs_id)" }
                },
                "oneOf": [
                    { "required": ["wbs_id"] },
                    { "required": ["issue_number"] }
                ]
            }
        }),
        json!({
            "name": "get_hierarchy",
            "description": "Epic -> feature -> task tree with effort totals and progress rolled up from the leaves.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "root_wbs": { "type": "string", "description": "Root WBS ID; all top-level epics when omitted" }
                }
            }
        }),
        json!({
            "name": "validate_sync",
            "description": "Check work-items.yaml for missing parents, broken references, orphans, duplicate IDs, invalid statuses and parent cycles.",
            "inputSchema": { "type": "object", "properties": {} }
        }),
        json!({
            "name": "find_orphans",
            "description": "Find features without epics, items without milestones and broken parent references.",
            "inputSchema": { "type": "object", "properties": {} }
        }),
        json!({
            "name": "get_milestone_coverage",
            "description": "Per-milestone item counts, effort totals and completion percentage.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "milestone_filter": { "type": "string", "description": "Milestone substring, case-insensitive, e.g. 'M1'" }
                }
            }
        }),
        json!({
            "name": "update_work_item",
            "description": "Update fields of one work item in work-items.yaml, keeping the rest of the file as written. Optionally pushes status and priority to the GitHub Project.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "wbs_id": { "type": "string", "description": "WBS ID of the item to update" },
                    "updates": {
                        "type": "object",
                        "description": "Fields to set",
                        "additionalProperties": false,
                        "properties": {
                            "status": { "type": "string" },
                            "priority": { "type": "string", "description": "🚨 Critical, 🔥 High, 🟡 Medium, 🟢 Low" },
                            "milestone": { "type": ["string", "null"] },
                            "assignees": { "type": "array", "items": { "type": "string" } },
                            "start_date": { "type": ["string", "null"], "description": "YYYY-MM-DD" },
                            "end_date": { "type": ["string", "null"], "description": "YYYY-MM-DD" },
                            "effort_days": { "type": "number", "minimum": 0 },
                            "description": { "type": "string" },
                            "title": { "type": "string" },
                            "responsible_architect": { "type": "string" },
                            "allow_yaml_override": { "type": "boolean" }
                        }
                    },
                    "push_to_github": { "type": "boolean", "default": false, "description": "Also update the GitHub Project item" }
                },
                "required": ["wbs_id", "updates"]
            }
        }),
        json!({
            "name": "list_pr_review_threads",
            "description": "List unresolved review threads of a pull request; the current branch's PR when pr_number is omitted.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "pr_number": { "type": "integer", "description": "Pull request number" }
                }
            }
        }),
        json!({
            "name": "reply_to_review_thread",
            "description": "Reply to a review thread, e.g. to explain the fix made.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "thread_id": { "type": "string", "description": "Thread ID from list_pr_review_threads" },
                    "body": { "type": "string", "description": "Reply text (markdown)" }
                },
                "required": ["thread_id", "body"]
            }
        }),
        json!({
            "name": "resolve_review_thread",
            "description": "Mark a review thread as resolved.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "thread_id": { "type": "string", "description": "Thread ID from list_pr_review_threads" }
                },
                "required": ["thread_id"]
            }
        }),
    ]
}
