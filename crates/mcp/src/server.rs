#![forbid(unsafe_code)]

use crate::tools::tool_definitions;
use crate::{
    JsonRpcRequest, McpServer, RuntimeConfig, json_rpc_error, json_rpc_response,
    tool_text_content,
};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};
use wbs_storage::WorkItemStore;

impl McpServer {
    pub(crate) fn new(config: RuntimeConfig) -> Self {
        Self {
            initialized: false,
            store: WorkItemStore::open(config.work_items),
            create_backup: config.create_backup,
            tracker_config: config.tracker,
            tracker: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_tracker(mut self, tracker: Box<dyn crate::tracker::TrackerSync>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub(crate) fn handle(&mut self, request: JsonRpcRequest) -> Option<Value> {
        let method = request.method.as_str();

        if method == "initialize" {
            return Some(json_rpc_response(
                request.id,
                json!({
                    "protocolVersion": crate::MCP_VERSION,
                    "serverInfo": { "name": crate::SERVER_NAME, "version": crate::SERVER_VERSION },
                    "capabilities": { "tools": {} }
                }),
            ));
        }

        if !self.initialized && method != "notifications/initialized" {
            return Some(json_rpc_error(request.id, -32002, "Server not initialized"));
        }

        if method == "notifications/initialized" {
            self.initialized = true;
            return None;
        }

        if method == "ping" {
            return Some(json_rpc_response(request.id, json!({})));
        }

        // Some clients probe resources unconditionally.
        if method == "resources/list" {
            return Some(json_rpc_response(request.id, json!({ "resources": [] })));
        }
        if method == "resources/read" {
            return Some(json_rpc_response(request.id, json!({ "contents": [] })));
        }

        if method == "tools/list" {
            return Some(json_rpc_response(
                request.id,
                json!({ "tools": tool_definitions() }),
            ));
        }

        if method == "tools/call" {
            let Some(params) = request.params.as_ref().and_then(Value::as_object) else {
                return Some(json_rpc_error(request.id, -32602, "params must be an object"));
            };
            let Some(name) = params.get("name").and_then(Value::as_str) else {
                return Some(json_rpc_error(request.id, -32602, "name must be a string"));
            };
            let args = match params.get("arguments") {
                None | Some(Value::Null) => Map::new(),
                Some(Value::Object(args)) => args.clone(),
                Some(_) => {
                    return Some(json_rpc_error(
                        request.id,
                        -32602,
                        "arguments must be an object",
                    ));
                }
            };

            debug!(tool = name, "tool call");
            let (text, is_error) = match self.call_tool(name, &args) {
                Ok(text) => (text, false),
                Err(text) => {
                    warn!(tool = name, error = %text, "tool call failed");
                    (text, true)
                }
            };
            return Some(json_rpc_response(
                request.id,
                json!({
                    "content": [tool_text_content(&text)],
                    "isError": is_error
                }),
            ));
        }

        Some(json_rpc_error(
            request.id,
            -32601,
            &format!("Method not found: {method}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_support::{SAMPLE_DOCUMENT, server_with_document};
    use crate::tracker::fake::FakeTracker;

    fn request(id: Option<i64>, method: &str, params: Option<Value>) -> JsonRpcRequest {
        serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        }))
        .expect("request")
    }

    fn initialized(server: &mut McpServer) {
        server.handle(request(Some(0), "initialize", None));
        assert!(server.handle(request(None, "notifications/initialized", None)).is_none());
    }

    #[test]
    fn initialize_reports_server_info() {
        let (_dir, mut server) = server_with_document(SAMPLE_DOCUMENT);
        let reply = server
            .handle(request(Some(1), "initialize", Some(json!({}))))
            .expect("reply");
        assert_eq!(reply["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(reply["result"]["serverInfo"]["name"], "wbs-mcp-server");
    }

    #[test]
    fn requests_before_initialization_are_refused() {
        let (_dir, mut server) = server_with_document(SAMPLE_DOCUMENT);
        let reply = server
            .handle(request(Some(3), "tools/list", None))
            .expect("reply");
        assert_eq!(reply["error"]["code"], -32002);
    }

    #[test]
    fn tools_list_and_unknown_methods() {
        let (_dir, mut server) = server_with_document(SAMPLE_DOCUMENT);
        initialized(&mut server);
        let reply = server
            .handle(request(Some(2), "tools/list", None))
            .expect("reply");
        assert_eq!(reply["result"]["tools"].as_array().map(Vec::len), Some(10));

        let reply = server
            .handle(request(Some(4), "tasks/list", None))
            .expect("reply");
        assert_eq!(reply["error"]["code"], -32601);
        assert_eq!(reply["error"]["message"], "Method not found: tasks/list");
    }

    #[test]
    fn tool_results_carry_is_error() {
        let (_dir, mut server) = server_with_document(SAMPLE_DOCUMENT);
        initialized(&mut server);

        let ok = server
            .handle(request(
                Some(5),
                "tools/call",
                Some(json!({"name": "get_work_item", "arguments": {"wbs_id": "WS-0"}})),
            ))
            .expect("reply");
        assert_eq!(ok["result"]["isError"], false);
        assert_eq!(ok["result"]["content"][0]["text"], "Work item not found: WS-0");

        let unknown = server
            .handle(request(Some(6), "tools/call", Some(json!({"name": "nope"}))))
            .expect("reply");
        assert_eq!(unknown["result"]["isError"], true);
        assert_eq!(unknown["result"]["content"][0]["text"], "Unknown tool: nope");
    }

    #[test]
    fn malformed_call_params() {
        let (_dir, mut server) = server_with_document(SAMPLE_DOCUMENT);
        initialized(&mut server);
        for params in [
            None,
            Some(json!({"arguments": {}})),
            Some(json!({"name": "list_work_items", "arguments": [1]})),
        ] {
            let reply = server
                .handle(request(Some(7), "tools/call", params))
                .expect("reply");
            assert_eq!(reply["error"]["code"], -32602);
        }
    }

    #[test]
    fn update_call_uses_the_injected_tracker() {
        let (_dir, server) = server_with_document(SAMPLE_DOCUMENT);
        let mut server = server.with_tracker(Box::new(FakeTracker::default()));
        initialized(&mut server);
        let reply = server
            .handle(request(
                Some(8),
                "tools/call",
                Some(json!({"name": "update_work_item", "arguments": {
                    "wbs_id": "WS-11110",
                    "updates": {"status": "Blocked"},
                    "push_to_github": true
                }})),
            ))
            .expect("reply");
        assert_eq!(reply["result"]["isError"], false);
        let text = reply["result"]["content"][0]["text"].as_str().unwrap_or_default();
        assert!(text.contains("✓ Synced to GitHub issue #12"), "{text}");
    }
}
