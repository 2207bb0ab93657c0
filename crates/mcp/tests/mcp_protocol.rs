#![forbid(unsafe_code)]

mod support;

use serde_json::json;
use support::*;

#[test]
fn initialize_then_list_tools() {
    let mut server = Server::start(BACKLOG);
    let init = server.request(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {}
    }));
    assert_eq!(init["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(init["result"]["serverInfo"]["name"], "wbs-mcp-server");

    server.send(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}));
    let list = server.request(json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}));
    let names: Vec<&str> = list["result"]["tools"]
        .as_array()
        .expect("tools")
        .iter()
        .filter_map(|tool| tool["name"].as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "list_work_items",
            "get_work_item",
            "get_hierarchy",
            "validate_sync",
            "find_orphans",
            "get_milestone_coverage",
            "update_work_item",
            "list_pr_review_threads",
            "reply_to_review_thread",
            "resolve_review_thread",
        ]
    );
}

#[test]
fn calls_before_initialized_are_rejected() {
    let mut server = Server::start(BACKLOG);
    let resp = server.request(json!({"jsonrpc": "2.0", "id": 5, "method": "tools/list"}));
    assert_json_rpc_error(&resp, -32002);
    assert_eq!(resp["id"], 5);
}

#[test]
fn notifications_get_no_reply_and_errors_keep_the_session_alive() {
    let mut server = Server::start_initialized(BACKLOG);
    server.send(json!({"jsonrpc": "2.0", "method": "notifications/cancelled", "params": {}}));

    server.send_raw("{not json");
    assert_json_rpc_error(&server.recv(), -32700);

    server.send_raw(r#"{"jsonrpc":"2.0","id":3}"#);
    assert_json_rpc_error(&server.recv(), -32600);

    let unknown = server.request(json!({"jsonrpc": "2.0", "id": 4, "method": "prompts/list"}));
    assert_json_rpc_error(&unknown, -32601);

    let ping = server.request(json!({"jsonrpc": "2.0", "id": 6, "method": "ping"}));
    assert_eq!(ping["id"], 6);
    assert_eq!(ping["result"], json!({}));
}

#[test]
fn resources_are_empty() {
    let mut server = Server::start_initialized(BACKLOG);
    let list = server.request(json!({"jsonrpc": "2.0", "id": 7, "method": "resources/list"}));
    assert_eq!(list["result"]["resources"], json!([]));
}

#[test]
fn unknown_tools_are_tool_errors() {
    let mut server = Server::start_initialized(BACKLOG);
    let resp = server.call(8, "delete_everything", json!({}));
    assert!(is_error(&resp));
    assert_eq!(extract_tool_text(&resp), "Unknown tool: delete_everything");
}
