#![forbid(unsafe_code)]
#![allow(dead_code)]

use serde_json::{Value, json};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use tempfile::TempDir;

pub(crate) const BACKLOG: &str = "\
# backlog under test
work_items:
- issue_number: 21
  wbs_id: WS-21000
  wbs_type: Epic
  milestone: 'M2.1: Sync'
  title: Tracker sync
  priority: 🔥 High
  effort_days: 0
  work_stream: WS2 Integrations
  status: In Progress
- issue_number: 22
  wbs_id: WS-21100
  wbs_type: Feature
  wbs_parent: WS-21000
  issue_parent: 21
  milestone: 'M2.1: Sync'
  title: Board push
  priority: 🟡 Medium
  effort_days: 5
  work_stream: WS2 Integrations
  status: Done
- issue_number: 23
  wbs_id: WS-21200
  wbs_type: Feature
  wbs_parent: WS-21000
  issue_parent: 21
  milestone: 'M2.1: Sync'
  title: Review threads
  priority: 🟡 Medium
  effort_days: 3
  work_stream: WS2 Integrations
  status: Todo   # next up
- issue_number: 24
  wbs_id: WS-29900
  wbs_type: Feature
  title: Unplanned
  priority: 🟢 Low
  effort_days: 1
  work_stream: WS9
  status: Todo
";

/// Scratch directory holding `work-items.yaml`.
pub(crate) struct Backlog {
    dir: TempDir,
}

impl Backlog {
    pub(crate) fn new(text: &str) -> Self {
        let dir = TempDir::new().expect("temp dir");
        std::fs::write(dir.path().join("work-items.yaml"), text).expect("write backlog");
        Self { dir }
    }

    pub(crate) fn path(&self) -> PathBuf {
        self.dir.path().join("work-items.yaml")
    }

    pub(crate) fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub(crate) fn read(&self) -> String {
        std::fs::read_to_string(self.path()).expect("read backlog")
    }
}

pub(crate) fn command(work_items: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_wbs_mcp"));
    command
        .arg("--work-items")
        .arg(work_items)
        .env_remove("GITHUB_TOKEN")
        .env_remove("WBS_WORK_ITEMS_PATH")
        .env_remove("WBS_MCP_NO_BACKUP")
        .env("WBS_MCP_GH_BIN", "/nonexistent/wbs-mcp-test-gh")
        .env("WBS_MCP_LOG", "warn");
    command
}

pub(crate) struct Server {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    pub(crate) backlog: Backlog,
}

impl Server {
    pub(crate) fn start(text: &str) -> Self {
        Self::start_with_args(text, &[])
    }

    pub(crate) fn start_with_args(text: &str, extra_args: &[&str]) -> Self {
        let backlog = Backlog::new(text);
        let mut child = command(&backlog.path())
            .args(extra_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn wbs_mcp");

        let stdin = child.stdin.take().expect("stdin");
        let stdout = BufReader::new(child.stdout.take().expect("stdout"));
        Self {
            child,
            stdin,
            stdout,
            backlog,
        }
    }

    pub(crate) fn send(&mut self, req: Value) {
        writeln!(self.stdin, "{req}").expect("write request");
        self.stdin.flush().expect("flush request");
    }

    pub(crate) fn send_raw(&mut self, line: &str) {
        writeln!(self.stdin, "{line}").expect("write line");
        self.stdin.flush().expect("flush line");
    }

    pub(crate) fn recv(&mut self) -> Value {
        let mut line = String::new();
        self.stdout.read_line(&mut line).expect("read response");
        assert!(!line.trim().is_empty(), "empty response line");
        serde_json::from_str(&line).expect("parse response json")
    }

    pub(crate) fn request(&mut self, req: Value) -> Value {
        self.send(req);
        self.recv()
    }

    pub(crate) fn initialize_default(&mut self) {
        let _ = self.request(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": { "protocolVersion": "2024-11-05", "capabilities": {}, "clientInfo": { "name": "test", "version": "0" } }
        }));
        self.send(json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized",
            "params": {}
        }));
    }

    pub(crate) fn start_initialized(text: &str) -> Self {
        let mut server = Self::start(text);
        server.initialize_default();
        server
    }

    pub(crate) fn call(&mut self, id: i64, name: &str, arguments: Value) -> Value {
        self.request(json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments }
        }))
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub(crate) fn extract_tool_text(resp: &Value) -> String {
    resp.get("result")
        .and_then(|v| v.get("content"))
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("text"))
        .and_then(|v| v.as_str())
        .expect("result.content[0].text")
        .to_string()
}

pub(crate) fn is_error(resp: &Value) -> bool {
    resp.get("result")
        .and_then(|v| v.get("isError"))
        .and_then(|v| v.as_bool())
        .expect("result.isError")
}

pub(crate) fn assert_json_rpc_error(resp: &Value, expected_code: i64) {
    let code = resp
        .get("error")
        .and_then(|v| v.get("code"))
        .and_then(|v| v.as_i64())
        .expect("error.code");
    assert_eq!(code, expected_code);
}
