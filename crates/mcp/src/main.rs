#![forbid(unsafe_code)]

mod entry;
mod render;
mod server;
mod support;
mod tools;
mod tracker;

pub(crate) use support::*;

use tracing::info;
use wbs_storage::WorkItemStore;

// Clients expect the server to echo a protocol version they know.
const MCP_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "wbs-mcp-server";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub(crate) struct McpServer {
    initialized: bool,
    store: WorkItemStore,
    create_backup: bool,
    tracker_config: tracker::TrackerConfig,
    /// Connected on the first push and kept for the session.
    tracker: Option<Box<dyn tracker::TrackerSync>>,
}

fn usage() -> &'static str {
    "wbs_mcp — MCP server for the WBS backlog (work-items.yaml)\n\n\
USAGE:\n\
  wbs_mcp [--work-items PATH] [--no-backup]\n\
\n\
FLAGS:\n\
  -h, --help       Print this help and exit\n\
  -V, --version    Print version/build and exit\n\
\n\
ENVIRONMENT:\n\
  WBS_WORK_ITEMS_PATH     work-items.yaml location\n\
  WBS_MCP_NO_BACKUP       skip the .bak copy before writes\n\
  WBS_MCP_LOG, RUST_LOG   log filter (stderr)\n\
  GITHUB_TOKEN, GITHUB_ORG, GITHUB_PROJECT_NUMBER, WBS_MCP_GH_BIN\n\
\n\
NOTES:\n\
  - Default path: <repo>/8-REALIZATION/backlog/work-items.yaml\n"
}

fn version_line() -> String {
    format!("wbs_mcp {SERVER_VERSION} build={}", build_fingerprint())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = std::env::args().collect::<Vec<_>>();
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-h" | "--help"))
    {
        print!("{}", usage());
        return Ok(());
    }
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-V" | "--version"))
    {
        println!("{}", version_line());
        return Ok(());
    }

    init_logging();
    let config = RuntimeConfig::from_process();
    info!(
        version = SERVER_VERSION,
        build = build_fingerprint(),
        work_items = %config.work_items.display(),
        backups = config.create_backup,
        "starting wbs mcp server"
    );

    let mut server = McpServer::new(config);
    entry::run_stdio(&mut server)?;
    Ok(())
}
