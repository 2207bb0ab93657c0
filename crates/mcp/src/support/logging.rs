#![forbid(unsafe_code)]

use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber. Stdout carries protocol frames only.
pub(crate) fn init_logging() {
    let filter = EnvFilter::try_from_env("WBS_MCP_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
