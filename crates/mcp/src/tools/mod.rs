#![forbid(unsafe_code)]

mod analysis;
mod definitions;
mod dispatch;
mod items;
mod review;
mod update;

pub(crate) use definitions::tool_definitions;

use wbs_storage::StoreError;

/// Rendered text, `Err` when the call failed and the result carries `isError`.
pub(crate) type ToolResult = Result<String, String>;

/// Argument and loader failures.
pub(crate) fn invalid(message: impl std::fmt::Display) -> String {
    format!("Error: {message}")
}

pub(crate) fn store_failure(err: StoreError) -> String {
    invalid(err)
}
