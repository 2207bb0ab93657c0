#![forbid(unsafe_code)]

//! Typed readers for tool-call arguments. Errors are the message shown after
//! `Error: ` in the tool result.

mod bools;
mod numbers;
mod strings;

pub(crate) use bools::*;
pub(crate) use numbers::*;
pub(crate) use strings::*;

pub(crate) type ArgMap = serde_json::Map<String, serde_json::Value>;
