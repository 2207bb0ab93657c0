#![forbid(unsafe_code)]

mod args;
mod build_info;
mod jsonrpc;
mod logging;
mod runtime;
mod time;

pub(crate) use args::*;
pub(crate) use build_info::*;
pub(crate) use jsonrpc::*;
pub(crate) use logging::*;
pub(crate) use runtime::*;
pub(crate) use time::*;
