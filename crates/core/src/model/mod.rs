#![forbid(unsafe_code)]

mod kind;
mod record;
mod status;

pub use kind::*;
pub use record::*;
pub use status::*;
