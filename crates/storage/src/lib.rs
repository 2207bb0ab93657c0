#![forbid(unsafe_code)]

//! File-backed persistence for the work-items document.

mod document;
mod error;
mod loader;
mod writer;

pub use document::parse_work_items;
pub use error::StoreError;
pub use loader::WorkItemStore;
pub use writer::{FieldUpdates, FieldValue, UpdateField, WorkItemWriter, backup_path};
