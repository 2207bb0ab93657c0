#![forbid(unsafe_code)]

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Work items file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid work-items document: {0}")]
    Corrupt(String),

    #[error("Work item not found: {0}")]
    UnknownId(String),

    #[error("Invalid fields for update: {}", .0.join(", "))]
    InvalidField(Vec<String>),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to write {}: {reason} ({})", .path.display(), restore_note(.restored))]
    WriteFailed {
        path: PathBuf,
        restored: bool,
        reason: String,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }

    pub(crate) fn invalid_value(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

fn restore_note(restored: &bool) -> &'static str {
    if *restored {
        "backup restored"
    } else {
        "no backup restored"
    }
}
