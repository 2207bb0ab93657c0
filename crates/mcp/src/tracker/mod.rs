#![forbid(unsafe_code)]

//! One-way push of local edits to the GitHub Projects board, plus the pull
//! request review-thread calls. Everything goes through the `gh` CLI.

mod gh;
mod project;
pub(crate) mod review;

pub(crate) use gh::GhCli;
pub(crate) use project::GhProjectSync;

use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use wbs_storage::{FieldUpdates, UpdateField};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TrackerConfig {
    pub(crate) org: String,
    pub(crate) project_number: i64,
    pub(crate) gh_bin: String,
}

#[derive(Debug, Error)]
pub(crate) enum TrackerError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("GitHub API error: {0}")]
    CommandFailed(String),
    #[error("Failed to parse response: {0}")]
    Parse(String),
    #[error("{0}")]
    Config(String),
    #[error("Field '{0}' not found in project")]
    UnknownField(String),
    #[error("Invalid {field} value '{value}'. Valid options: {}", .valid.join(", "))]
    InvalidOption {
        field: String,
        value: String,
        valid: Vec<String>,
    },
}

/// Pushes one field value to the tracker. `Ok(false)` means the issue is not
/// on the board, which is reported but not an error.
pub(crate) trait TrackerSync {
    fn sync_field(
        &mut self,
        issue_number: i64,
        field: &str,
        value: &str,
    ) -> Result<bool, TrackerError>;
}

/// Board column for a local field, when the board tracks it.
pub(crate) fn tracker_field(field: UpdateField) -> Option<&'static str> {
    match field {
        UpdateField::Status => Some("Status"),
        UpdateField::Priority => Some("Priority"),
        _ => None,
    }
}

/// Pushes every mapped field of `updates`, recording per-field success.
/// Failures are logged and kept as `false`; nothing is retried.
pub(crate) fn sync_record(
    tracker: &mut dyn TrackerSync,
    issue_number: i64,
    updates: &FieldUpdates,
) -> BTreeMap<String, bool> {
    let mut results = BTreeMap::new();
    for (field, value) in updates.iter() {
        let Some(column) = tracker_field(field) else {
            debug!(field = %field, "no tracker mapping, skipping");
            continue;
        };
        let outcome = match tracker.sync_field(issue_number, column, &value.to_string()) {
            Ok(done) => done,
            Err(err) => {
                warn!(issue_number, field = %field, error = %err, "tracker sync failed");
                false
            }
        };
        results.insert(field.as_str().to_string(), outcome);
    }
    results
}
