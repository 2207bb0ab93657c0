#![forbid(unsafe_code)]

//! In-place updates of single work items.

mod fields;
mod patch;

pub use fields::{FieldUpdates, FieldValue, UpdateField};

use crate::document::work_item_entries;
use crate::{StoreError, parse_work_items};
use serde_yaml::Value;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use wbs_core::model::WorkRecord;
use wbs_core::query;

/// `work-items.yaml` -> `work-items.yaml.bak`, next to the original.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".bak");
    path.with_file_name(name)
}

#[derive(Clone, Debug)]
pub struct WorkItemWriter {
    path: PathBuf,
}

impl WorkItemWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrites the fields of the first entry whose `wbs_id` is `id` and
    /// returns the record as it now reads.
    ///
    /// Only the lines of the touched keys change. The new text is parsed and
    /// checked before anything is written, so a rejected update leaves the
    /// file untouched. With `create_backup`, the previous file is copied to
    /// [`backup_path`] first and copied back if the write fails.
    pub fn update(
        &self,
        id: &str,
        updates: &FieldUpdates,
        create_backup: bool,
    ) -> Result<WorkRecord, StoreError> {
        let text = fs::read_to_string(&self.path).map_err(|err| StoreError::io(&self.path, err))?;
        let entries = work_item_entries(&text)?;
        let index = entries
            .iter()
            .position(|entry| entry.get("wbs_id").and_then(Value::as_str) == Some(id))
            .ok_or_else(|| StoreError::UnknownId(id.to_string()))?;

        let patched = if updates.is_empty() {
            text.clone()
        } else {
            patch::patch_entry(&text, index, entries.len(), updates)?
        };

        if work_item_entries(&patched)?.len() != entries.len() {
            return Err(StoreError::Corrupt(
                "update would change the number of work items".to_string(),
            ));
        }
        let record = query::find_by_id(&parse_work_items(&patched)?, id)
            .cloned()
            .ok_or_else(|| {
                StoreError::Corrupt(format!("work item {id} is not valid after the update"))
            })?;

        if updates.is_empty() {
            return Ok(record);
        }

        let backup = if create_backup {
            let backup = backup_path(&self.path);
            fs::copy(&self.path, &backup).map_err(|err| StoreError::io(&backup, err))?;
            info!(backup = %backup.display(), "created backup");
            Some(backup)
        } else {
            None
        };

        if let Err(err) = self.commit(&patched) {
            let restored = backup
                .as_deref()
                .is_some_and(|backup| restore(backup, &self.path));
            error!(path = %self.path.display(), %err, restored, "work items write failed");
            return Err(StoreError::WriteFailed {
                path: self.path.clone(),
                restored,
                reason: err.to_string(),
            });
        }

        for (field, value) in updates.iter() {
            info!(id, field = field.as_str(), %value, "updated work item field");
        }
        Ok(record)
    }

    fn commit(&self, text: &str) -> std::io::Result<()> {
        let tmp = self
            .path
            .with_extension(format!("yaml.tmp.{}", std::process::id()));
        let result = fs::metadata(&self.path).and_then(|metadata| {
            fs::write(&tmp, text)?;
            fs::set_permissions(&tmp, metadata.permissions())?;
            fs::rename(&tmp, &self.path)
        });
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }
}

fn restore(backup: &Path, path: &Path) -> bool {
    match fs::copy(backup, path) {
        Ok(_) => {
            error!(backup = %backup.display(), "restored work items from backup");
            true
        }
        Err(err) => {
            error!(backup = %backup.display(), %err, "failed to restore backup");
            false
        }
    }
}
