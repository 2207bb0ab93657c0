#![forbid(unsafe_code)]

use crate::{StoreError, parse_work_items};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};
use wbs_core::model::WorkRecord;
use wbs_core::query::{self, RecordFilter};

/// Reads the work-items document and keeps the last parsed snapshot.
///
/// A snapshot is reused while the file's modification time is unchanged. When
/// the time moves but the bytes hash the same, the records are kept as well.
#[derive(Debug)]
pub struct WorkItemStore {
    path: PathBuf,
    snapshot: Option<Snapshot>,
}

#[derive(Debug)]
struct Snapshot {
    records: Vec<WorkRecord>,
    modified: Option<SystemTime>,
    digest: Vec<u8>,
}

impl WorkItemStore {
    /// Creates the store without touching the file; the first `load` reads it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            snapshot: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current records, re-read only when the file changed since the last load.
    pub fn load(&mut self) -> Result<&[WorkRecord], StoreError> {
        let modified = self.modified()?;
        let fresh = self
            .snapshot
            .as_ref()
            .is_some_and(|snapshot| modified.is_some() && snapshot.modified == modified);
        if fresh {
            debug!(path = %self.path.display(), "work items cache hit");
        } else {
            self.refresh(modified, false)?;
        }
        Ok(self.records())
    }

    /// Re-reads and re-parses the file unconditionally.
    pub fn reload(&mut self) -> Result<&[WorkRecord], StoreError> {
        let modified = self.modified()?;
        self.refresh(modified, true)?;
        Ok(self.records())
    }

    pub fn get_by_id(&mut self, id: &str) -> Result<Option<WorkRecord>, StoreError> {
        Ok(query::find_by_id(self.load()?, id).cloned())
    }

    pub fn get_by_issue(&mut self, number: i64) -> Result<Option<WorkRecord>, StoreError> {
        Ok(query::find_by_issue(self.load()?, number).cloned())
    }

    pub fn filter(&mut self, filter: &RecordFilter) -> Result<Vec<WorkRecord>, StoreError> {
        Ok(filter
            .apply(self.load()?)
            .into_iter()
            .cloned()
            .collect())
    }

    fn modified(&self) -> Result<Option<SystemTime>, StoreError> {
        let metadata = fs::metadata(&self.path).map_err(|err| StoreError::io(&self.path, err))?;
        Ok(metadata.modified().ok())
    }

    fn refresh(&mut self, modified: Option<SystemTime>, force: bool) -> Result<(), StoreError> {
        let bytes = fs::read(&self.path).map_err(|err| StoreError::io(&self.path, err))?;
        let digest = Sha256::digest(&bytes).to_vec();

        if !force
            && let Some(snapshot) = self.snapshot.as_mut()
            && snapshot.digest == digest
        {
            snapshot.modified = modified;
            debug!(path = %self.path.display(), "work items touched but unchanged");
            return Ok(());
        }

        let text = String::from_utf8(bytes)
            .map_err(|_| StoreError::Corrupt("file is not valid UTF-8".to_string()))?;
        let records = parse_work_items(&text)?;
        info!(
            path = %self.path.display(),
            count = records.len(),
            "loaded work items"
        );
        self.snapshot = Some(Snapshot {
            records,
            modified,
            digest,
        });
        Ok(())
    }

    fn records(&self) -> &[WorkRecord] {
        match &self.snapshot {
            Some(snapshot) => &snapshot.records,
            None => &[],
        }
    }
}
