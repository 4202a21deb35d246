use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::record::DocumentRecord;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk shape of `extraction_metadata.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataIndex {
    pub last_updated: Option<DateTime<Utc>>,
    pub document_count: usize,
    /// Records keyed by output name.
    pub documents: BTreeMap<String, DocumentRecord>,
}

/// Read-modify-write persistence for `extraction_metadata.json`.
///
/// Writes go to a hidden `.tmp` sibling first, then rename into place,
/// so a crash mid-write never truncates the store.
pub struct MetadataStore {
    path: PathBuf,
}

impl MetadataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the index. A missing file yields an empty index; a present
    /// but unparsable one is an error, never silently replaced.
    pub fn load(&self) -> Result<MetadataIndex, MetadataError> {
        if !self.path.exists() {
            return Ok(MetadataIndex::default());
        }
        let json = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Insert or replace the record under its output name, refresh the
    /// envelope counters, and write the store back atomically.
    pub fn upsert(&self, record: DocumentRecord) -> Result<MetadataIndex, MetadataError> {
        let mut index = self.load()?;
        index.documents.insert(record.name.clone(), record);
        index.document_count = index.documents.len();
        index.last_updated = Some(Utc::now());
        self.write(&index)?;
        Ok(index)
    }

    fn write(&self, index: &MetadataIndex) -> Result<(), MetadataError> {
        let json = serde_json::to_string_pretty(index)?;
        let tmp_path = tmp_sibling(&self.path);
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;
        info!(
            path = %self.path.display(),
            documents = index.document_count,
            "updated metadata store"
        );
        Ok(())
    }
}

/// Hidden temp file next to the target, so the rename stays on one
/// filesystem.
fn tmp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}
