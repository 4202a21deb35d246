use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Derive a stable document ID from the source string.
///
/// First 16 hex chars of the SHA-256 digest, so the same URL or path
/// always maps to the same ID across runs.
pub fn doc_id(source: &str) -> String {
    let digest = Sha256::digest(source.as_bytes());
    let hex = format!("{digest:x}");
    hex[..16].to_string()
}

/// Flatten an output name to something safe for filenames: every char
/// outside `[alphanumeric _ -]` becomes `_`.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Repo-relative artifact paths, as they appear after committing the
/// output directory. Stored in the record so a raw-file URL can be
/// built without touching the filesystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPaths {
    pub pdf: String,
    pub full_text: String,
    pub chunks: String,
}

/// One extracted document, as stored in `extraction_metadata.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Stable hash of the source (see [`doc_id`]).
    pub id: String,
    /// URL or local path the PDF came from.
    pub source: String,
    /// Sanitized output name; also the key in the metadata store.
    pub name: String,
    pub title: String,
    pub tags: Vec<String>,
    /// Extraction backend that produced the text.
    pub backend: String,
    pub page_count: usize,
    pub char_count: usize,
    pub chunk_count: usize,
    /// PDF size in MB, rounded to two decimals.
    pub pdf_size_mb: f64,
    pub extracted_at: DateTime<Utc>,
    pub paths: RecordPaths,
}

/// Round a byte count to MB with two decimals.
pub fn size_mb(bytes: u64) -> f64 {
    let mb = bytes as f64 / (1024.0 * 1024.0);
    (mb * 100.0).round() / 100.0
}
