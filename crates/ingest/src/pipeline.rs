//! The staged extraction pipeline: resolve, extract, chunk, record.
//!
//! Stages run strictly in order; the first failure aborts the run with
//! an error naming the stage. There are no retries, and artifacts
//! written before the failure stay on disk (re-running the same source
//! resumes cheaply thanks to the download skip).

use std::fmt;
use std::path::PathBuf;

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use pdfstash_core::store::MetadataError;
use pdfstash_core::{
    doc_id, sanitize_name, size_mb, Config, DocumentRecord, MetadataStore, OutputLayout,
};

use crate::chunker::Chunker;
use crate::extract::{pdf_title, BackendSet, ExtractError};
use crate::source::{ResolveError, Resolver};

/// Where in the pipeline a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolving,
    Extracting,
    Chunking,
    Recording,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Resolving => "resolving",
            Stage::Extracting => "extracting",
            Stage::Chunking => "chunking",
            Stage::Recording => "recording",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("resolving: {0}")]
    Resolve(#[from] ResolveError),

    #[error("extracting: {0}")]
    Extract(#[from] ExtractError),

    #[error("recording: {0}")]
    Record(#[from] MetadataError),

    /// Artifact write failure, tagged with the stage it interrupted.
    #[error("{stage}: I/O error: {source}")]
    Io {
        stage: Stage,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Resolve(_) => Stage::Resolving,
            PipelineError::Extract(_) => Stage::Extracting,
            PipelineError::Record(_) => Stage::Recording,
            PipelineError::Io { stage, .. } => *stage,
        }
    }
}

/// One extraction job, as parsed from the command line.
#[derive(Debug, Clone, Default)]
pub struct ExtractRequest {
    /// URL, Google Drive share link, or local path.
    pub source: String,
    /// Base name for output files; defaults to the document ID.
    pub output_name: Option<String>,
    /// Title override; otherwise probed from the PDF, then the name.
    pub title: Option<String>,
    pub tags: Vec<String>,
    /// Re-download even when the PDF artifact already exists.
    pub force: bool,
}

/// Everything a caller needs to report on a finished run.
#[derive(Debug)]
pub struct PipelineReport {
    pub record: DocumentRecord,
    pub output_dir: PathBuf,
    pub pdf_path: PathBuf,
    pub text_path: PathBuf,
    pub chunk_dir: PathBuf,
    pub metadata_path: PathBuf,
}

pub struct Pipeline {
    config: Config,
    backends: BackendSet,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self::with_backends(config, BackendSet::detected())
    }

    /// Run with an explicit backend list (tests inject stubs here).
    pub fn with_backends(config: Config, backends: BackendSet) -> Self {
        Self { config, backends }
    }

    pub async fn run(&self, request: ExtractRequest) -> Result<PipelineReport, PipelineError> {
        let id = doc_id(&request.source);
        // An empty name would make chunk_dir the shared chunks/ root
        // itself; treat it like a missing name.
        let name = request
            .output_name
            .as_deref()
            .map(sanitize_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| id.clone());
        info!(source = %request.source, id = %id, name = %name, "starting extraction");

        let layout = OutputLayout::new(&self.config.output_directory)
            .map_err(|e| PipelineError::Io { stage: Stage::Resolving, source: e })?;

        // ── Resolving ───────────────────────────────────────────────
        let resolver = Resolver::new(self.config.max_file_size_mb, request.force)?;
        let resolved = resolver.resolve(&request.source, &layout.pdf_path(&name)).await?;
        info!(
            path = %resolved.pdf_path.display(),
            size_mb = size_mb(resolved.size_bytes),
            "PDF ready"
        );

        // ── Extracting ──────────────────────────────────────────────
        info!(available = ?self.backends.available_names(), "extracting text");
        let (extracted, backend) = self.backends.extract(&resolved.pdf_path)?;
        let title = request
            .title
            .clone()
            .or_else(|| pdf_title(&resolved.pdf_path))
            .unwrap_or_else(|| name.clone());

        let text = extracted.assemble(self.config.include_page_markers);
        let char_count = text.chars().count();
        let text_path = layout.text_path(&name);
        tokio::fs::write(&text_path, &text)
            .await
            .map_err(|e| PipelineError::Io { stage: Stage::Extracting, source: e })?;
        info!(path = %text_path.display(), chars = char_count, "saved full text");

        // ── Chunking ────────────────────────────────────────────────
        let chunk_dir = layout.chunk_dir(&name);
        if chunk_dir.exists() {
            // Stale chunks from a previous, larger run must not survive.
            tokio::fs::remove_dir_all(&chunk_dir)
                .await
                .map_err(|e| PipelineError::Io { stage: Stage::Chunking, source: e })?;
        }
        tokio::fs::create_dir_all(&chunk_dir)
            .await
            .map_err(|e| PipelineError::Io { stage: Stage::Chunking, source: e })?;

        let mut chunk_count = 0;
        for chunk in Chunker::new(&text, self.config.effective_chunk_size()) {
            tokio::fs::write(layout.chunk_path(&name, chunk.index), chunk.text)
                .await
                .map_err(|e| PipelineError::Io { stage: Stage::Chunking, source: e })?;
            chunk_count += 1;
        }
        info!(dir = %chunk_dir.display(), chunks = chunk_count, "saved chunks");

        // ── Recording ───────────────────────────────────────────────
        let record = DocumentRecord {
            id,
            source: request.source.clone(),
            name: name.clone(),
            title,
            tags: request.tags.clone(),
            backend: backend.to_string(),
            page_count: extracted.page_count(),
            char_count,
            chunk_count,
            pdf_size_mb: size_mb(resolved.size_bytes),
            extracted_at: Utc::now(),
            paths: layout.repo_paths(&name),
        };
        let store = MetadataStore::new(layout.metadata_path());
        store.upsert(record.clone())?;

        Ok(PipelineReport {
            record,
            output_dir: layout.root().to_path_buf(),
            pdf_path: resolved.pdf_path,
            text_path,
            chunk_dir,
            metadata_path: layout.metadata_path(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_display_names() {
        assert_eq!(Stage::Resolving.to_string(), "resolving");
        assert_eq!(Stage::Extracting.to_string(), "extracting");
        assert_eq!(Stage::Chunking.to_string(), "chunking");
        assert_eq!(Stage::Recording.to_string(), "recording");
    }

    #[test]
    fn errors_know_their_stage() {
        let resolve = PipelineError::from(ResolveError::NotFound("x".to_string()));
        assert_eq!(resolve.stage(), Stage::Resolving);

        let extract = PipelineError::from(ExtractError::NoExtractorAvailable);
        assert_eq!(extract.stage(), Stage::Extracting);

        let io = PipelineError::Io {
            stage: Stage::Chunking,
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk gone"),
        };
        assert_eq!(io.stage(), Stage::Chunking);
    }

    #[test]
    fn error_messages_name_the_stage() {
        let err = PipelineError::from(ExtractError::NoExtractorAvailable);
        assert!(err.to_string().starts_with("extracting:"));
    }
}
