//! PDF ingestion pipeline: resolve a source to a local PDF, extract its
//! text, chunk it, and record the result.
//!
//! This crate provides:
//! - `source` — URL / Google Drive / local-path resolution and download
//! - `extract` — `PdfBackend` trait plus the prioritized backend set
//! - `chunker` — character-budget chunking on paragraph/sentence boundaries
//! - `pipeline` — the staged orchestrator the CLI drives

pub mod chunker;
pub mod extract;
pub mod pipeline;
pub mod source;

pub use chunker::{Chunk, Chunker};
pub use extract::{BackendSet, ExtractError, ExtractedText, PdfBackend};
pub use pipeline::{ExtractRequest, Pipeline, PipelineError, PipelineReport, Stage};
pub use source::{ResolveError, Resolved, Resolver};
