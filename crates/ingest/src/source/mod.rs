//! Source resolution: turn whatever the user passed on the command
//! line (URL, Google Drive share link, or local path) into a local PDF
//! at the layout's `pdfs/<name>.pdf` slot.

mod download;
mod drive;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use download::build_client;

pub use drive::{drive_direct_url, drive_file_id};

#[derive(Debug, Error)]
pub enum ResolveError {
    /// HTTP transport failure, non-success status, or a Drive file that
    /// is not directly downloadable.
    #[error("download failed for {url}: {reason}")]
    Download { url: String, reason: String },

    /// Local source missing or not a `.pdf` file.
    #[error("{0}")]
    NotFound(String),

    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// How the raw source string is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Direct http(s) URL, already rewritten if it was a Drive link.
    Url(String),
    LocalPath(PathBuf),
}

/// URLs are anything starting with an http(s) scheme; everything else
/// is treated as a local path. Drive share links become direct
/// download URLs here.
pub fn classify(source: &str) -> SourceKind {
    if source.starts_with("http://") || source.starts_with("https://") {
        if let Some(file_id) = drive_file_id(source) {
            info!(file_id = %file_id, "detected Google Drive URL");
            return SourceKind::Url(drive_direct_url(&file_id));
        }
        SourceKind::Url(source.to_string())
    } else {
        SourceKind::LocalPath(PathBuf::from(source))
    }
}

/// Outcome of resolution: the PDF sits at `pdf_path`.
#[derive(Debug)]
pub struct Resolved {
    pub pdf_path: PathBuf,
    pub size_bytes: u64,
    /// True when the file was fetched over HTTP this run (false for
    /// local copies and skipped re-downloads).
    pub downloaded: bool,
}

/// Resolves sources into local PDFs.
pub struct Resolver {
    client: reqwest::Client,
    max_file_size_mb: u64,
    force: bool,
}

impl Resolver {
    /// `force` re-downloads even when the destination already exists.
    pub fn new(max_file_size_mb: u64, force: bool) -> Result<Self, ResolveError> {
        Ok(Self {
            client: build_client()?,
            max_file_size_mb,
            force,
        })
    }

    pub async fn resolve(&self, source: &str, dest: &Path) -> Result<Resolved, ResolveError> {
        match classify(source) {
            SourceKind::Url(url) => self.resolve_url(&url, dest).await,
            SourceKind::LocalPath(path) => self.resolve_local(&path, dest),
        }
    }

    async fn resolve_url(&self, url: &str, dest: &Path) -> Result<Resolved, ResolveError> {
        if !self.force && dest.exists() {
            let size = std::fs::metadata(dest)?.len();
            if size > 0 {
                info!(
                    path = %dest.display(),
                    "PDF already downloaded, skipping (use --force to re-download)"
                );
                return Ok(Resolved {
                    pdf_path: dest.to_path_buf(),
                    size_bytes: size,
                    downloaded: false,
                });
            }
        }

        let size = download::fetch(&self.client, url, dest, self.max_file_size_mb).await?;
        Ok(Resolved {
            pdf_path: dest.to_path_buf(),
            size_bytes: size,
            downloaded: true,
        })
    }

    fn resolve_local(&self, path: &Path, dest: &Path) -> Result<Resolved, ResolveError> {
        if !path.exists() {
            return Err(ResolveError::NotFound(format!(
                "file not found: {}",
                path.display()
            )));
        }
        let is_pdf = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if !is_pdf {
            return Err(ResolveError::NotFound(format!(
                "not a PDF file: {}",
                path.display()
            )));
        }

        // Re-running on the artifact itself must not truncate it.
        let same_file = match (path.canonicalize(), dest.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        };
        let size = if same_file {
            std::fs::metadata(dest)?.len()
        } else {
            let size = std::fs::copy(path, dest)?;
            info!(from = %path.display(), to = %dest.display(), "copied local PDF");
            size
        };

        Ok(Resolved {
            pdf_path: dest.to_path_buf(),
            size_bytes: size,
            downloaded: false,
        })
    }
}
