//! Streaming HTTP download.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use super::ResolveError;

/// Browser-like agent; some hosts refuse the default reqwest one.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Whole-request timeout, generous enough for large PDFs on slow links.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

pub fn build_client() -> Result<reqwest::Client, ResolveError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(DOWNLOAD_TIMEOUT)
        .build()
        .map_err(|e| ResolveError::Client(e.to_string()))
}

/// Stream `url` into `dest`, returning the byte count. The body goes
/// to a `.tmp` sibling first and is renamed on success, so `dest`
/// never holds a half-written PDF.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    max_file_size_mb: u64,
) -> Result<u64, ResolveError> {
    info!(url, "downloading");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| download_error(url, e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(download_error(url, format!("server returned {status}")));
    }

    if let Some(length) = response.content_length() {
        let mb = length as f64 / 1_048_576.0;
        info!("File size: {mb:.2} MB");
        if mb > max_file_size_mb as f64 {
            warn!("File exceeds {max_file_size_mb} MB limit, proceeding anyway");
        }
    }

    let tmp_path = tmp_sibling(dest);
    let mut file = tokio::fs::File::create(&tmp_path).await?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                drop(file);
                let _ = tokio::fs::remove_file(&tmp_path).await;
                return Err(download_error(url, e.to_string()));
            }
        };
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    drop(file);
    tokio::fs::rename(&tmp_path, dest).await?;

    info!(
        path = %dest.display(),
        "Download complete ({:.2} MB)",
        written as f64 / 1_048_576.0
    );
    Ok(written)
}

fn download_error(url: &str, reason: String) -> ResolveError {
    ResolveError::Download {
        url: url.to_string(),
        reason,
    }
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}
