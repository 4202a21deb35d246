use std::path::Path;
use std::process::Command;

use super::{ExtractError, ExtractedText, PdfBackend};

/// Poppler's `pdftotext` CLI with `-layout`, the highest-fidelity
/// backend when the tool is installed. Pages arrive separated by form
/// feeds on stdout.
pub struct PdftotextBackend;

impl PdfBackend for PdftotextBackend {
    fn name(&self) -> &'static str {
        "pdftotext"
    }

    fn is_available(&self) -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .is_ok()
    }

    fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractError> {
        let output = Command::new("pdftotext")
            .args(["-layout", "-enc", "UTF-8"])
            .arg(path)
            .arg("-") // write to stdout
            .output()
            .map_err(|e| ExtractError::Backend {
                backend: "pdftotext",
                reason: format!("failed to run: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::Backend {
                backend: "pdftotext",
                reason: stderr.trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(ExtractedText::from_form_feeds(&text))
    }
}
