use std::path::Path;

use super::{ExtractError, ExtractedText, PdfBackend};

/// Basic text dump via the pdf-extract crate. Last rung of the ladder:
/// no layout, and page boundaries only when the extractor emits form
/// feeds.
pub struct PdfExtractBackend;

impl PdfBackend for PdfExtractBackend {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractError> {
        let bytes = std::fs::read(path)?;
        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            ExtractError::Backend {
                backend: "pdf-extract",
                reason: e.to_string(),
            }
        })?;

        Ok(ExtractedText::from_form_feeds(&text))
    }
}
