use std::path::Path;

use lopdf::Document;
use tracing::warn;

use super::{ExtractError, ExtractedText, PdfBackend};

/// Pure-Rust page-structured extraction via lopdf: exact page count,
/// one text entry per page. Always available.
pub struct LopdfBackend;

impl PdfBackend for LopdfBackend {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractError> {
        let doc = Document::load(path).map_err(|e| ExtractError::Backend {
            backend: "lopdf",
            reason: e.to_string(),
        })?;

        let page_map = doc.get_pages();
        let mut pages = Vec::with_capacity(page_map.len());
        for (&number, _) in &page_map {
            // A single unreadable page should not sink the whole
            // document; it becomes an empty page instead.
            let text = match doc.extract_text(&[number]) {
                Ok(text) => text.trim().to_string(),
                Err(e) => {
                    warn!(page = number, error = %e, "lopdf failed to extract page");
                    String::new()
                }
            };
            pages.push(text);
        }

        Ok(ExtractedText { pages })
    }
}

/// Read the title from the PDF's Info dictionary, if it has one.
/// Used when the caller did not supply a title; extraction does not
/// depend on it, so every failure maps to `None`.
pub fn pdf_title(path: &Path) -> Option<String> {
    let doc = Document::load(path).ok()?;
    let info_ref = doc.trailer.get(b"Info").ok()?.as_reference().ok()?;
    let info = doc.get_object(info_ref).ok()?.as_dict().ok()?;
    let raw = info.get(b"Title").ok()?.as_str().ok()?;
    let title = String::from_utf8_lossy(raw).trim().to_string();
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_pdf_is_a_backend_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("not-a.pdf");
        std::fs::write(&path, b"This is not a PDF").unwrap();

        let err = LopdfBackend.extract(&path).unwrap_err();
        assert!(matches!(err, ExtractError::Backend { backend: "lopdf", .. }));
    }

    #[test]
    fn title_of_invalid_pdf_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("not-a.pdf");
        std::fs::write(&path, b"junk").unwrap();
        assert!(pdf_title(&path).is_none());
    }

    #[test]
    fn title_of_missing_file_is_none() {
        assert!(pdf_title(Path::new("/nonexistent/file.pdf")).is_none());
    }
}
