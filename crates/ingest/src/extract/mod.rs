//! PDF text extraction through a prioritized backend list.
//!
//! Backends are tried in order; the first one that is available and
//! produces text wins. A backend failure (or an empty result) falls
//! through to the next backend rather than aborting the run.

mod paged;
mod pdftotext;
mod plain;

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info, warn};

pub use paged::{pdf_title, LopdfBackend};
pub use pdftotext::PdftotextBackend;
pub use plain::PdfExtractBackend;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// Every backend was unavailable, failed, or produced no text.
    #[error("no PDF extraction backend produced text (install poppler-utils for pdftotext)")]
    NoExtractorAvailable,

    #[error("{backend}: {reason}")]
    Backend { backend: &'static str, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-page text pulled out of a PDF. Page numbers are implicit:
/// `pages[0]` is page 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    pub pages: Vec<String>,
}

impl ExtractedText {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Whether any page carries non-whitespace text.
    pub fn has_text(&self) -> bool {
        self.pages.iter().any(|p| !p.trim().is_empty())
    }

    /// Join pages into the document text, `\n\n` between pages. With
    /// markers, each page is prefixed by a `--- Page N ---` line.
    pub fn assemble(&self, with_markers: bool) -> String {
        if !with_markers {
            return self.pages.join("\n\n");
        }
        let parts: Vec<String> = self
            .pages
            .iter()
            .enumerate()
            .map(|(i, text)| format!("--- Page {} ---\n{}", i + 1, text))
            .collect();
        parts.join("\n\n")
    }

    /// Split raw extractor output on form feeds (`\x0C`), which both
    /// pdftotext and pdf-extract emit between pages. Without form feeds
    /// the whole text counts as a single page. A trailing empty element
    /// from a terminal form feed is dropped.
    pub fn from_form_feeds(raw: &str) -> Self {
        let mut pages: Vec<String> = raw.split('\x0C').map(|p| p.trim().to_string()).collect();
        if pages.len() > 1 && pages.last().is_some_and(|p| p.is_empty()) {
            pages.pop();
        }
        Self { pages }
    }
}

/// Remove `--- Page N ---` marker lines, recovering the unmarked text.
///
/// Assumes the document text does not itself contain lines in exactly
/// the marker format.
pub fn strip_page_markers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        if !is_page_marker(line) {
            out.push_str(line);
        }
    }
    out
}

fn is_page_marker(line: &str) -> bool {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(rest) = line.strip_prefix("--- Page ") else {
        return false;
    };
    let Some(num) = rest.strip_suffix(" ---") else {
        return false;
    };
    !num.is_empty() && num.bytes().all(|b| b.is_ascii_digit())
}

/// One way of getting text out of a PDF.
pub trait PdfBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Cheap availability probe, checked before every extraction
    /// attempt (external tools can disappear between runs).
    fn is_available(&self) -> bool;

    fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractError>;
}

/// Priority-ordered backends with fall-through on failure.
pub struct BackendSet {
    backends: Vec<Box<dyn PdfBackend>>,
}

impl BackendSet {
    pub fn new(backends: Vec<Box<dyn PdfBackend>>) -> Self {
        Self { backends }
    }

    /// The default ladder, best fidelity first: poppler's pdftotext
    /// (layout-preserving), then lopdf (page-structured), then
    /// pdf-extract (basic text dump).
    pub fn detected() -> Self {
        Self::new(vec![
            Box::new(PdftotextBackend),
            Box::new(LopdfBackend),
            Box::new(PdfExtractBackend),
        ])
    }

    /// Names of the backends that currently report available.
    pub fn available_names(&self) -> Vec<&'static str> {
        self.backends
            .iter()
            .filter(|b| b.is_available())
            .map(|b| b.name())
            .collect()
    }

    /// Walk the ladder and return the first non-empty extraction along
    /// with the backend name that produced it.
    pub fn extract(&self, path: &Path) -> Result<(ExtractedText, &'static str), ExtractError> {
        for backend in &self.backends {
            if !backend.is_available() {
                debug!(backend = backend.name(), "backend not available, skipping");
                continue;
            }
            match backend.extract(path) {
                Ok(text) if text.has_text() => {
                    info!(
                        backend = backend.name(),
                        pages = text.page_count(),
                        "text extracted"
                    );
                    return Ok((text, backend.name()));
                }
                Ok(_) => {
                    warn!(
                        backend = backend.name(),
                        "backend produced no text, trying next"
                    );
                }
                Err(e) => {
                    warn!(backend = backend.name(), error = %e, "backend failed, trying next");
                }
            }
        }
        Err(ExtractError::NoExtractorAvailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubBackend {
        name: &'static str,
        available: bool,
        pages: Option<Vec<&'static str>>,
    }

    impl PdfBackend for StubBackend {
        fn name(&self) -> &'static str {
            self.name
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn extract(&self, _path: &Path) -> Result<ExtractedText, ExtractError> {
            match &self.pages {
                Some(pages) => Ok(ExtractedText {
                    pages: pages.iter().map(|p| p.to_string()).collect(),
                }),
                None => Err(ExtractError::Backend {
                    backend: self.name,
                    reason: "stub failure".to_string(),
                }),
            }
        }
    }

    fn stub(name: &'static str, available: bool, pages: Option<Vec<&'static str>>) -> Box<dyn PdfBackend> {
        Box::new(StubBackend {
            name,
            available,
            pages,
        })
    }

    #[test]
    fn first_available_success_wins() {
        let set = BackendSet::new(vec![
            stub("one", true, Some(vec!["page text"])),
            stub("two", true, Some(vec!["other"])),
        ]);
        let (text, backend) = set.extract(Path::new("ignored.pdf")).unwrap();
        assert_eq!(backend, "one");
        assert_eq!(text.pages, vec!["page text"]);
    }

    #[test]
    fn unavailable_and_failing_backends_fall_through() {
        let set = BackendSet::new(vec![
            stub("missing", false, Some(vec!["never tried"])),
            stub("broken", true, None),
            stub("working", true, Some(vec!["hello"])),
        ]);
        let (_, backend) = set.extract(Path::new("ignored.pdf")).unwrap();
        assert_eq!(backend, "working");
    }

    #[test]
    fn empty_extraction_falls_through() {
        let set = BackendSet::new(vec![
            stub("empty", true, Some(vec!["", "  \n"])),
            stub("working", true, Some(vec!["content"])),
        ]);
        let (_, backend) = set.extract(Path::new("ignored.pdf")).unwrap();
        assert_eq!(backend, "working");
    }

    #[test]
    fn exhausted_ladder_is_no_extractor_available() {
        let set = BackendSet::new(vec![
            stub("missing", false, Some(vec!["x"])),
            stub("broken", true, None),
        ]);
        let err = set.extract(Path::new("ignored.pdf")).unwrap_err();
        assert!(matches!(err, ExtractError::NoExtractorAvailable));
    }

    #[test]
    fn available_names_filters() {
        let set = BackendSet::new(vec![
            stub("a", true, Some(vec![])),
            stub("b", false, Some(vec![])),
            stub("c", true, Some(vec![])),
        ]);
        assert_eq!(set.available_names(), vec!["a", "c"]);
    }

    #[test]
    fn assemble_with_markers() {
        let extracted = ExtractedText {
            pages: vec!["first page".to_string(), "second page".to_string()],
        };
        assert_eq!(
            extracted.assemble(true),
            "--- Page 1 ---\nfirst page\n\n--- Page 2 ---\nsecond page"
        );
        assert_eq!(extracted.assemble(false), "first page\n\nsecond page");
    }

    #[test]
    fn strip_markers_recovers_unmarked_text() {
        let extracted = ExtractedText {
            pages: vec![
                "Intro line\nwith a second line".to_string(),
                "".to_string(),
                "Closing page".to_string(),
            ],
        };
        let marked = extracted.assemble(true);
        assert_eq!(strip_page_markers(&marked), extracted.assemble(false));
    }

    #[test]
    fn marker_detection_is_exact() {
        assert!(is_page_marker("--- Page 1 ---\n"));
        assert!(is_page_marker("--- Page 42 ---"));
        assert!(!is_page_marker("--- Page ---"));
        assert!(!is_page_marker("--- Page x ---"));
        assert!(!is_page_marker("-- Page 1 --"));
        assert!(!is_page_marker("--- Page 1 --- trailing"));
    }

    #[test]
    fn form_feed_split() {
        let text = ExtractedText::from_form_feeds("page one\x0Cpage two\x0C");
        assert_eq!(text.pages, vec!["page one", "page two"]);

        let single = ExtractedText::from_form_feeds("all one page");
        assert_eq!(single.page_count(), 1);
    }

    #[test]
    fn form_feed_keeps_interior_empty_pages() {
        let text = ExtractedText::from_form_feeds("one\x0C\x0Cthree\x0C");
        assert_eq!(text.pages, vec!["one", "", "three"]);
        assert_eq!(text.page_count(), 3);
        assert!(text.has_text());
    }

    #[test]
    fn has_text_rejects_whitespace_only() {
        let empty = ExtractedText {
            pages: vec!["  ".to_string(), "\n".to_string()],
        };
        assert!(!empty.has_text());
    }
}
