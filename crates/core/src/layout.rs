use std::path::{Path, PathBuf};

use crate::record::RecordPaths;

/// Metadata store file name, kept beside the output directory.
pub const METADATA_FILE: &str = "extraction_metadata.json";

/// The on-disk output contract:
///
/// ```text
/// extraction_metadata.json
/// <output_directory>/
///   pdfs/<name>.pdf
///   text/<name>.txt
///   chunks/<name>/chunk_001.txt ...
/// ```
///
/// Other tools consume these paths directly, so the shape here is fixed.
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    /// Create the layout, ensuring the directory structure exists.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, std::io::Error> {
        let root = root.into();
        std::fs::create_dir_all(root.join("pdfs"))?;
        std::fs::create_dir_all(root.join("text"))?;
        std::fs::create_dir_all(root.join("chunks"))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pdf_path(&self, name: &str) -> PathBuf {
        self.root.join("pdfs").join(format!("{name}.pdf"))
    }

    pub fn text_path(&self, name: &str) -> PathBuf {
        self.root.join("text").join(format!("{name}.txt"))
    }

    pub fn chunk_dir(&self, name: &str) -> PathBuf {
        self.root.join("chunks").join(name)
    }

    /// Path of one chunk file. `index` is 1-based, zero-padded to three
    /// digits (`chunk_001.txt`).
    pub fn chunk_path(&self, name: &str, index: usize) -> PathBuf {
        self.chunk_dir(name).join(format!("chunk_{index:03}.txt"))
    }

    /// Path of the metadata store, a sibling of the output directory.
    pub fn metadata_path(&self) -> PathBuf {
        match self.root.parent() {
            Some(parent) => parent.join(METADATA_FILE),
            None => PathBuf::from(METADATA_FILE),
        }
    }

    /// Repo-relative paths for the record, prefixed with the output
    /// directory's own name (what the paths look like once committed).
    pub fn repo_paths(&self, name: &str) -> RecordPaths {
        let prefix = self
            .root
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string());
        RecordPaths {
            pdf: format!("{prefix}/pdfs/{name}.pdf"),
            full_text: format!("{prefix}/text/{name}.txt"),
            chunks: format!("{prefix}/chunks/{name}/"),
        }
    }
}
