use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Config file name looked up in the working directory when no
/// explicit path is given.
pub const DEFAULT_CONFIG_PATH: &str = "extract.config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Pipeline configuration loaded from a JSON file.
///
/// Every field has a default, so a missing file (or an empty `{}`)
/// yields a working configuration. The config is read once at startup
/// and never written back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory for all extraction artifacts.
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,

    /// Downloads larger than this log a warning but still proceed.
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,

    /// Chunk budget in characters.
    #[serde(default = "default_chunk_size_characters")]
    pub chunk_size_characters: usize,

    /// Overrides `chunk_size_characters` when set.
    #[serde(default)]
    pub max_chunk_size: Option<usize>,

    /// Prefix each page with a `--- Page N ---` marker line in the
    /// assembled text.
    #[serde(default = "default_include_page_markers")]
    pub include_page_markers: bool,
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("extracted_pdfs")
}

fn default_max_file_size_mb() -> u64 {
    100
}

fn default_chunk_size_characters() -> usize {
    50_000
}

fn default_include_page_markers() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_directory: default_output_directory(),
            max_file_size_mb: default_max_file_size_mb(),
            chunk_size_characters: default_chunk_size_characters(),
            max_chunk_size: None,
            include_page_markers: default_include_page_markers(),
        }
    }
}

impl Config {
    /// Load config from the given path, or `extract.config.json`.
    /// Returns the default config if the file does not exist.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let config_path = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_PATH));

        let config = if config_path.exists() {
            debug!(?config_path, "Loading config");
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            debug!(?config_path, "Config file not found, using defaults");
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Effective chunk budget: `max_chunk_size` wins when set.
    pub fn effective_chunk_size(&self) -> usize {
        self.max_chunk_size.unwrap_or(self.chunk_size_characters)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.effective_chunk_size() == 0 {
            return Err(ConfigError::Invalid(
                "chunk budget must be greater than zero".to_string(),
            ));
        }
        if self.output_directory.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "output_directory must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  output_directory:  {}", self.output_directory.display());
        tracing::info!("  max_file_size_mb:  {}", self.max_file_size_mb);
        tracing::info!("  chunk budget:      {} chars", self.effective_chunk_size());
        tracing::info!("  page markers:      {}", self.include_page_markers);
    }
}
