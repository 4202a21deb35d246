use clap::Parser;

/// Download a PDF, extract its text, and split it into chunks.
///
/// Accepts a direct URL, a Google Drive share link, or a local file
/// path. Writes the PDF, the full text, numbered chunk files, and a
/// metadata index under the configured output directory.
#[derive(Parser, Debug)]
#[command(name = "extract", about = "PDF extraction pipeline")]
pub struct CliArgs {
    /// URL or local file path of the PDF
    pub source: String,

    /// Custom name for output files (defaults to the document id)
    #[arg(long, short = 'o')]
    pub output_name: Option<String>,

    /// Document title (defaults to PDF metadata, then the output name)
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// Comma-separated list of tags
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Path to config file (default: extract.config.json)
    #[arg(long, env = "EXTRACT_CONFIG")]
    pub config: Option<String>,

    /// Re-fetch the PDF even if it is already present in the output directory
    #[arg(long)]
    pub force: bool,
}
