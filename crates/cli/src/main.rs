mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use pdfstash_core::Config;
use pdfstash_ingest::{ExtractRequest, Pipeline, PipelineReport};

use crate::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    // Load config
    let config = Config::load(args.config.as_deref())
        .context("failed to load configuration")?;
    config.log_summary();

    let tags: Vec<String> = args
        .tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let request = ExtractRequest {
        source: args.source,
        output_name: args.output_name,
        title: args.title,
        tags,
        force: args.force,
    };

    let pipeline = Pipeline::new(config);
    match pipeline.run(request).await {
        Ok(report) => {
            print_summary(&report);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, stage = %e.stage(), "extraction failed");
            eprintln!("\nError: {e}");
            std::process::exit(1);
        }
    }
}

/// Operator-facing summary of a completed extraction.
fn print_summary(report: &PipelineReport) {
    let record = &report.record;
    let rule = "=".repeat(60);
    let dash = "-".repeat(60);

    println!("\n{rule}");
    println!("EXTRACTION COMPLETE");
    println!("{rule}");
    println!("Document ID:     {}", record.id);
    println!("Title:           {}", record.title);
    println!("Pages:           {}", record.page_count);
    println!("Characters:      {}", group_thousands(record.char_count));
    println!("Chunks:          {}", record.chunk_count);
    println!("File Size:       {:.2} MB", record.pdf_size_mb);
    println!("Backend:         {}", record.backend);
    println!("{dash}");
    println!("OUTPUT FILES:");
    println!("  PDF:        {}", report.pdf_path.display());
    println!("  Full Text:  {}", report.text_path.display());
    println!("  Chunks:     {}", report.chunk_dir.display());
    println!("{dash}");
    println!("GITHUB PATHS (after commit):");
    println!("  PDF:        {}", record.paths.pdf);
    println!("  Full Text:  {}", record.paths.full_text);
    println!("  Chunks:     {}", record.paths.chunks);
    println!("{rule}");
    println!("\nTo share the text via a raw GitHub URL:");
    println!(
        "  https://raw.githubusercontent.com/<user>/<repo>/main/{}",
        record.paths.full_text
    );
    println!("\nNext steps:");
    println!(
        "  1. git add {}/ {}",
        report.output_dir.display(),
        report.metadata_path.display()
    );
    println!("  2. git commit -m 'Add extracted PDF: {}'", record.title);
    println!("  3. git push origin <branch-name>");
    println!("{rule}");
}

/// Format a count with thousands separators, e.g. `1234567` -> `1,234,567`.
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
