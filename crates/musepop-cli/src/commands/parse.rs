//! Parse command - run the table extraction on a saved page.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use musepop_core::extract_records;
use musepop_core::models::config::SourceConfig;
use musepop_core::reliability::rendered_text;

use super::museums::{format_records, write_output};
use super::OutputFormat;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Saved HTML page, or a saved JSON response of the parse API
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Keep only records with at least this many visitors
    #[arg(short, long)]
    threshold: Option<u64>,

    /// Provenance URL recorded on each record
    #[arg(long)]
    source_url: Option<String>,
}

pub fn run(args: ParseArgs) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let content = fs::read_to_string(&args.input)?;
    let html = page_html(&content);

    let source_url = args
        .source_url
        .unwrap_or_else(|| SourceConfig::default().ranking_source_url);
    let mut records = extract_records(&html, &source_url)?;
    info!("Extracted {} records from {}", records.len(), args.input.display());

    if let Some(threshold) = args.threshold {
        records.retain(|r| r.meets_threshold(threshold));
    }

    if records.is_empty() {
        eprintln!("{} The table has no usable rows", style("!").yellow());
    }

    let output = format_records(&records, args.format)?;
    write_output(&output, args.output.as_ref())
}

/// HTML of the page: the rendered text of a parse API response, or the content itself.
fn page_html(content: &str) -> String {
    if content.trim_start().starts_with('{') {
        if let Ok(body) = serde_json::from_str::<serde_json::Value>(content) {
            if let Some(html) = rendered_text(&body) {
                return html.to_string();
            }
        }
    }
    content.to_string()
}
