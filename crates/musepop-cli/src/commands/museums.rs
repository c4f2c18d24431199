//! Museums command - list stored museums.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use musepop_core::pipeline::{Museums, Store};
use musepop_core::RankedEntityRecord;

use super::{Context, OutputFormat};

/// Arguments for the museums command.
#[derive(Args)]
pub struct MuseumsArgs {
    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Show only museums in this city (matches label or key)
    #[arg(long)]
    city: Option<String>,
}

pub fn run(ctx: &Context, args: MuseumsArgs) -> anyhow::Result<()> {
    let mut museums = ctx.store().read_all::<Museums>()?;

    if let Some(city) = &args.city {
        let wanted = city.to_lowercase();
        museums.retain(|m| {
            m.group_label.to_lowercase() == wanted
                || m.join_key().is_some_and(|k| k.to_lowercase() == wanted)
        });
    }

    if museums.is_empty() {
        eprintln!(
            "{} No museums stored. Run 'musepop ingest' first.",
            style("!").yellow()
        );
        return Ok(());
    }

    let output = format_records(&museums, args.format)?;
    write_output(&output, args.output.as_ref())
}

/// Render records in the requested format.
pub fn format_records(records: &[RankedEntityRecord], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Csv => format_csv(records),
        OutputFormat::Text => Ok(format_text(records)),
    }
}

pub fn write_output(output: &str, path: Option<&PathBuf>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, output)?;
            println!(
                "{} Output written to {}",
                style("✓").green(),
                path.display()
            );
        }
        None => println!("{}", output.trim_end()),
    }
    Ok(())
}

fn format_csv(records: &[RankedEntityRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "name",
        "city",
        "city_key",
        "country",
        "visitors",
        "year",
        "source_url",
    ])?;

    for record in records {
        wtr.write_record([
            &record.name,
            &record.group_label,
            &record.group_key.clone().unwrap_or_default(),
            &record.category_label.clone().unwrap_or_default(),
            &record.magnitude.map(|m| m.to_string()).unwrap_or_default(),
            &record.period.map(|p| p.to_string()).unwrap_or_default(),
            &record.provenance_url,
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(records: &[RankedEntityRecord]) -> String {
    let name_width = records
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(6);
    let city_width = records
        .iter()
        .map(|r| r.group_label.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<city_width$}  {:>12}  {}\n",
        "Museum", "City", "Visitors", "Year"
    ));
    for record in records {
        output.push_str(&format!(
            "{:<name_width$}  {:<city_width$}  {:>12}  {}\n",
            record.name,
            record.group_label,
            record.magnitude.map(|m| m.to_string()).unwrap_or_default(),
            record.period.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()),
        ));
    }
    output.push_str(&format!("\n{} museums\n", records.len()));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> RankedEntityRecord {
        RankedEntityRecord {
            name: "Musée d'Orsay".to_string(),
            group_label: "Paris".to_string(),
            group_key: Some("Paris".to_string()),
            category_label: Some("France".to_string()),
            magnitude: Some(3_270_000),
            period: None,
            provenance_url: "https://example.org".to_string(),
        }
    }

    #[test]
    fn test_csv_output() {
        let csv = format_records(&[record()], OutputFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("name,city,city_key,country,visitors,year,source_url")
        );
        assert_eq!(
            lines.next(),
            Some("Musée d'Orsay,Paris,Paris,France,3270000,,https://example.org")
        );
    }

    #[test]
    fn test_text_output() {
        let text = format_records(&[record()], OutputFormat::Text).unwrap();
        assert!(text.starts_with("Museum"));
        assert!(text.contains("3270000"));
        assert!(text.contains("1 museums"));
    }
}
