//! Ingest and enrich commands - gather museums and city populations.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use musepop_core::pipeline::{EnrichReport, IngestReport};
use musepop_core::{JsonStore, Pipeline, Provenance};

use super::Context;

pub fn run_ingest(ctx: &Context) -> anyhow::Result<()> {
    let source = ctx.http()?;
    let pipeline = Pipeline::new(&ctx.config, &source).offline(ctx.offline);
    let mut store = ctx.store();

    let report = pipeline.ingest(&mut store)?;
    print_ingest(&report, ctx.config.filter.visitor_threshold);
    Ok(())
}

pub fn run_enrich(ctx: &Context) -> anyhow::Result<()> {
    let source = ctx.http()?;
    let pipeline = Pipeline::new(&ctx.config, &source).offline(ctx.offline);
    let mut store = ctx.store();

    let report = enrich_with_progress(&pipeline, &mut store)?;
    print_enrich(&report);
    Ok(())
}

/// Enrich with a progress bar over the city keys.
pub fn enrich_with_progress<S: musepop_core::HttpSource>(
    pipeline: &Pipeline<'_, S>,
    store: &mut JsonStore,
) -> anyhow::Result<EnrichReport> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let report = pipeline.enrich(store, |done, total, key| {
        pb.set_length(total as u64);
        pb.set_position(done as u64);
        pb.set_message(key.replace('_', " "));
    })?;

    pb.finish_and_clear();
    Ok(report)
}

pub fn print_ingest(report: &IngestReport, threshold: u64) {
    let marker = match report.provenance {
        Provenance::Live => style("✓").green(),
        Provenance::Cache | Provenance::Bundled => style("!").yellow(),
    };
    println!(
        "{} Stored {} museums with at least {} visitors ({} data)",
        marker,
        style(report.stored).bold(),
        threshold,
        report.provenance
    );
}

pub fn print_enrich(report: &EnrichReport) {
    println!(
        "{} Resolved {} city populations",
        style("✓").green(),
        style(report.resolved).bold()
    );

    if !report.failed.is_empty() {
        println!(
            "{} {} cities without population:",
            style("!").yellow(),
            report.failed.len()
        );
        for (key, reason) in &report.failed {
            println!("  - {}: {}", key, reason);
        }
    }
}
