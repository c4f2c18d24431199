//! Run command - every pipeline stage in order.

use console::style;

use musepop_core::pipeline::{build_features, train};
use musepop_core::{OrdinaryLeastSquares, Pipeline};

use super::features::print_features;
use super::ingest::{enrich_with_progress, print_enrich, print_ingest};
use super::train::format_model;
use super::Context;

pub fn run(ctx: &Context) -> anyhow::Result<()> {
    let source = ctx.http()?;
    let pipeline = Pipeline::new(&ctx.config, &source).offline(ctx.offline);
    let mut store = ctx.store();

    println!("{} Fetching museum ranking...", style("[1/4]").dim());
    let ingested = pipeline.ingest(&mut store)?;
    print_ingest(&ingested, ctx.config.filter.visitor_threshold);

    println!("{} Resolving city populations...", style("[2/4]").dim());
    let enriched = enrich_with_progress(&pipeline, &mut store)?;
    print_enrich(&enriched);

    println!("{} Building feature table...", style("[3/4]").dim());
    let rows = build_features(&mut store, ctx.config.filter.visitor_threshold)?;
    print_features(rows);

    println!("{} Training regression...", style("[4/4]").dim());
    let model = train(&mut store, &OrdinaryLeastSquares)?;

    println!();
    print!("{}", format_model(&model));
    println!();
    println!(
        "{} Tables written to {}",
        style("✓").green(),
        ctx.tables_dir().display()
    );
    Ok(())
}
