//! Features command - join museums with city populations.

use console::style;

use musepop_core::pipeline::build_features;

use super::Context;

pub fn run(ctx: &Context) -> anyhow::Result<()> {
    let mut store = ctx.store();
    let rows = build_features(&mut store, ctx.config.filter.visitor_threshold)?;
    print_features(rows);
    Ok(())
}

pub fn print_features(rows: usize) {
    if rows == 0 {
        println!(
            "{} Feature table is empty. Run 'musepop ingest' and 'musepop enrich' first.",
            style("!").yellow()
        );
    } else {
        println!(
            "{} Built feature table with {} rows",
            style("✓").green(),
            style(rows).bold()
        );
    }
}
