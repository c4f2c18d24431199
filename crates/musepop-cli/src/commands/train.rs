//! Train command - fit the regression on the feature table.

use console::style;

use musepop_core::pipeline::train;
use musepop_core::{ModelMetadata, OrdinaryLeastSquares};

use super::Context;

pub fn run(ctx: &Context) -> anyhow::Result<()> {
    let mut store = ctx.store();
    let model = train(&mut store, &OrdinaryLeastSquares)?;

    println!(
        "{} Trained model {}",
        style("✓").green(),
        style(&model.version).cyan().bold()
    );
    println!();
    print!("{}", format_model(&model));
    Ok(())
}

/// Plain text description of a model.
pub fn format_model(model: &ModelMetadata) -> String {
    let mut output = String::new();

    output.push_str(&format!("Model version: {}\n", model.version));
    output.push_str(&format!(
        "Trained at:    {}\n",
        model.trained_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str(&format!("Samples:       {}\n", model.n_samples));
    output.push('\n');
    output.push_str(&format!("  {}\n", model.equation()));
    output.push('\n');
    output.push_str(&format!("  R²:   {:.4}\n", model.r2));
    output.push_str(&format!("  RMSE: {:.0}\n", model.rmse));
    output.push_str(&format!("  MAE:  {:.0}\n", model.mae));

    output
}
