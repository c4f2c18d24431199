//! Summary and predict commands - read the latest trained model.

use clap::Args;
use console::style;
use serde_json::json;

use musepop_core::pipeline::{predict, summary};

use super::train::format_model;
use super::{Context, OutputFormat};

/// Arguments for the summary command.
#[derive(Args)]
pub struct SummaryArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

/// Arguments for the predict command.
#[derive(Args)]
pub struct PredictArgs {
    /// City population
    #[arg(required = true)]
    population: u64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub fn run_summary(ctx: &Context, args: SummaryArgs) -> anyhow::Result<()> {
    let model = summary(&ctx.store())?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&model)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(["version", "coefficient", "intercept", "r2", "rmse", "mae", "n_samples"])?;
            wtr.write_record([
                &model.version,
                &model.coefficient.to_string(),
                &model.intercept.to_string(),
                &model.r2.to_string(),
                &model.rmse.to_string(),
                &model.mae.to_string(),
                &model.n_samples.to_string(),
            ])?;
            print!("{}", String::from_utf8(wtr.into_inner()?)?);
        }
        OutputFormat::Text => print!("{}", format_model(&model)),
    }
    Ok(())
}

pub fn run_predict(ctx: &Context, args: PredictArgs) -> anyhow::Result<()> {
    let prediction = predict(&ctx.store(), args.population)?;

    match args.format {
        OutputFormat::Json => {
            let value = json!({
                "population": prediction.population,
                "predicted_visitors": prediction.visitors,
                "model_version": prediction.model_version,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Csv => {
            println!("population,predicted_visitors,model_version");
            println!(
                "{},{},{}",
                prediction.population, prediction.visitors, prediction.model_version
            );
        }
        OutputFormat::Text => println!(
            "{} A city of {} is predicted to draw {} visitors a year (model {})",
            style("ℹ").blue(),
            style(prediction.population).bold(),
            style(prediction.visitors).green().bold(),
            prediction.model_version
        ),
    }
    Ok(())
}
