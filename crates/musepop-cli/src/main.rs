//! CLI application for the museum attendance / city population pipeline.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{
    config, features, ingest, museums, parse, predict, run, train, Context, GlobalOptions,
};

/// musepop - Relate museum attendance to city population
#[derive(Parser)]
#[command(name = "musepop")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data directory (overrides the configured one)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use only cached and bundled data
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the museum ranking and store museums above the threshold
    Ingest,

    /// Resolve the population of every stored museum's city
    Enrich,

    /// Join museums with populations into the feature table
    Features,

    /// Fit the log-log regression on the feature table
    Train,

    /// Run every stage: ingest, enrich, features, train
    Run,

    /// Show the latest trained model
    Summary(predict::SummaryArgs),

    /// Estimate annual visitors for a city population
    Predict(predict::PredictArgs),

    /// List stored museums
    Museums(museums::MuseumsArgs),

    /// Extract ranking records from a saved HTML page
    Parse(parse::ParseArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let context = || {
        Context::load(&GlobalOptions {
            config: cli.config.as_deref(),
            data_dir: cli.data_dir.as_deref(),
            offline: cli.offline,
        })
    };

    // Execute command
    match cli.command {
        Commands::Ingest => ingest::run_ingest(&context()?),
        Commands::Enrich => ingest::run_enrich(&context()?),
        Commands::Features => features::run(&context()?),
        Commands::Train => train::run(&context()?),
        Commands::Run => run::run(&context()?),
        Commands::Summary(args) => predict::run_summary(&context()?, args),
        Commands::Predict(args) => predict::run_predict(&context()?, args),
        Commands::Museums(args) => museums::run(&context()?, args),
        Commands::Parse(args) => parse::run(args),
        Commands::Config(args) => config::run(args),
    }
}
