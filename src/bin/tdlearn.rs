//! tdlearn CLI - train, evaluate and inspect temporal-difference agents

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tdlearn")]
#[command(version, about = "Temporal-difference learning toolkit", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a brain in a built-in environment
    Train(Box<tdlearn::cli::commands::train::TrainArgs>),

    /// Run a saved brain greedily
    Evaluate(tdlearn::cli::commands::evaluate::EvaluateArgs),

    /// Print the contents of a saved brain
    Inspect(tdlearn::cli::commands::inspect::InspectArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Train(args) => tdlearn::cli::commands::train::execute(*args),
        Commands::Evaluate(args) => tdlearn::cli::commands::evaluate::execute(args),
        Commands::Inspect(args) => tdlearn::cli::commands::inspect::execute(args),
    }
}
