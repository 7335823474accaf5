//! Tally CLI entry point

use clap::Parser;
use tally::cli::{Cli, Commands};
use tally::core::error::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("TALLY_LOG"))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Query(args) => tally::cli::query::run(args),
        Commands::Serve(args) => tally::cli::serve::run(args).await,
        Commands::Stats(args) => tally::cli::stats::run(args),
        Commands::Eval(args) => tally::cli::eval::run(args),
    }
}
