//! CLI command definitions and handlers

pub mod eval;
pub mod query;
pub mod serve;
pub mod stats;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

const LONG_ABOUT: &str = r#"
████████╗ █████╗ ██╗     ██╗  ██╗   ██╗
╚══██╔══╝██╔══██╗██║     ██║  ╚██╗ ██╔╝
   ██║   ███████║██║     ██║   ╚████╔╝
   ██║   ██╔══██║██║     ██║    ╚██╔╝
   ██║   ██║  ██║███████╗███████╗██║
   ╚═╝   ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝

Deterministic natural-language queries over your expense ledger.

QUICK START:
    1. Point tally at a CSV with date,amount,category,merchant columns
    2. tally query "how much did i spend on food last month"
    3. tally serve                 Expose the same pipeline over HTTP

QUERIES:
    tally query "total spending this month"
    tally query "show my transactions above 500 last week"
    tally query "compare my spending this month vs last month"
    tally query "highest spending category this year"
    tally query "average spending on coffee since july"

SERVER:
    tally serve                    GET /query?q=... returns the same JSON
    tally serve -p 9000            Custom port

DATA:
    tally stats                    Ledger summary (rows, span, categories)
    tally eval                     Run the golden-case evaluation suite

EXAMPLES:
    tally query "food last month" --json      JSON output for scripting
    tally query "show all" -n 50              Cap listed transactions
    tally stats --data ~/expenses.csv         One-off ledger override
"#;

/// Deterministic natural-language expense queries
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(author, version)]
#[command(about = "Natural-language queries over your expense ledger")]
#[command(long_about = LONG_ABOUT)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a natural-language query against the ledger
    #[command(visible_alias = "q")]
    Query(QueryArgs),

    /// Serve the query pipeline over HTTP
    Serve(ServeArgs),

    /// Show a summary of the loaded ledger
    Stats(StatsArgs),

    /// Run the golden-case evaluation suite
    #[command(after_help = "Cases pin the expected intent, entities and date
presence for a query. Without --cases the built-in suite runs.

EXAMPLES:
    tally eval                     Built-in cases
    tally eval --cases my.json     Custom cases
    tally eval --json              Machine-readable report")]
    Eval(EvalArgs),
}

/// Arguments for the query command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    tally query \"total spending this month\"
    tally query \"show my food expenses\" -n 10
    tally query \"biggest expense\" --json")]
pub struct QueryArgs {
    /// Natural-language query
    pub query: String,

    /// Max transactions to list
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// JSON output
    #[arg(long)]
    pub json: bool,

    /// Ledger CSV (default: from config)
    #[arg(long)]
    pub data: Option<PathBuf>,
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    tally serve                    Bind 127.0.0.1:8710
    tally serve -p 9000            Custom port
    tally serve --host 0.0.0.0     Listen on all interfaces")]
pub struct ServeArgs {
    /// Bind port (default: from config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Bind address (default: from config)
    #[arg(long)]
    pub host: Option<String>,

    /// Ledger CSV (default: from config)
    #[arg(long)]
    pub data: Option<PathBuf>,
}

/// Arguments for the stats command
#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// JSON output
    #[arg(long)]
    pub json: bool,

    /// Ledger CSV (default: from config)
    #[arg(long)]
    pub data: Option<PathBuf>,
}

/// Arguments for the eval command
#[derive(Parser, Debug)]
pub struct EvalArgs {
    /// Test cases file (default: built-in suite)
    #[arg(long)]
    pub cases: Option<PathBuf>,

    /// JSON output
    #[arg(long)]
    pub json: bool,

    /// Ledger CSV (default: from config)
    #[arg(long)]
    pub data: Option<PathBuf>,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}
