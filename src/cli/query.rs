//! Query command implementation

use crate::cli::{OutputFormat, QueryArgs};
use crate::core::config::Config;
use crate::core::error::Result;
use crate::output::format_response;
use crate::pipeline::QueryPipeline;
use tracing::info;

/// Run the query command
pub fn run(args: QueryArgs) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(data) = args.data {
        config.data.transactions = data;
    }

    let pipeline = QueryPipeline::from_config(&config)?;
    info!(rows = pipeline.ledger().len(), "Ledger loaded");

    let response = pipeline.run(&args.query, args.limit)?;

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    print!("{}", format_response(&response, format));

    Ok(())
}
