//! Stats command implementation

use crate::cli::StatsArgs;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::store::Ledger;

/// Run the stats command
pub fn run(args: StatsArgs) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(data) = args.data {
        config.data.transactions = data;
    }

    let ledger = Ledger::load(&config.data.transactions)?;
    let stats = ledger.stats();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Ledger: {}", config.data.transactions.display());
    println!("  {} transactions", stats.rows);
    match (stats.start_date, stats.end_date) {
        (Some(start), Some(end)) => println!("  {} to {}", start, end),
        _ => println!("  (empty)"),
    }
    println!(
        "  {} categories, {} merchants",
        stats.categories, stats.merchants
    );

    if !stats.category_totals.is_empty() {
        println!("\nSpend by category:");
        let mut totals: Vec<_> = stats.category_totals.iter().collect();
        totals.sort_by(|a, b| b.1.cmp(a.1));
        for (category, total) in totals {
            println!("  {:<16} {:>10}", category, total);
        }
    }

    Ok(())
}
