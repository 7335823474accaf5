//! Eval command implementation

use chrono::Local;

use crate::cli::EvalArgs;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::eval;
use crate::pipeline::QueryPipeline;

/// Run the eval command
pub fn run(args: EvalArgs) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(data) = args.data {
        config.data.transactions = data;
    }

    let cases = eval::load_cases(args.cases.as_deref())?;
    let pipeline = QueryPipeline::from_config(&config)?;
    let report = eval::run(&pipeline, &cases, Local::now().naive_local());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for case in &report.cases {
        let mark = if case.passed {
            "\x1b[32m✓\x1b[0m"
        } else {
            "\x1b[31m✗\x1b[0m"
        };
        println!("{} {:02}. {}", mark, case.id, case.query);

        if !case.intent_ok {
            println!(
                "      intent: expected {}, got {}",
                case.expected_intent, case.predicted_intent
            );
        }
        if !case.category_ok {
            println!(
                "      category: got {}",
                case.predicted_category.as_deref().unwrap_or("none")
            );
        }
        if !case.merchant_ok {
            println!(
                "      merchant: got {}",
                case.predicted_merchant.as_deref().unwrap_or("none")
            );
        }
        if !case.date_ok {
            println!("      date: no range parsed");
        }
    }

    println!();
    if report.passed == report.total {
        println!(
            "\x1b[32m>\x1b[0m {}/{} cases passed",
            report.passed, report.total
        );
    } else {
        println!(
            "\x1b[31m>\x1b[0m {}/{} cases passed",
            report.passed, report.total
        );
    }

    Ok(())
}
