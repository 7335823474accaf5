//! Human-readable output formatting

use crate::engine::QueryOutcome;
use crate::pipeline::QueryResponse;

/// Format a response for human consumption
pub fn format(response: &QueryResponse) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Intent: {} (score {:.3}, margin {:.3})\n",
        response.intent.label, response.intent.score, response.intent.margin
    ));

    let category = response.entities.category.as_deref().unwrap_or("-");
    let merchant = response.entities.merchant.as_deref().unwrap_or("-");
    let amount = response
        .entities
        .amount
        .map(|a| format!(">= {}", a))
        .unwrap_or_else(|| "-".to_string());
    output.push_str(&format!(
        "Filters: category={} merchant={} amount={}\n",
        category, merchant, amount
    ));

    match (&response.start_date, &response.end_date) {
        (Some(start), Some(end)) => {
            output.push_str(&format!("Period: {} to {}\n", start.date(), end.date()));
        }
        _ => output.push_str("Period: (unbounded)\n"),
    }

    output.push('\n');

    match &response.result {
        QueryOutcome::Total(total) => {
            output.push_str(&format!("Total spend: {}\n", total));
        }
        QueryOutcome::Average(avg) => {
            output.push_str(&format!("Average spend: {:.2}\n", avg));
        }
        QueryOutcome::TopCategory(Some(category)) => {
            output.push_str(&format!("Top category: {}\n", category));
        }
        QueryOutcome::TopCategory(None) => {
            output.push_str("Top category: (ledger is empty)\n");
        }
        QueryOutcome::Comparison(map) if map.is_empty() => {
            output.push_str("Comparison: no date range in query\n");
        }
        QueryOutcome::Comparison(map) => {
            output.push_str("Comparison:\n");
            for (period, total) in map {
                output.push_str(&format!("  {}  {}\n", period, total));
            }
        }
        QueryOutcome::Transactions(rows) if rows.is_empty() => {
            output.push_str("No matching transactions\n");
        }
        QueryOutcome::Transactions(rows) => {
            output.push_str(&format!("{} transactions:\n", rows.len()));
            for t in rows {
                output.push_str(&format!(
                    "  {}  {:>8}  {:<14}  {}\n",
                    t.date, t.amount, t.category, t.merchant
                ));
            }
        }
    }

    for warning in &response.warnings {
        output.push_str(&format!("\n\x1b[33m!\x1b[0m {}", warning));
    }
    if !response.warnings.is_empty() {
        output.push('\n');
    }

    output.push_str(&format!("\n({:.1}ms)\n", response.elapsed_ms));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{Entities, Intent, IntentResult};

    #[test]
    fn test_total_format() {
        let response = QueryResponse {
            query: "total spending".into(),
            intent: IntentResult {
                label: Intent::TotalSpend,
                score: 0.9,
                margin: 0.5,
            },
            entities: Entities::default(),
            start_date: None,
            end_date: None,
            result: QueryOutcome::Total(4520),
            warnings: vec!["result is zero".into()],
            elapsed_ms: 1.5,
            cached: false,
        };

        let text = format(&response);
        assert!(text.contains("Intent: total_spend"));
        assert!(text.contains("Total spend: 4520"));
        assert!(text.contains("Period: (unbounded)"));
        assert!(text.contains("result is zero"));
    }
}
