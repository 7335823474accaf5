//! Intent dispatch over the filtered ledger.

use chrono::Duration;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::nlp::{DateRange, Entities, Intent};
use crate::store::{Ledger, LedgerFilter, Transaction};

/// Structured result of executing one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryOutcome {
    Total(i64),
    Average(f64),
    TopCategory(Option<String>),
    /// Period start (`YYYY-MM`) to period total
    Comparison(BTreeMap<String, i64>),
    Transactions(Vec<Transaction>),
}

/// Execute an intent against the ledger.
///
/// `limit` caps listing results only; aggregates always see every
/// matching row.
pub fn execute(
    ledger: &Ledger,
    intent: Intent,
    entities: &Entities,
    range: Option<&DateRange>,
    limit: Option<usize>,
) -> QueryOutcome {
    let filter = build_filter(entities, range, true);
    let rows = ledger.filter(&filter);

    match intent {
        Intent::TotalSpend => QueryOutcome::Total(rows.iter().map(|t| t.amount).sum()),
        Intent::ListTransactions => {
            let mut listed: Vec<Transaction> = rows.into_iter().cloned().collect();
            if let Some(limit) = limit {
                listed.truncate(limit);
            }
            QueryOutcome::Transactions(listed)
        }
        Intent::TopCategory => QueryOutcome::TopCategory(top_category(ledger)),
        Intent::ComparePeriods => QueryOutcome::Comparison(compare_periods(ledger, entities, range)),
        Intent::AverageSpend => {
            if rows.is_empty() {
                QueryOutcome::Average(0.0)
            } else {
                let total: i64 = rows.iter().map(|t| t.amount).sum();
                QueryOutcome::Average(total as f64 / rows.len() as f64)
            }
        }
    }
}

fn build_filter(entities: &Entities, range: Option<&DateRange>, with_amount: bool) -> LedgerFilter {
    LedgerFilter {
        start: range.map(|r| r.start.date()),
        end: range.map(|r| r.end.date()),
        category: entities.category.clone(),
        merchant: entities.merchant.clone(),
        min_amount: if with_amount { entities.amount } else { None },
    }
}

/// Highest-spending category over the ENTIRE ledger.
///
/// Intentionally global: "biggest expense" asks about overall habits, so
/// date and entity filters do not apply here.
fn top_category(ledger: &Ledger) -> Option<String> {
    ledger
        .category_totals()
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1))
        .map(|(category, _)| category)
}

/// Current period total vs the immediately preceding period of equal
/// duration. Category and merchant filters apply to both periods.
fn compare_periods(
    ledger: &Ledger,
    entities: &Entities,
    range: Option<&DateRange>,
) -> BTreeMap<String, i64> {
    let mut comparison = BTreeMap::new();
    let range = match range {
        Some(range) => range,
        None => return comparison,
    };

    let delta = range.end - range.start;
    let prev_end = range.start - Duration::seconds(1);
    let prev_start = prev_end - delta;

    let mut current_filter = build_filter(entities, Some(range), false);
    let current: i64 = ledger
        .filter(&current_filter)
        .iter()
        .map(|t| t.amount)
        .sum();

    current_filter.start = Some(prev_start.date());
    current_filter.end = Some(prev_end.date());
    let previous: i64 = ledger
        .filter(&current_filter)
        .iter()
        .map(|t| t.amount)
        .sum();

    comparison.insert(range.start.format("%Y-%m").to_string(), current);
    comparison.insert(prev_start.format("%Y-%m").to_string(), previous);
    comparison
}

// ============================================================================
// Tests
// ============================================================================
