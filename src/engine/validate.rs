//! Sanity warnings for query results.
//!
//! A zero total is a valid answer, but it usually means the filters and
//! the data disagree. These checks surface that to the caller instead of
//! letting a silent 0 look authoritative.

use crate::engine::executor::QueryOutcome;
use crate::nlp::{DateRange, Entities};
use crate::store::Ledger;

/// Warnings about a result that is technically valid but suspicious.
pub fn validate(
    ledger: &Ledger,
    entities: &Entities,
    range: Option<&DateRange>,
    outcome: &QueryOutcome,
) -> Vec<String> {
    let mut warnings = Vec::new();

    if let (Some(range), Some((min, max))) = (range, ledger.span()) {
        if range.start.date() > max || range.end.date() < min {
            warnings.push(format!(
                "parsed date range {} to {} is outside the ledger span {} to {}",
                range.start.date(),
                range.end.date(),
                min,
                max
            ));
        }
    }

    if let Some(category) = &entities.category {
        if !ledger.has_category(category) {
            warnings.push(format!("category '{}' not present in the ledger", category));
        }
    }

    match outcome {
        QueryOutcome::Total(0) => {
            warnings.push("result is zero, check filters or date alignment".to_string());
        }
        QueryOutcome::Average(avg) if *avg == 0.0 => {
            warnings.push("result is zero, check filters or date alignment".to_string());
        }
        QueryOutcome::Transactions(rows) if rows.is_empty() => {
            warnings.push("empty result set, may indicate over-filtering".to_string());
        }
        _ => {}
    }

    warnings
}

// ============================================================================
// Tests
// ============================================================================
