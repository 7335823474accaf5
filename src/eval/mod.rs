//! Golden-case evaluation for the query pipeline.
//!
//! Each case pins the expected intent label, entities and date presence
//! for one query. `tally eval` runs them against the live pipeline, so a
//! template or lexicon change that shifts behavior shows up immediately.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{Error, Result};
use crate::pipeline::QueryPipeline;

/// Built-in golden cases
const DEFAULT_CASES: &str = include_str!("cases.json");

/// One golden case. Absent expectations are not checked.
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub id: u32,
    pub query: String,
    pub intent: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub merchant: Option<String>,
    #[serde(default)]
    pub date_required: bool,
}

/// Outcome of one case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub id: u32,
    pub query: String,
    pub passed: bool,
    pub intent_ok: bool,
    pub category_ok: bool,
    pub merchant_ok: bool,
    pub date_ok: bool,
    pub expected_intent: String,
    pub predicted_intent: String,
    pub predicted_category: Option<String>,
    pub predicted_merchant: Option<String>,
}

/// Full evaluation report.
#[derive(Debug, Serialize)]
pub struct EvalReport {
    pub cases: Vec<CaseReport>,
    pub passed: usize,
    pub total: usize,
}

/// Load cases from a file, or the built-in set when no path is given.
pub fn load_cases(path: Option<&Path>) -> Result<Vec<TestCase>> {
    let content = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => DEFAULT_CASES.to_string(),
    };
    let cases: Vec<TestCase> = serde_json::from_str(&content)?;
    if cases.is_empty() {
        return Err(Error::EvalError {
            message: "no test cases loaded".to_string(),
        });
    }
    Ok(cases)
}

/// Run every case through the pipeline.
pub fn run(pipeline: &QueryPipeline, cases: &[TestCase], now: NaiveDateTime) -> EvalReport {
    let mut reports = Vec::with_capacity(cases.len());

    for case in cases {
        let report = match pipeline.run_at(&case.query, now, None) {
            Ok(response) => {
                let intent_ok = response.intent.label.as_str() == case.intent;
                let category_ok = case
                    .category
                    .as_ref()
                    .map(|expected| response.entities.category.as_ref() == Some(expected))
                    .unwrap_or(true);
                let merchant_ok = case
                    .merchant
                    .as_ref()
                    .map(|expected| response.entities.merchant.as_ref() == Some(expected))
                    .unwrap_or(true);
                let date_ok =
                    !case.date_required || response.start_date.is_some() || response.end_date.is_some();

                CaseReport {
                    id: case.id,
                    query: case.query.clone(),
                    passed: intent_ok && category_ok && merchant_ok && date_ok,
                    intent_ok,
                    category_ok,
                    merchant_ok,
                    date_ok,
                    expected_intent: case.intent.clone(),
                    predicted_intent: response.intent.label.as_str().to_string(),
                    predicted_category: response.entities.category,
                    predicted_merchant: response.entities.merchant,
                }
            }
            Err(_) => CaseReport {
                id: case.id,
                query: case.query.clone(),
                passed: false,
                intent_ok: false,
                category_ok: false,
                merchant_ok: false,
                date_ok: false,
                expected_intent: case.intent.clone(),
                predicted_intent: "(error)".to_string(),
                predicted_category: None,
                predicted_merchant: None,
            },
        };
        reports.push(report);
    }

    let passed = reports.iter().filter(|r| r.passed).count();
    EvalReport {
        total: reports.len(),
        passed,
        cases: reports,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Ledger, Transaction};
    use chrono::NaiveDate;

    fn pipeline() -> QueryPipeline {
        QueryPipeline::new(Ledger::from_transactions(vec![Transaction {
            date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            amount: 450,
            category: "food".into(),
            merchant: "swiggy".into(),
        }]))
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_builtin_cases_all_pass() {
        let cases = load_cases(None).unwrap();
        let report = run(&pipeline(), &cases, now());
        let failed: Vec<_> = report.cases.iter().filter(|c| !c.passed).collect();
        assert!(failed.is_empty(), "failing cases: {:?}", failed);
        assert_eq!(report.passed, report.total);
    }

    #[test]
    fn test_failing_expectation_is_reported() {
        let cases = vec![TestCase {
            id: 1,
            query: "biggest expense".into(),
            intent: "average_spend".into(),
            category: None,
            merchant: None,
            date_required: false,
        }];
        let report = run(&pipeline(), &cases, now());
        assert_eq!(report.passed, 0);
        assert!(!report.cases[0].intent_ok);
        assert_eq!(report.cases[0].predicted_intent, "top_category");
    }

    #[test]
    fn test_empty_cases_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[]").unwrap();
        let err = load_cases(Some(file.path())).unwrap_err();
        assert!(matches!(err, Error::EvalError { .. }));
    }
}
