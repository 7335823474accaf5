//! CSV-backed transaction ledger.
//!
//! Real exports are messy: repeated header rows, blank lines, unparseable
//! dates. Loading is lenient, so bad rows are dropped and counted rather
//! than failing the whole file.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::core::error::{Error, Result};

/// Date formats accepted in the `date` column, tried in order
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%m/%d/%Y"];

/// One expense row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub amount: i64,
    pub category: String,
    pub merchant: String,
}

/// Filter over ledger rows. All bounds inclusive; `None` means unfiltered.
#[derive(Debug, Clone, Default)]
pub struct LedgerFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub category: Option<String>,
    pub merchant: Option<String>,
    pub min_amount: Option<i64>,
}

impl LedgerFilter {
    fn matches(&self, t: &Transaction) -> bool {
        if let Some(start) = self.start {
            if t.date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if t.date > end {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if t.category != *category {
                return false;
            }
        }
        if let Some(merchant) = &self.merchant {
            if t.merchant != *merchant {
                return false;
            }
        }
        if let Some(min) = self.min_amount {
            if t.amount < min {
                return false;
            }
        }
        true
    }
}

/// Ledger summary
#[derive(Debug, Clone, Serialize)]
pub struct LedgerStats {
    pub rows: usize,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub categories: usize,
    pub merchants: usize,
    pub category_totals: BTreeMap<String, i64>,
}

// ============================================================================
// Ledger
// ============================================================================

/// In-memory transaction table.
#[derive(Debug)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    /// Load a ledger from a CSV file with `date,amount,category,merchant`
    /// columns (any order, extra columns ignored).
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::LedgerNotFound {
                path: path.to_path_buf(),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        let date_idx = column_index(&headers, "date", path)?;
        let amount_idx = column_index(&headers, "amount", path)?;
        let category_idx = column_index(&headers, "category", path)?;
        let merchant_idx = column_index(&headers, "merchant", path)?;

        let mut transactions = Vec::new();
        let mut dropped = 0usize;

        for record in reader.records() {
            let record = record?;

            let date_cell = record.get(date_idx).unwrap_or("");
            // Concatenated exports repeat the header line mid-file
            if date_cell.is_empty() || date_cell.eq_ignore_ascii_case("date") {
                dropped += 1;
                continue;
            }

            let (date, amount) = match (parse_date(date_cell), parse_amount(record.get(amount_idx)))
            {
                (Some(date), Some(amount)) => (date, amount),
                _ => {
                    dropped += 1;
                    continue;
                }
            };

            transactions.push(Transaction {
                date,
                amount,
                category: record.get(category_idx).unwrap_or("").to_lowercase(),
                merchant: record.get(merchant_idx).unwrap_or("").to_lowercase(),
            });
        }

        if dropped > 0 {
            warn!(path = %path.display(), dropped, "Dropped unparseable ledger rows");
        }
        debug!(path = %path.display(), rows = transactions.len(), "Loaded ledger");

        Ok(Self { transactions })
    }

    /// Build a ledger from rows already in memory.
    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Rows matching a filter.
    pub fn filter(&self, filter: &LedgerFilter) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|t| filter.matches(t))
            .collect()
    }

    /// First and last transaction date.
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.transactions.iter().map(|t| t.date).min()?;
        let max = self.transactions.iter().map(|t| t.date).max()?;
        Some((min, max))
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.transactions.iter().any(|t| t.category == category)
    }

    /// Total amount per category over the whole ledger.
    pub fn category_totals(&self) -> BTreeMap<String, i64> {
        let mut totals = BTreeMap::new();
        for t in &self.transactions {
            *totals.entry(t.category.clone()).or_insert(0) += t.amount;
        }
        totals
    }

    pub fn stats(&self) -> LedgerStats {
        let span = self.span();
        let merchants: std::collections::BTreeSet<&str> = self
            .transactions
            .iter()
            .map(|t| t.merchant.as_str())
            .collect();
        let category_totals = self.category_totals();

        LedgerStats {
            rows: self.transactions.len(),
            start_date: span.map(|(min, _)| min),
            end_date: span.map(|(_, max)| max),
            categories: category_totals.len(),
            merchants: merchants.len(),
            category_totals,
        }
    }
}

fn column_index(headers: &csv::StringRecord, name: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::LedgerError {
            message: format!("{} is missing required column '{}'", path.display(), name),
        })
}

fn parse_date(cell: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(cell, fmt).ok())
}

fn parse_amount(cell: Option<&str>) -> Option<i64> {
    let cell = cell?.trim();
    if let Ok(amount) = cell.parse::<i64>() {
        return Some(amount);
    }
    cell.parse::<f64>().ok().map(|v| v.round() as i64)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_load_clean_csv() {
        let file = write_csv(
            "date,amount,category,merchant\n\
             2025-09-01,450,food,swiggy\n\
             2025-09-02,1200,shopping,amazon\n",
        );
        let ledger = Ledger::load(file.path()).unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.transactions()[0].date, d(2025, 9, 1));
        assert_eq!(ledger.transactions()[1].amount, 1200);
    }

    #[test]
    fn test_load_skips_repeated_header_and_bad_rows() {
        let file = write_csv(
            "date,amount,category,merchant\n\
             2025-09-01,450,food,swiggy\n\
             date,amount,category,merchant\n\
             not-a-date,100,food,swiggy\n\
             2025-09-03,abc,food,swiggy\n\
             2025-09-04,300,cafe,starbucks\n",
        );
        let ledger = Ledger::load(file.path()).unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.transactions()[1].date, d(2025, 9, 4));
    }

    #[test]
    fn test_load_normalizes_case() {
        let file = write_csv(
            "date,amount,category,merchant\n\
             2025-09-01,450,Food,Swiggy\n",
        );
        let ledger = Ledger::load(file.path()).unwrap();
        assert_eq!(ledger.transactions()[0].category, "food");
        assert_eq!(ledger.transactions()[0].merchant, "swiggy");
    }

    #[test]
    fn test_missing_column_errors() {
        let file = write_csv("date,amount,category\n2025-09-01,450,food\n");
        let err = Ledger::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("merchant"));
    }

    #[test]
    fn test_missing_file_errors() {
        let err = Ledger::load(Path::new("/nonexistent/ledger.csv")).unwrap_err();
        assert!(matches!(err, Error::LedgerNotFound { .. }));
    }

    #[test]
    fn test_filter() {
        let ledger = Ledger::from_transactions(vec![
            Transaction {
                date: d(2025, 9, 1),
                amount: 450,
                category: "food".into(),
                merchant: "swiggy".into(),
            },
            Transaction {
                date: d(2025, 9, 5),
                amount: 90,
                category: "cafe".into(),
                merchant: "starbucks".into(),
            },
            Transaction {
                date: d(2025, 10, 1),
                amount: 15000,
                category: "rent".into(),
                merchant: "landlord".into(),
            },
        ]);

        let filter = LedgerFilter {
            start: Some(d(2025, 9, 1)),
            end: Some(d(2025, 9, 30)),
            ..Default::default()
        };
        assert_eq!(ledger.filter(&filter).len(), 2);

        let filter = LedgerFilter {
            category: Some("food".into()),
            ..Default::default()
        };
        assert_eq!(ledger.filter(&filter).len(), 1);

        let filter = LedgerFilter {
            min_amount: Some(400),
            ..Default::default()
        };
        assert_eq!(ledger.filter(&filter).len(), 2);
    }

    #[test]
    fn test_span_and_stats() {
        let ledger = Ledger::from_transactions(vec![
            Transaction {
                date: d(2025, 9, 1),
                amount: 450,
                category: "food".into(),
                merchant: "swiggy".into(),
            },
            Transaction {
                date: d(2025, 9, 8),
                amount: 250,
                category: "food".into(),
                merchant: "zomato".into(),
            },
        ]);

        assert_eq!(ledger.span(), Some((d(2025, 9, 1), d(2025, 9, 8))));

        let stats = ledger.stats();
        assert_eq!(stats.rows, 2);
        assert_eq!(stats.categories, 1);
        assert_eq!(stats.merchants, 2);
        assert_eq!(stats.category_totals.get("food"), Some(&700));
    }

    #[test]
    fn test_empty_ledger() {
        let ledger = Ledger::from_transactions(vec![]);
        assert!(ledger.is_empty());
        assert_eq!(ledger.span(), None);
        assert!(!ledger.has_category("food"));
    }
}
