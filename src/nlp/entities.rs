//! Rule-based entity extraction: category, merchant, amount threshold.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::Result;

/// Default merchant lexicon, one name per line
const DEFAULT_MERCHANTS: &str = include_str!("merchants.txt");

/// Minimum token length considered for fuzzy merchant matching
const FUZZY_MIN_TOKEN_LEN: usize = 6;

/// Normalized Levenshtein ratio a fuzzy merchant match must reach
const FUZZY_THRESHOLD: f64 = 0.84;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z]+").expect("Invalid regex"));

static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(above|over|greater than|>=)\s*(?:rs\.?|inr|₹)?\s*(\d+)").expect("Invalid regex")
});

/// Category keyword table. First category with a token hit wins.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("rent", &["rent", "rental", "landlord"]),
    ("cafe", &["coffee", "cafe", "cafes"]),
    ("grocery", &["grocery", "groceries", "bigbasket", "instamart"]),
    ("food", &["food", "meal", "lunch", "dinner", "swiggy", "zomato"]),
    ("transport", &["transport", "travel", "uber", "ola", "cab"]),
    ("utilities", &["utilities", "bill", "electricity", "water", "internet"]),
    ("subscriptions", &["subscription", "subscriptions", "netflix", "spotify"]),
    ("entertainment", &["entertainment", "movie", "concert"]),
    ("gifts", &["gift", "gifts"]),
    ("shopping", &["shopping", "purchase", "amazon", "flipkart"]),
];

/// A merchant implies its category when the query named none.
fn merchant_category(merchant: &str) -> Option<&'static str> {
    match merchant {
        "starbucks" | "ccd" => Some("cafe"),
        "swiggy" | "zomato" | "dominos" => Some("food"),
        "uber" | "ola" | "rapido" => Some("transport"),
        "amazon" | "flipkart" | "myntra" => Some("shopping"),
        "bigbasket" | "instamart" | "blinkit" => Some("grocery"),
        "netflix" | "spotify" => Some("subscriptions"),
        "bookmyshow" => Some("entertainment"),
        "makemytrip" => Some("travel"),
        _ => None,
    }
}

// ============================================================================
// Extracted entities
// ============================================================================

/// Entities pulled out of a query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entities {
    pub category: Option<String>,
    pub merchant: Option<String>,
    /// Lower bound from "above/over N" phrasing
    pub amount: Option<i64>,
}

// ============================================================================
// Extractor
// ============================================================================

/// Extracts category, merchant and amount threshold from free text.
pub struct EntityExtractor {
    merchants: Vec<String>,
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityExtractor {
    /// Create an extractor over the built-in merchant lexicon.
    pub fn new() -> Self {
        Self {
            merchants: parse_lexicon(DEFAULT_MERCHANTS),
        }
    }

    /// Create an extractor from a lexicon file, one merchant per line.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self {
            merchants: parse_lexicon(&content),
        })
    }

    pub fn extract(&self, query: &str) -> Entities {
        let q = query.to_lowercase();
        let tokens: Vec<&str> = TOKEN_RE.find_iter(&q).map(|m| m.as_str()).collect();

        let mut category = None;
        for (cat, keywords) in CATEGORY_KEYWORDS {
            if keywords.iter().any(|k| tokens.contains(k)) {
                category = Some(cat.to_string());
                break;
            }
        }

        // Exact merchant hit on a token, then fuzzy on longer tokens
        let mut merchant = self
            .merchants
            .iter()
            .find(|m| tokens.contains(&m.as_str()))
            .cloned();

        if merchant.is_none() {
            merchant = self.fuzzy_merchant(&tokens);
        }

        if let (None, Some(m)) = (&category, &merchant) {
            category = merchant_category(m).map(String::from);
        }

        let amount = AMOUNT_RE
            .captures(&q)
            .and_then(|caps| caps.get(2))
            .and_then(|m| m.as_str().parse().ok());

        Entities {
            category,
            merchant,
            amount,
        }
    }

    /// Closest lexicon entry for any sufficiently long token.
    fn fuzzy_merchant(&self, tokens: &[&str]) -> Option<String> {
        for token in tokens {
            if token.len() < FUZZY_MIN_TOKEN_LEN {
                continue;
            }

            let best = self
                .merchants
                .iter()
                .map(|m| (m, strsim::normalized_levenshtein(token, m)))
                .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

            if let Some((name, ratio)) = best {
                if ratio >= FUZZY_THRESHOLD {
                    return Some(name.clone());
                }
            }
        }
        None
    }
}

fn parse_lexicon(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_keyword() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract("how much did I spend on groceries last month");
        assert_eq!(entities.category.as_deref(), Some("grocery"));
        assert_eq!(entities.merchant, None);
    }

    #[test]
    fn test_exact_merchant_implies_category() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract("total spent at starbucks");
        assert_eq!(entities.merchant.as_deref(), Some("starbucks"));
        assert_eq!(entities.category.as_deref(), Some("cafe"));
    }

    #[test]
    fn test_explicit_category_wins_over_merchant_map() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract("food orders from zomato");
        assert_eq!(entities.category.as_deref(), Some("food"));
        assert_eq!(entities.merchant.as_deref(), Some("zomato"));
    }

    #[test]
    fn test_fuzzy_merchant() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract("total spent at starbuks last week");
        assert_eq!(entities.merchant.as_deref(), Some("starbucks"));
    }

    #[test]
    fn test_short_typos_are_not_fuzzed() {
        let extractor = EntityExtractor::new();
        // "ubr" is below the fuzzy length cutoff
        let entities = extractor.extract("rides with ubr");
        assert_eq!(entities.merchant, None);
    }

    #[test]
    fn test_amount_threshold() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract("transactions above 500");
        assert_eq!(entities.amount, Some(500));

        let entities = extractor.extract("expenses over rs 1200 this month");
        assert_eq!(entities.amount, Some(1200));
    }

    #[test]
    fn test_no_substring_false_positive() {
        let extractor = EntityExtractor::new();
        // "current" must not hit the "rent" keyword
        let entities = extractor.extract("spending for the current month");
        assert_eq!(entities.category, None);
    }

    #[test]
    fn test_empty_query() {
        let extractor = EntityExtractor::new();
        assert_eq!(extractor.extract(""), Entities::default());
    }
}
