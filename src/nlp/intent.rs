//! Intent classification against a fixed label set.
//!
//! Every label carries a set of template phrases. The query is scored
//! against each phrase with a token-frequency cosine and the best phrase
//! wins its label. Deterministic: same query, same answer.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]+").expect("Invalid regex"));

/// Listing queries get this score floor when "show"/"list" appears
const LIST_SCORE_FLOOR: f32 = 0.55;

// ============================================================================
// Intent labels
// ============================================================================

/// The fixed label set the classifier scores against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    TotalSpend,
    ListTransactions,
    TopCategory,
    ComparePeriods,
    AverageSpend,
}

impl Intent {
    pub const ALL: [Intent; 5] = [
        Intent::TotalSpend,
        Intent::ListTransactions,
        Intent::TopCategory,
        Intent::ComparePeriods,
        Intent::AverageSpend,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TotalSpend => "total_spend",
            Self::ListTransactions => "list_transactions",
            Self::TopCategory => "top_category",
            Self::ComparePeriods => "compare_periods",
            Self::AverageSpend => "average_spend",
        }
    }

    /// Template phrases scored against the query.
    fn templates(&self) -> &'static [&'static str] {
        match self {
            Self::TotalSpend => &[
                "how much did i spend",
                "total spending",
                "total expenses",
                "how much money did i spend",
                "spend on",
            ],
            Self::ListTransactions => &[
                "show my",
                "show all",
                "list my",
                "list all",
                "show expenses",
                "show purchases",
                "show transactions",
            ],
            Self::TopCategory => &[
                "highest spending category",
                "biggest expense",
                "most spent on",
                "top spending category",
            ],
            Self::ComparePeriods => &["compare my spending", "compare expenses", "versus", "vs"],
            Self::AverageSpend => &["average spending", "average expense", "average spend"],
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Classification result
// ============================================================================

/// Best label for a query, with its score and the margin over the runner-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentResult {
    pub label: Intent,
    /// Similarity of the best template phrase (0.0 to 1.0, 3 decimals)
    pub score: f32,
    /// Gap to the best phrase of any other label (3 decimals)
    pub margin: f32,
}

// ============================================================================
// Classifier
// ============================================================================

/// Scores queries against the template phrases of every label.
pub struct IntentClassifier {
    /// Precomputed token-frequency vectors, one per template phrase
    phrases: Vec<(Intent, HashMap<String, f32>)>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    pub fn new() -> Self {
        let mut phrases = Vec::new();
        for intent in Intent::ALL {
            for phrase in intent.templates() {
                phrases.push((intent, term_counts(phrase)));
            }
        }
        Self { phrases }
    }

    /// Classify a query into the best-matching label.
    pub fn classify(&self, query: &str) -> IntentResult {
        let query_lower = query.to_lowercase();
        let query_counts = term_counts(&query_lower);

        // Best phrase score per label
        let mut best: HashMap<Intent, f32> = HashMap::new();
        for (intent, phrase_counts) in &self.phrases {
            let score = cosine(&query_counts, phrase_counts);
            let entry = best.entry(*intent).or_insert(0.0);
            if score > *entry {
                *entry = score;
            }
        }

        // Listing queries are often phrased as bare imperatives; keep them
        // from losing to longer aggregate templates.
        if query_lower.contains("show") || query_lower.contains("list") {
            let entry = best.entry(Intent::ListTransactions).or_insert(0.0);
            if *entry < LIST_SCORE_FLOOR {
                *entry = LIST_SCORE_FLOOR;
            }
        }

        let (label, score) = Intent::ALL
            .iter()
            .map(|intent| (*intent, best.get(intent).copied().unwrap_or(0.0)))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .unwrap_or((Intent::TotalSpend, 0.0));

        let runner_up = Intent::ALL
            .iter()
            .filter(|intent| **intent != label)
            .map(|intent| best.get(intent).copied().unwrap_or(0.0))
            .fold(0.0_f32, f32::max);

        IntentResult {
            label,
            score: round3(score),
            margin: round3(score - runner_up),
        }
    }
}

// ============================================================================
// Scoring helpers
// ============================================================================

fn term_counts(text: &str) -> HashMap<String, f32> {
    let mut counts = HashMap::new();
    for m in WORD_RE.find_iter(&text.to_lowercase()) {
        *counts.entry(m.as_str().to_string()).or_insert(0.0) += 1.0;
    }
    counts
}

fn cosine(a: &HashMap<String, f32>, b: &HashMap<String, f32>) -> f32 {
    let dot: f32 = a
        .iter()
        .filter_map(|(term, va)| b.get(term).map(|vb| va * vb))
        .sum();
    if dot == 0.0 {
        return 0.0;
    }
    let norm_a: f32 = a.values().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b: f32 = b.values().map(|v| v * v).sum::<f32>().sqrt();
    dot / (norm_a * norm_b)
}

fn round3(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}

// ============================================================================
// Tests
// ============================================================================
