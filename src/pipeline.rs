//! End-to-end query pipeline: classify, extract, parse dates, execute.

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::engine::{self, QueryOutcome};
use crate::nlp::{DateRangeParser, Entities, EntityExtractor, IntentClassifier, IntentResult};
use crate::store::Ledger;

/// Structured answer to one natural-language query.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub query: String,
    pub intent: IntentResult,
    pub entities: Entities,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub result: QueryOutcome,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub elapsed_ms: f64,
    pub cached: bool,
}

/// The full query-understanding pipeline over one ledger.
pub struct QueryPipeline {
    classifier: IntentClassifier,
    extractor: EntityExtractor,
    dates: DateRangeParser,
    ledger: Ledger,
    confidence_threshold: f32,
}

impl QueryPipeline {
    /// Build a pipeline over an already-loaded ledger.
    pub fn new(ledger: Ledger) -> Self {
        Self {
            classifier: IntentClassifier::new(),
            extractor: EntityExtractor::new(),
            dates: DateRangeParser::new(),
            ledger,
            confidence_threshold: 0.3,
        }
    }

    /// Build a pipeline from configuration, loading the ledger and any
    /// merchant lexicon override from disk.
    pub fn from_config(config: &Config) -> Result<Self> {
        let ledger = Ledger::load(&config.data.transactions)?;
        let extractor = match &config.data.merchants {
            Some(path) => EntityExtractor::from_file(path)?,
            None => EntityExtractor::new(),
        };

        Ok(Self {
            classifier: IntentClassifier::new(),
            extractor,
            dates: DateRangeParser::new(),
            ledger,
            confidence_threshold: config.general.confidence_threshold,
        })
    }

    /// Set the score below which a low-confidence warning is attached.
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Run a query relative to the current wall clock.
    pub fn run(&self, query: &str, limit: Option<usize>) -> Result<QueryResponse> {
        self.run_at(query, Local::now().naive_local(), limit)
    }

    /// Run a query relative to an explicit reference instant.
    pub fn run_at(
        &self,
        query: &str,
        now: NaiveDateTime,
        limit: Option<usize>,
    ) -> Result<QueryResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::QueryError {
                message: "query must not be empty".to_string(),
            });
        }

        let start = Instant::now();

        let intent = self.classifier.classify(query);
        let entities = self.extractor.extract(query);
        let range = self.dates.parse(query, now);

        let result = engine::execute(&self.ledger, intent.label, &entities, range.as_ref(), limit);

        let mut warnings = engine::validate(&self.ledger, &entities, range.as_ref(), &result);
        if intent.score < self.confidence_threshold {
            warnings.push(format!(
                "low-confidence intent match (score {:.3})",
                intent.score
            ));
        }

        let elapsed = start.elapsed();
        debug!(
            query = %query,
            intent = %intent.label,
            score = intent.score,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "Query executed"
        );

        Ok(QueryResponse {
            query: query.to_string(),
            intent,
            entities,
            start_date: range.map(|r| r.start),
            end_date: range.map(|r| r.end),
            result,
            warnings,
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
            cached: false,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
