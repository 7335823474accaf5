//! Query understanding: intent classification, entity extraction, date ranges

pub mod dates;
pub mod entities;
pub mod intent;

pub use dates::{DateRange, DateRangeParser};
pub use entities::{Entities, EntityExtractor};
pub use intent::{Intent, IntentClassifier, IntentResult};
