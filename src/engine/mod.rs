//! Deterministic execution over the ledger

pub mod executor;
pub mod validate;

pub use executor::{execute, QueryOutcome};
pub use validate::validate;
