//! Transaction storage

pub mod ledger;

pub use ledger::{Ledger, LedgerFilter, LedgerStats, Transaction};
