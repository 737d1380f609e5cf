//! Ledger module - models, normalization, running-balance computation and stores.
//!
//! Every entity ledger (bank account, tank, supplier, customer) goes through
//! the same pipeline: records are normalized into `NewLedgerEntry` values,
//! the calculator sorts them and assigns running balances, and a
//! `LedgerStore` publishes the result.

mod ledger_calculator;
mod ledger_model;
mod ledger_normalizer;
mod ledger_store;
mod ledger_traits;

pub use ledger_calculator::*;
pub use ledger_model::*;
pub use ledger_normalizer::*;
pub use ledger_store::*;
pub use ledger_traits::*;
