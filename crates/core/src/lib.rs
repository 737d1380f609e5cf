//! Pumpdesk Core - Ledger models, normalization, computation and stores.
//!
//! This crate contains the ledger business logic for the pumpdesk fuel station
//! back office. It is transport-agnostic and defines the
//! `TransactionSourceTrait` seam that is implemented by the `client` crate.

pub mod constants;
pub mod errors;
pub mod ledger;
pub mod sources;
pub mod utils;

// Re-export the ledger surface used by every consumer
pub use ledger::*;
pub use sources::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
