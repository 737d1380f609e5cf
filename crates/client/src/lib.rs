//! Pumpdesk Client - REST transaction source for the pumpdesk backend.
//!
//! This crate implements `TransactionSourceTrait` over the backend's
//! `/{entity}/{id}` endpoints so ledger stores can fetch balances and
//! transactions for any entity kind.

pub mod client;

pub use client::{ClientConfig, LedgerApiClient, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
