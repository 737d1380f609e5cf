//! Sources module - the backend record shape of each entity ledger.
//!
//! Each record type maps its own type tags onto `Direction` and is served by
//! the entity's REST endpoints. The store aliases bind a `LedgerStore` to one
//! record type.

mod bank_account;
mod customer;
mod sources_constants;
mod supplier;
mod tank;

pub use bank_account::BankTransaction;
pub use customer::CustomerTransaction;
pub use sources_constants::*;
pub use supplier::SupplierTransaction;
pub use tank::TankTransaction;

use crate::ledger::LedgerStore;

pub type BankAccountLedgerStore = LedgerStore<BankTransaction>;
pub type TankLedgerStore = LedgerStore<TankTransaction>;
pub type SupplierLedgerStore = LedgerStore<SupplierTransaction>;
pub type CustomerLedgerStore = LedgerStore<CustomerTransaction>;
