//! Ledger traits: the record contract and the transaction source seam.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

use super::ledger_model::{EntityKind, NewLedgerEntry};
use crate::errors::Result;

/// A backend transaction record that can be normalized into a ledger entry.
///
/// Each entity kind has its own record shape and type tags; implementors
/// resolve the tag to a `Direction` and copy the amount verbatim.
pub trait LedgerRecord: DeserializeOwned + Send + Sync + 'static {
    /// The entity kind whose endpoints serve this record.
    const KIND: EntityKind;

    /// Converts the record, failing on an unrecognized type tag or date.
    fn into_new_entry(self) -> Result<NewLedgerEntry>;
}

/// Trait defining the contract for fetching ledger inputs from the backend.
#[async_trait]
pub trait TransactionSourceTrait<R: LedgerRecord>: Send + Sync {
    /// The entity's declared opening balance, fixed at creation.
    async fn opening_balance(&self, entity_id: &str) -> Result<Decimal>;

    /// Balance at the opening of `as_of`, i.e. over all entries strictly
    /// before that day, seeded from the opening balance.
    async fn balance_as_of(&self, entity_id: &str, as_of: NaiveDate) -> Result<Decimal>;

    /// Transactions dated within `[from, to]` inclusive. With `from` unset the
    /// range is open at the start of the entity's history.
    async fn transactions(
        &self,
        entity_id: &str,
        from: Option<NaiveDate>,
        to: NaiveDate,
    ) -> Result<Vec<R>>;
}
