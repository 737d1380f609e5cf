//! Supplier transactions: purchases raise what is owed, payments settle it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::sources_constants::supplier_transaction_types::{PAYMENT, PURCHASE};
use crate::errors::Result;
use crate::ledger::{
    join_references, parse_record_date, resolve_direction, EntityKind, LedgerRecord,
    NewLedgerEntry,
};
use crate::utils::serde_utils::{decimal_from_value, deserialize_optional_id};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierTransaction {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<String>,
    #[serde(alias = "date")]
    pub transaction_date: String,
    /// Numeric or string amount, parsed during normalization
    pub amount: Value,
    pub transaction_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl LedgerRecord for SupplierTransaction {
    const KIND: EntityKind = EntityKind::Supplier;

    fn into_new_entry(self) -> Result<NewLedgerEntry> {
        let direction =
            resolve_direction(Self::KIND, &self.transaction_type, &[PURCHASE], &[PAYMENT])?;
        let date = parse_record_date(Self::KIND, &self.transaction_date)?;
        let counterparty_reference = join_references(&[
            self.invoice_number.as_deref(),
            self.payment_method.as_deref(),
        ]);

        Ok(NewLedgerEntry {
            date,
            direction,
            amount: decimal_from_value(&self.amount)?,
            description: self.description,
            counterparty_reference,
            source_id: self.id,
        })
    }
}
