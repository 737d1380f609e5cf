//! Customer credit transactions: bills raise the receivable, payments clear it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::sources_constants::customer_transaction_types::{BILL, CREDIT, DEBIT, PAYMENT};
use crate::errors::Result;
use crate::ledger::{
    join_references, parse_record_date, resolve_direction, EntityKind, LedgerRecord,
    NewLedgerEntry,
};
use crate::utils::serde_utils::{decimal_from_value, deserialize_optional_id};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerTransaction {
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
    pub bill_number: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl LedgerRecord for CustomerTransaction {
    const KIND: EntityKind = EntityKind::Customer;

    fn into_new_entry(self) -> Result<NewLedgerEntry> {
        let direction = resolve_direction(
            Self::KIND,
            &self.transaction_type,
            &[BILL, CREDIT],
            &[PAYMENT, DEBIT],
        )?;
        let date = parse_record_date(Self::KIND, &self.transaction_date)?;
        let counterparty_reference = join_references(&[
            self.bill_number.as_deref(),
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
