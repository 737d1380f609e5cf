//! Tank transactions: fuel volume added to or drawn from a tank.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::sources_constants::tank_transaction_types::{ADDITION, REMOVAL};
use crate::errors::Result;
use crate::ledger::{
    join_references, parse_record_date, resolve_direction, EntityKind, LedgerRecord,
    NewLedgerEntry,
};
use crate::utils::serde_utils::{decimal_from_value, deserialize_optional_id};

/// A tank stock movement as returned by the backend. Amounts are volumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TankTransaction {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<String>,
    #[serde(alias = "date")]
    pub transaction_date: String,
    /// Numeric or string volume, parsed during normalization
    #[serde(alias = "quantity")]
    pub volume: Value,
    pub transaction_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub supplier_name: Option<String>,
    #[serde(default)]
    pub invoice_number: Option<String>,
}

impl LedgerRecord for TankTransaction {
    const KIND: EntityKind = EntityKind::Tank;

    fn into_new_entry(self) -> Result<NewLedgerEntry> {
        let direction =
            resolve_direction(Self::KIND, &self.transaction_type, &[ADDITION], &[REMOVAL])?;
        let date = parse_record_date(Self::KIND, &self.transaction_date)?;
        let counterparty_reference = join_references(&[
            self.supplier_name.as_deref(),
            self.invoice_number.as_deref(),
        ]);

        Ok(NewLedgerEntry {
            date,
            direction,
            amount: decimal_from_value(&self.volume)?,
            description: self.description,
            counterparty_reference,
            source_id: self.id,
        })
    }
}
