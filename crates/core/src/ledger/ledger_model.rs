//! Ledger domain models.

use std::fmt;

use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

/// The kinds of entity that carry a running-balance ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    /// Bank account: credits and debits of money
    BankAccount,
    /// Fuel tank: additions and removals of volume
    Tank,
    /// Supplier: purchases owed and payments made
    Supplier,
    /// Customer on credit: bills raised and payments received
    Customer,
}

impl EntityKind {
    /// REST path segment for this entity's endpoints.
    pub fn path_segment(&self) -> &'static str {
        match self {
            EntityKind::BankAccount => "bank-accounts",
            EntityKind::Tank => "tanks",
            EntityKind::Supplier => "suppliers",
            EntityKind::Customer => "customers",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::BankAccount => "bank account",
            EntityKind::Tank => "tank",
            EntityKind::Supplier => "supplier",
            EntityKind::Customer => "customer",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a movement adds to or subtracts from the balance.
///
/// Credit vs debit, addition vs removal, purchase vs payment: the meaning
/// depends on the entity but the arithmetic is the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Increase,
    Decrease,
}

impl Direction {
    /// The amount with this direction's sign applied.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            Direction::Increase => amount,
            Direction::Decrease => -amount,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Increase => "INCREASE",
            Direction::Decrease => "DECREASE",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized movement that has not been placed in a ledger yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLedgerEntry {
    /// Effective date of the movement
    pub date: DateTime<Utc>,
    pub direction: Direction,
    /// Non-negative magnitude, copied verbatim from the source record
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Supplier or invoice name, payment method and similar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterparty_reference: Option<String>,
    /// Backend record id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

impl NewLedgerEntry {
    pub fn new(date: DateTime<Utc>, direction: Direction, amount: Decimal) -> Self {
        Self {
            date,
            direction,
            amount,
            description: None,
            counterparty_reference: None,
            source_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_counterparty_reference(mut self, reference: impl Into<String>) -> Self {
        self.counterparty_reference = Some(reference.into());
        self
    }

    /// Signed contribution of this entry to the balance.
    pub fn signed_amount(&self) -> Decimal {
        self.direction.signed(self.amount)
    }

    /// Attaches the balance immediately after this entry.
    pub fn into_entry(self, running_balance: Decimal) -> LedgerEntry {
        LedgerEntry {
            date: self.date,
            direction: self.direction,
            amount: self.amount,
            running_balance,
            description: self.description,
            counterparty_reference: self.counterparty_reference,
            source_id: self.source_id,
        }
    }
}

/// One dated movement placed in chronological order with its running balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub date: DateTime<Utc>,
    pub direction: Direction,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// Balance immediately after this entry is applied
    #[serde(with = "rust_decimal::serde::str")]
    pub running_balance: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterparty_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

/// Sums of increases and decreases over some set of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementTotals {
    #[serde(with = "rust_decimal::serde::str")]
    pub increase: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub decrease: Decimal,
}

impl MovementTotals {
    pub fn new(increase: Decimal, decrease: Decimal) -> Self {
        Self { increase, decrease }
    }

    /// Increase minus decrease.
    pub fn net(&self) -> Decimal {
        self.increase - self.decrease
    }

    /// Adds one movement to the totals.
    pub fn record(&mut self, direction: Direction, amount: Decimal) -> Result<()> {
        let total = match direction {
            Direction::Increase => &mut self.increase,
            Direction::Decrease => &mut self.decrease,
        };
        *total = total
            .checked_add(amount)
            .ok_or_else(|| ValidationError::Overflow(format!("{} total", direction)))?;
        Ok(())
    }

    /// Combines two sets of totals, or `None` if either side overflows.
    pub fn checked_add(&self, other: &MovementTotals) -> Option<MovementTotals> {
        Some(MovementTotals {
            increase: self.increase.checked_add(other.increase)?,
            decrease: self.decrease.checked_add(other.decrease)?,
        })
    }
}

/// Aggregates over a query window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    /// The entity's declared starting balance, fixed at creation
    #[serde(with = "rust_decimal::serde::str")]
    pub opening_balance: Decimal,
    /// Balance over all entries strictly before the range
    #[serde(with = "rust_decimal::serde::str")]
    pub balance_before_range: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_increase_in_range: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_decrease_in_range: Decimal,
    /// `balance_before_range + increase - decrease`
    #[serde(with = "rust_decimal::serde::str")]
    pub closing_balance: Decimal,
    pub entry_count: usize,
    /// True increase/decrease totals before the range, when fetched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prior_totals: Option<MovementTotals>,
    /// Prior totals plus in-range totals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub till_date_totals: Option<MovementTotals>,
}

impl LedgerSummary {
    /// Summary of a range with no entries.
    pub fn empty(opening_balance: Decimal, balance_before_range: Decimal) -> Self {
        Self {
            opening_balance,
            balance_before_range,
            total_increase_in_range: Decimal::ZERO,
            total_decrease_in_range: Decimal::ZERO,
            closing_balance: balance_before_range,
            entry_count: 0,
            prior_totals: None,
            till_date_totals: None,
        }
    }

    pub fn totals_in_range(&self) -> MovementTotals {
        MovementTotals::new(self.total_increase_in_range, self.total_decrease_in_range)
    }

    /// Checks the closing-balance identity.
    pub fn is_reconciled(&self) -> bool {
        self.balance_before_range
            .checked_add(self.total_increase_in_range)
            .and_then(|balance| balance.checked_sub(self.total_decrease_in_range))
            == Some(self.closing_balance)
    }

    /// Attaches the true before-range totals and the derived till-date totals.
    ///
    /// Fails when the opening balance plus the prior net movement does not land
    /// on the backend's balance before the range: the history and the balance
    /// disagree and any statement built from them would be wrong.
    pub fn with_prior_totals(mut self, prior: MovementTotals) -> Result<Self> {
        let prior_net = prior
            .increase
            .checked_sub(prior.decrease)
            .ok_or_else(|| ValidationError::Overflow("prior net movement".to_string()))?;
        let expected = self
            .opening_balance
            .checked_add(prior_net)
            .ok_or_else(|| ValidationError::Overflow("balance before range".to_string()))?;

        if expected != self.balance_before_range {
            return Err(ValidationError::Unreconciled {
                opening_balance: self.opening_balance,
                prior_net,
                balance_before_range: self.balance_before_range,
            }
            .into());
        }

        let till_date = prior
            .checked_add(&self.totals_in_range())
            .ok_or_else(|| ValidationError::Overflow("till-date totals".to_string()))?;
        self.till_date_totals = Some(till_date);
        self.prior_totals = Some(prior);
        Ok(self)
    }
}

/// Entries with running balances plus their summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerComputation {
    pub entries: Vec<LedgerEntry>,
    pub summary: LedgerSummary,
}

/// Inclusive report window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerQuery {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

impl LedgerQuery {
    pub fn new(from_date: NaiveDate, to_date: NaiveDate) -> Self {
        Self { from_date, to_date }
    }

    pub fn validate(&self) -> Result<()> {
        if self.from_date > self.to_date {
            return Err(ValidationError::InvalidDateRange {
                from: self.from_date,
                to: self.to_date,
            }
            .into());
        }
        Ok(())
    }

    /// Last day strictly before the range.
    pub fn day_before_range(&self) -> Result<NaiveDate> {
        self.from_date
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| {
                ValidationError::InvalidInput(format!(
                    "no day precedes {}",
                    self.from_date
                ))
                .into()
            })
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        let day = instant.date_naive();
        day >= self.from_date && day <= self.to_date
    }
}

/// A computed ledger for one entity and one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerReport {
    pub entity_kind: EntityKind,
    pub entity_id: String,
    pub query: LedgerQuery,
    pub entries: Vec<LedgerEntry>,
    pub summary: LedgerSummary,
}

impl LedgerReport {
    pub fn new(
        entity_kind: EntityKind,
        entity_id: impl Into<String>,
        query: LedgerQuery,
        computation: LedgerComputation,
    ) -> Self {
        Self {
            entity_kind,
            entity_id: entity_id.into(),
            query,
            entries: computation.entries,
            summary: computation.summary,
        }
    }
}
