//! Running-balance computation shared by every entity ledger.
//!
//! Pure functions over in-memory entries: no I/O and no shared state, so the
//! same input always yields the same entries and summary.

use rust_decimal::Decimal;

use super::ledger_model::{LedgerComputation, LedgerSummary, MovementTotals, NewLedgerEntry};
use crate::errors::{Result, ValidationError};

/// Computes running balances and range totals.
///
/// Entries are sorted by date with a stable sort, so entries sharing a
/// timestamp keep their input order and repeated calls agree. The walk starts
/// from `balance_before_range`; `opening_balance` only feeds the summary.
pub fn compute_ledger(
    mut entries: Vec<NewLedgerEntry>,
    balance_before_range: Decimal,
    opening_balance: Decimal,
) -> Result<LedgerComputation> {
    validate_entries(&entries)?;

    entries.sort_by_key(|entry| entry.date);

    let mut running = balance_before_range;
    let mut totals = MovementTotals::default();
    let entry_count = entries.len();
    let mut placed = Vec::with_capacity(entry_count);

    for entry in entries {
        running = running.checked_add(entry.signed_amount()).ok_or_else(|| {
            ValidationError::Overflow(format!("running balance at {}", entry.date.to_rfc3339()))
        })?;
        totals.record(entry.direction, entry.amount)?;
        placed.push(entry.into_entry(running));
    }

    let summary = LedgerSummary {
        opening_balance,
        balance_before_range,
        total_increase_in_range: totals.increase,
        total_decrease_in_range: totals.decrease,
        closing_balance: running,
        entry_count,
        prior_totals: None,
        till_date_totals: None,
    };

    Ok(LedgerComputation {
        entries: placed,
        summary,
    })
}

/// Sums increases and decreases without placing entries in a ledger.
pub fn summarize_movements(entries: &[NewLedgerEntry]) -> Result<MovementTotals> {
    validate_entries(entries)?;

    let mut totals = MovementTotals::default();
    for entry in entries {
        totals.record(entry.direction, entry.amount)?;
    }
    Ok(totals)
}

fn validate_entries(entries: &[NewLedgerEntry]) -> Result<()> {
    let negative = entries
        .iter()
        .find(|e| e.amount.is_sign_negative() && !e.amount.is_zero());
    if let Some(entry) = negative {
        return Err(ValidationError::NegativeAmount {
            amount: entry.amount,
            date: entry.date.to_rfc3339(),
        }
        .into());
    }
    Ok(())
}
