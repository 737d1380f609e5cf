//! Normalization of entity-specific records into ledger entries.

use chrono::{DateTime, Utc};
use log::debug;

use super::ledger_model::{Direction, EntityKind, NewLedgerEntry};
use super::ledger_traits::LedgerRecord;
use crate::errors::{MappingError, Result};
use crate::utils::time_utils::parse_ledger_date;

/// Converts every record into a `NewLedgerEntry`.
///
/// Order is not significant here; the calculator re-sorts. A single record
/// that cannot be mapped fails the whole batch: skipping it would leave a
/// hole in the running balance.
pub fn normalize_records<R: LedgerRecord>(records: Vec<R>) -> Result<Vec<NewLedgerEntry>> {
    let count = records.len();
    let entries = records
        .into_iter()
        .map(LedgerRecord::into_new_entry)
        .collect::<Result<Vec<_>>>()?;

    debug!("[Normalizer] Mapped {} {} records", count, R::KIND);
    Ok(entries)
}

/// Resolves a type tag against an entity's increase and decrease tag tables.
///
/// Tags are compared after trimming, ignoring ASCII case.
pub fn resolve_direction(
    entity: EntityKind,
    tag: &str,
    increase_tags: &[&str],
    decrease_tags: &[&str],
) -> std::result::Result<Direction, MappingError> {
    let normalized = tag.trim();
    let matches = |tags: &[&str]| tags.iter().any(|t| t.eq_ignore_ascii_case(normalized));

    if matches(increase_tags) {
        Ok(Direction::Increase)
    } else if matches(decrease_tags) {
        Ok(Direction::Decrease)
    } else {
        Err(MappingError::UnknownTypeTag {
            entity,
            tag: tag.to_string(),
        })
    }
}

/// Parses a record's effective date, naming the entity on failure.
pub fn parse_record_date(
    entity: EntityKind,
    value: &str,
) -> std::result::Result<DateTime<Utc>, MappingError> {
    parse_ledger_date(value).ok_or_else(|| MappingError::InvalidDate {
        entity,
        value: value.to_string(),
    })
}

/// Joins the non-blank reference fields of a record with " / ".
pub fn join_references(parts: &[Option<&str>]) -> Option<String> {
    let joined = parts
        .iter()
        .flatten()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" / ");

    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INCREASE: &[&str] = &["CREDIT"];
    const DECREASE: &[&str] = &["DEBIT"];

    #[test]
    fn test_resolve_direction_ignores_case_and_whitespace() {
        assert_eq!(
            resolve_direction(EntityKind::BankAccount, " credit ", INCREASE, DECREASE).unwrap(),
            Direction::Increase
        );
        assert_eq!(
            resolve_direction(EntityKind::BankAccount, "Debit", INCREASE, DECREASE).unwrap(),
            Direction::Decrease
        );
    }

    #[test]
    fn test_resolve_direction_names_unknown_tag() {
        let err =
            resolve_direction(EntityKind::BankAccount, "REVERSAL", INCREASE, DECREASE).unwrap_err();
        match err {
            MappingError::UnknownTypeTag { entity, tag } => {
                assert_eq!(entity, EntityKind::BankAccount);
                assert_eq!(tag, "REVERSAL");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_parse_record_date_names_entity() {
        let err = parse_record_date(EntityKind::Tank, "31/12/2023").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unparseable tank transaction date '31/12/2023'"
        );
    }

    #[test]
    fn test_join_references_skips_blanks() {
        assert_eq!(
            join_references(&[Some("CHEQUE"), None, Some("  "), Some("REF-9")]),
            Some("CHEQUE / REF-9".to_string())
        );
        assert_eq!(join_references(&[None, Some("")]), None);
    }
}
