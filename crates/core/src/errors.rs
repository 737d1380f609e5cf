//! Core error types for the pumpdesk ledger.
//!
//! This module defines transport-agnostic error types. HTTP-specific errors
//! (from reqwest) are converted to these types by the client crate.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::ledger::EntityKind;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for ledger report generation.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Mapping failed: {0}")]
    Mapping(#[from] MappingError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Message shown to the user when a report request fails.
    ///
    /// All failures collapse into a single string at the store boundary, so
    /// the prefix is what tells the user which stage went wrong.
    pub fn user_message(&self) -> String {
        match self {
            Error::Fetch(e) => format!("Failed to load ledger: {}", e),
            Error::Mapping(e) => format!("Ledger data could not be interpreted: {}", e),
            Error::Validation(e) => format!("Ledger data is invalid: {}", e),
            other => other.to_string(),
        }
    }
}

/// Failures retrieving balances or transactions from the backend.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request never produced a response (connection, timeout, TLS).
    #[error("Request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Failures converting backend records into ledger entries.
#[derive(Error, Debug)]
pub enum MappingError {
    #[error("Unrecognized {entity} transaction type '{tag}'")]
    UnknownTypeTag { entity: EntityKind, tag: String },

    #[error("Unparseable {entity} transaction date '{value}'")]
    InvalidDate { entity: EntityKind, value: String },

    #[error("Unparseable amount '{0}'")]
    InvalidAmount(String),
}

/// Precondition violations detected before or during computation.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Negative amount {amount} on entry dated {date}")]
    NegativeAmount { amount: Decimal, date: String },

    #[error("Date range is inverted: {from} is after {to}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },

    #[error(
        "Balance before range {balance_before_range} does not match opening balance {opening_balance} plus prior net movement {prior_net}"
    )]
    Unreconciled {
        opening_balance: Decimal,
        prior_net: Decimal,
        balance_before_range: Decimal,
    },

    #[error("Decimal overflow computing {0}")]
    Overflow(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Fetch(FetchError::Decode(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefixes_stage() {
        let err = Error::from(MappingError::UnknownTypeTag {
            entity: EntityKind::BankAccount,
            tag: "REFUND".to_string(),
        });
        assert_eq!(
            err.user_message(),
            "Ledger data could not be interpreted: Unrecognized bank account transaction type 'REFUND'"
        );

        let err = Error::from(FetchError::Status {
            status: 503,
            message: "maintenance".to_string(),
        });
        assert_eq!(
            err.user_message(),
            "Failed to load ledger: Backend returned 503: maintenance"
        );
    }

    #[test]
    fn test_user_message_passes_through_other_errors() {
        let err = Error::Unexpected("boom".to_string());
        assert_eq!(err.user_message(), "Unexpected error: boom");
    }
}
