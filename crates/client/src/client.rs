//! HTTP client for the pumpdesk backend API.
//!
//! This module provides the REST implementation of `TransactionSourceTrait`.
//! One client serves every entity kind; the record type picks the endpoint.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use pumpdesk_core::errors::{Error, FetchError, Result};
use pumpdesk_core::utils::serde_utils::decimal_from_value;
use pumpdesk_core::utils::time_utils::format_query_date;
use pumpdesk_core::{EntityKind, LedgerRecord, TransactionSourceTrait};

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default base URL for a locally running backend.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Longest slice of an unparseable error body echoed back in messages.
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

// ─────────────────────────────────────────────────────────────────────────────
// API Response Types (internal, for parsing backend responses)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, serde::Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Connection settings for [`LedgerApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub access_token: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            access_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ledger API Client
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP client for the backend's ledger endpoints.
///
/// # Example
///
/// ```ignore
/// let client = LedgerApiClient::new(&ClientConfig::default())?;
/// let store = BankAccountLedgerStore::new(Arc::new(client), LedgerStoreOptions::default());
/// ```
#[derive(Debug, Clone)]
pub struct LedgerApiClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: Option<HeaderValue>,
}

impl LedgerApiClient {
    /// Create a new ledger API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the access token is not a valid header value or the
    /// HTTP client cannot be initialized.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let auth_header = config
            .access_token
            .as_deref()
            .map(|token| {
                HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                    Error::InvalidConfigValue(format!("Invalid access token format: {}", e))
                })
            })
            .transpose()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_header,
        })
    }

    /// Create default headers for API requests.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(auth) = &self.auth_header {
            headers.insert(AUTHORIZATION, auth.clone());
        }
        headers
    }

    /// URL of an entity endpoint, e.g. `{base}/tanks/7/transactions`.
    fn entity_url(&self, kind: EntityKind, entity_id: &str, suffix: &str) -> String {
        format!(
            "{}/{}/{}{}",
            self.base_url,
            kind.path_segment(),
            urlencoding::encode(entity_id),
            suffix
        )
    }

    /// Make a GET request and parse the response.
    async fn get<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        debug!("[LedgerApi] GET {} {:?}", url, query);

        let response = self
            .client
            .get(url)
            .headers(self.headers())
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        self.parse_response(response).await
    }

    /// Parse an HTTP response, handling errors appropriately.
    async fn parse_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Request(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: error_message(status, &body),
            }
            .into());
        }

        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()).into())
    }
}

/// Best human-readable message for a failed response.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(err) = serde_json::from_str::<ApiErrorResponse>(body) {
        if let Some(msg) = err.message.or(err.error) {
            return msg;
        }
    }

    let preview: String = body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();
    if preview.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        preview
    }
}

/// Reads a balance from a bare number, a numeric string, or an object
/// carrying it under `field` (falling back to `balance`).
fn balance_from_value(value: &Value, field: &str) -> Result<Decimal> {
    let raw = match value {
        Value::Object(map) => map
            .get(field)
            .or_else(|| map.get("balance"))
            .ok_or_else(|| FetchError::Decode(format!("response has no '{}' field", field)))?,
        other => other,
    };

    decimal_from_value(raw).map_err(|e| FetchError::Decode(e.to_string()).into())
}

// ─────────────────────────────────────────────────────────────────────────────
// TransactionSourceTrait Implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl<R: LedgerRecord> TransactionSourceTrait<R> for LedgerApiClient {
    /// Reads `openingBalance` from the entity itself.
    async fn opening_balance(&self, entity_id: &str) -> Result<Decimal> {
        let url = self.entity_url(R::KIND, entity_id, "");
        let entity: Value = self.get(&url, &[]).await?;
        balance_from_value(&entity, "openingBalance")
    }

    async fn balance_as_of(&self, entity_id: &str, as_of: NaiveDate) -> Result<Decimal> {
        let url = self.entity_url(R::KIND, entity_id, "/opening-balance");
        let body: Value = self
            .get(&url, &[("asOfDate", format_query_date(as_of))])
            .await?;
        balance_from_value(&body, "openingBalance")
    }

    async fn transactions(
        &self,
        entity_id: &str,
        from: Option<NaiveDate>,
        to: NaiveDate,
    ) -> Result<Vec<R>> {
        let url = self.entity_url(R::KIND, entity_id, "/transactions");
        let mut query = Vec::with_capacity(2);
        if let Some(from) = from {
            query.push(("fromDate", format_query_date(from)));
        }
        query.push(("toDate", format_query_date(to)));

        let records: Vec<R> = self.get(&url, &query).await?;
        debug!(
            "[LedgerApi] Fetched {} {} transactions for {}",
            records.len(),
            R::KIND,
            entity_id
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn client(base_url: &str) -> LedgerApiClient {
        LedgerApiClient::new(&ClientConfig {
            base_url: base_url.to_string(),
            ..ClientConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_client_creation() {
        let config = ClientConfig {
            access_token: Some("test-token".to_string()),
            ..ClientConfig::default()
        };
        let client = LedgerApiClient::new(&config).unwrap();
        let headers = client.headers();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer test-token");
    }

    #[test]
    fn test_client_without_token_sends_no_auth_header() {
        let client = client(DEFAULT_API_URL);
        assert!(client.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_invalid_token_is_rejected() {
        let config = ClientConfig {
            access_token: Some("bad\ntoken".to_string()),
            ..ClientConfig::default()
        };
        assert!(matches!(
            LedgerApiClient::new(&config),
            Err(Error::InvalidConfigValue(_))
        ));
    }

    #[test]
    fn test_client_url_normalization() {
        let client = client("https://pumps.example.com/api//");
        assert_eq!(client.base_url, "https://pumps.example.com/api");
    }

    #[test]
    fn test_entity_urls() {
        let client = client("https://pumps.example.com/api");
        assert_eq!(
            client.entity_url(EntityKind::Tank, "7", "/transactions"),
            "https://pumps.example.com/api/tanks/7/transactions"
        );
        assert_eq!(
            client.entity_url(EntityKind::BankAccount, "12", "/opening-balance"),
            "https://pumps.example.com/api/bank-accounts/12/opening-balance"
        );
        assert_eq!(
            client.entity_url(EntityKind::Supplier, "a b", ""),
            "https://pumps.example.com/api/suppliers/a%20b"
        );
    }

    #[test]
    fn test_balance_from_value_shapes() {
        assert_eq!(balance_from_value(&json!(1250.5), "openingBalance").unwrap(), dec!(1250.5));
        assert_eq!(balance_from_value(&json!("-80.10"), "openingBalance").unwrap(), dec!(-80.10));
        assert_eq!(
            balance_from_value(&json!({"id": 3, "openingBalance": 900}), "openingBalance").unwrap(),
            dec!(900)
        );
        assert_eq!(
            balance_from_value(&json!({"balance": "42"}), "openingBalance").unwrap(),
            dec!(42)
        );
    }

    #[test]
    fn test_balance_from_value_rejects_missing_field() {
        let err = balance_from_value(&json!({"name": "Main tank"}), "openingBalance").unwrap_err();
        assert!(matches!(err, Error::Fetch(FetchError::Decode(_))));

        let err = balance_from_value(&json!(true), "openingBalance").unwrap_err();
        assert!(matches!(err, Error::Fetch(FetchError::Decode(_))));
    }

    #[test]
    fn test_error_message_prefers_backend_message() {
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, r#"{"message":"Tank 9 not found"}"#),
            "Tank 9 not found"
        );
        assert_eq!(
            error_message(StatusCode::UNAUTHORIZED, r#"{"error":"token expired"}"#),
            "token expired"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_body_or_reason() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>"),
            "<html>bad gateway</html>"
        );
        assert_eq!(error_message(StatusCode::SERVICE_UNAVAILABLE, ""), "Service Unavailable");

        let long_body = "x".repeat(500);
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, &long_body).len(),
            ERROR_BODY_PREVIEW_CHARS
        );
    }
}
