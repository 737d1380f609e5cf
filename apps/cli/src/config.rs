use std::time::Duration;

use pumpdesk_client::{ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use pumpdesk_core::errors::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_token: Option<String>,
    pub request_timeout: Duration,
    pub prior_totals: bool,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("PUMPDESK_API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_token = lookup("PUMPDESK_API_TOKEN").filter(|token| !token.trim().is_empty());

        let timeout_ms: u64 = match lookup("PUMPDESK_REQUEST_TIMEOUT_MS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                Error::InvalidConfigValue(format!("PUMPDESK_REQUEST_TIMEOUT_MS={}", raw))
            })?,
            None => DEFAULT_TIMEOUT_SECS * 1000,
        };

        let prior_totals = match lookup("PUMPDESK_PRIOR_TOTALS") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                Error::InvalidConfigValue(format!("PUMPDESK_PRIOR_TOTALS={}", raw))
            })?,
            None => false,
        };

        let log_format = match lookup("PUMPDESK_LOG_FORMAT") {
            Some(raw) if raw.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(raw) if raw.eq_ignore_ascii_case("text") => LogFormat::Text,
            Some(raw) => {
                return Err(Error::InvalidConfigValue(format!(
                    "PUMPDESK_LOG_FORMAT={}",
                    raw
                )))
            }
            None => LogFormat::Text,
        };

        Ok(Self {
            api_url,
            api_token,
            request_timeout: Duration::from_millis(timeout_ms),
            prior_totals,
            log_format,
        })
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_url.clone(),
            access_token: self.api_token.clone(),
            timeout: self.request_timeout,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
