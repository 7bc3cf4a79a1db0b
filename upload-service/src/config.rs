use std::time::Duration;

use shared::crypto::{AccountKey, CryptoError};
use shared::observability::{LogConfig, LogFormat, LogLevel};
use thiserror::Error;

/// Blob container every upload grant is scoped to
pub const CONTAINER_NAME: &str = "event-photos";

/// Queue receiving references to uploaded photos
pub const QUEUE_NAME: &str = "photo-processing";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("invalid storage account key: {0}")]
    AccountKey(#[from] CryptoError),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub logging: LogConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub account_name: String,
    pub account_key: AccountKey,
    pub blob_endpoint: String,
    pub queue_endpoint: String,
    pub queue_request_timeout: Duration,
}

impl Config {
    /// Build the configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &'static str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));

        let account_name = required("AZURE_STORAGE_ACCOUNT_NAME")?;
        let account_key = AccountKey::from_base64(&required("AZURE_STORAGE_ACCOUNT_KEY")?)?;

        let blob_endpoint = var("AZURE_STORAGE_BLOB_ENDPOINT")
            .unwrap_or_else(|| format!("https://{}.blob.core.windows.net", account_name));
        let queue_endpoint = var("AZURE_STORAGE_QUEUE_ENDPOINT")
            .unwrap_or_else(|| format!("https://{}.queue.core.windows.net", account_name));

        let port = parse_or("SERVER_PORT", var("SERVER_PORT"), 5000u16)?;
        let timeout_secs = parse_or(
            "QUEUE_REQUEST_TIMEOUT_SECS",
            var("QUEUE_REQUEST_TIMEOUT_SECS"),
            30u64,
        )?;

        let format = match var("LOG_FORMAT") {
            Some(raw) => raw.parse::<LogFormat>().map_err(|e| ConfigError::Invalid {
                name: "LOG_FORMAT",
                reason: e.to_string(),
            })?,
            None => LogFormat::Compact,
        };

        let level = match var("LOG_LEVEL") {
            Some(raw) => raw.parse::<LogLevel>().map_err(|e| ConfigError::Invalid {
                name: "LOG_LEVEL",
                reason: e.to_string(),
            })?,
            None => LogLevel::Info,
        };

        Ok(Self {
            server: ServerConfig {
                host: var("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port,
            },
            storage: StorageConfig {
                account_name,
                account_key,
                blob_endpoint: blob_endpoint.trim_end_matches('/').to_string(),
                queue_endpoint: queue_endpoint.trim_end_matches('/').to_string(),
                queue_request_timeout: Duration::from_secs(timeout_secs),
            },
            logging: LogConfig {
                level,
                format,
                service_name: env!("CARGO_PKG_NAME").to_string(),
                include_line_numbers: true,
                include_thread_ids: false,
            },
        })
    }
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
