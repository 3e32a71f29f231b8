/**
* filename : error
* author : HAMA
* date: 2025. 5. 8.
* description: 저널 공통 에러 타입
**/

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Trade not found: {0}")]
    TradeNotFound(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Market data provider error: {0}")]
    ProviderError(String),

    #[error("Lock error")]
    LockError,
}

impl From<config::ConfigError> for JournalError {
    fn from(err: config::ConfigError) -> Self {
        JournalError::ConfigError(err.to_string())
    }
}

impl From<reqwest::Error> for JournalError {
    fn from(err: reqwest::Error) -> Self {
        JournalError::ProviderError(err.to_string())
    }
}
