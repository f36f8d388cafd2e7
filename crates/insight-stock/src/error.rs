//! Error types for stock insight operations

use chrono::NaiveDate;
use thiserror::Error;

/// Stock insight specific errors
#[derive(Debug, Error)]
pub enum StockError {
    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable {
        symbol: String,
        reason: String,
    },

    /// The provider reported a throttled request
    #[error("Rate limit exceeded for {provider}")]
    RateLimitExceeded {
        provider: String,
    },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Alpha Vantage API error
    #[error("Alpha Vantage error: {0}")]
    AlphaVantageError(String),

    /// A row or field could not be turned into a price bar
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Two bars share the same trading date
    #[error("Duplicate trading date: {0}")]
    DuplicateDate(NaiveDate),

    /// Series too short for the requested computation
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        required: usize,
        actual: usize,
    },

    /// Technical indicator calculation error
    #[error("Technical indicator error: {0}")]
    IndicatorError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StockError::DataUnavailable {
            symbol: "AAPL".to_string(),
            reason: "No data found".to_string(),
        };
        assert_eq!(err.to_string(), "Data not available for AAPL: No data found");

        let err = StockError::InsufficientData {
            required: 60,
            actual: 12,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient data: need at least 60 observations, got 12"
        );
    }

    #[test]
    fn test_duplicate_date_display() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let err = StockError::DuplicateDate(date);
        assert_eq!(err.to_string(), "Duplicate trading date: 2024-03-01");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: StockError = io.into();
        assert!(matches!(err, StockError::Io(_)));
    }
}
