//! Configuration for the stock insight dashboard

use crate::error::{Result, StockError};
use crate::predict::MAX_HORIZON;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the Alpha Vantage API key
pub const API_KEY_ENV: &str = "ALPHA_VANTAGE_API_KEY";

/// Remote provider for daily price bars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataProvider {
    /// Alpha Vantage (requires API key)
    #[default]
    AlphaVantage,
    /// Yahoo Finance (no API key required)
    Yahoo,
}

impl DataProvider {
    /// Human readable provider name
    pub fn name(self) -> &'static str {
        match self {
            Self::AlphaVantage => "Alpha Vantage",
            Self::Yahoo => "Yahoo Finance",
        }
    }
}

/// How much history the remote provider returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputSize {
    /// Latest 100 bars
    #[default]
    Compact,
    /// Full available history
    Full,
}

impl OutputSize {
    /// Value of the `outputsize` query parameter
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Full => "full",
        }
    }

    /// Lookback range used when the provider takes a date range instead
    pub fn lookback_days(self) -> i64 {
        match self {
            // 100 trading days is a little under five calendar months
            Self::Compact => 150,
            Self::Full => 365 * 20,
        }
    }
}

/// Configuration for the dashboard pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockConfig {
    /// Remote provider to try first
    pub provider: DataProvider,

    /// Alpha Vantage API key (optional, fetches fail over to the fallback without it)
    pub alpha_vantage_api_key: Option<String>,

    /// History window requested from the remote provider
    pub output_size: OutputSize,

    /// Directory holding `<TICKER>.csv` fallback files
    pub fallback_dir: PathBuf,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Number of future days to project
    pub prediction_horizon: usize,

    /// Number of trailing rows shown in the history table
    pub history_rows: usize,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            provider: DataProvider::AlphaVantage,
            alpha_vantage_api_key: None,
            output_size: OutputSize::Compact,
            fallback_dir: PathBuf::from("mock_data"),
            request_timeout: Duration::from_secs(30),
            prediction_horizon: 5,
            history_rows: 30,
        }
    }
}

impl StockConfig {
    /// Create a new configuration builder
    pub fn builder() -> StockConfigBuilder {
        StockConfigBuilder::default()
    }

    /// Load Alpha Vantage API key from environment
    pub fn with_env_api_key(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            self.alpha_vantage_api_key = Some(key);
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.history_rows == 0 {
            return Err(StockError::ConfigError(
                "history_rows must be greater than 0".to_string(),
            ));
        }

        if self.prediction_horizon > MAX_HORIZON {
            return Err(StockError::ConfigError(format!(
                "prediction_horizon must be at most {MAX_HORIZON}"
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(StockError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self
            .alpha_vantage_api_key
            .as_deref()
            .is_some_and(|k| k.trim().is_empty())
        {
            return Err(StockError::ConfigError(
                "Alpha Vantage API key must not be blank".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for StockConfig
#[derive(Debug, Default)]
pub struct StockConfigBuilder {
    provider: Option<DataProvider>,
    alpha_vantage_api_key: Option<String>,
    output_size: Option<OutputSize>,
    fallback_dir: Option<PathBuf>,
    request_timeout: Option<Duration>,
    prediction_horizon: Option<usize>,
    history_rows: Option<usize>,
}

impl StockConfigBuilder {
    /// Set the remote data provider
    pub fn provider(mut self, provider: DataProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set Alpha Vantage API key
    pub fn alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    /// Load Alpha Vantage API key from environment, unless one was already set
    pub fn with_env_api_key(mut self) -> Self {
        if self.alpha_vantage_api_key.is_none() {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                self.alpha_vantage_api_key = Some(key);
            }
        }
        self
    }

    /// Set the remote output size
    pub fn output_size(mut self, size: OutputSize) -> Self {
        self.output_size = Some(size);
        self
    }

    /// Set the fallback directory
    pub fn fallback_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fallback_dir = Some(dir.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the number of projected days
    pub fn prediction_horizon(mut self, horizon: usize) -> Self {
        self.prediction_horizon = Some(horizon);
        self
    }

    /// Set the number of history rows displayed
    pub fn history_rows(mut self, rows: usize) -> Self {
        self.history_rows = Some(rows);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<StockConfig> {
        let defaults = StockConfig::default();

        let config = StockConfig {
            provider: self.provider.unwrap_or(defaults.provider),
            alpha_vantage_api_key: self.alpha_vantage_api_key,
            output_size: self.output_size.unwrap_or(defaults.output_size),
            fallback_dir: self.fallback_dir.unwrap_or(defaults.fallback_dir),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            prediction_horizon: self
                .prediction_horizon
                .unwrap_or(defaults.prediction_horizon),
            history_rows: self.history_rows.unwrap_or(defaults.history_rows),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StockConfig::default();
        assert_eq!(config.provider, DataProvider::AlphaVantage);
        assert_eq!(config.output_size, OutputSize::Compact);
        assert_eq!(config.prediction_horizon, 5);
        assert_eq!(config.history_rows, 30);
        assert_eq!(config.fallback_dir, PathBuf::from("mock_data"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = StockConfig::builder()
            .provider(DataProvider::Yahoo)
            .output_size(OutputSize::Full)
            .fallback_dir("/tmp/fallback")
            .prediction_horizon(10)
            .request_timeout(Duration::from_secs(60))
            .build()
            .unwrap();

        assert_eq!(config.provider, DataProvider::Yahoo);
        assert_eq!(config.output_size.as_str(), "full");
        assert_eq!(config.prediction_horizon, 10);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.fallback_dir, PathBuf::from("/tmp/fallback"));
    }

    #[test]
    fn test_validation_rejects_zero_history_rows() {
        let result = StockConfig::builder().history_rows(0).build();
        assert!(matches!(result, Err(StockError::ConfigError(_))));
    }

    #[test]
    fn test_validation_rejects_oversized_horizon() {
        assert!(StockConfig::builder().prediction_horizon(MAX_HORIZON).build().is_ok());
        let result = StockConfig::builder().prediction_horizon(100_000_000).build();
        assert!(matches!(result, Err(StockError::ConfigError(_))));
    }

    #[test]
    fn test_validation_rejects_blank_key() {
        let config = StockConfig {
            alpha_vantage_api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_provider_serde_names() {
        let json = serde_json::to_string(&DataProvider::AlphaVantage).unwrap();
        assert_eq!(json, "\"alpha_vantage\"");
    }
}
