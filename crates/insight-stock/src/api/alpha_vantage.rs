//! Alpha Vantage API client

use crate::api::{DailySource, bar_from_fields, parse_date};
use crate::config::{OutputSize, StockConfig};
use crate::error::{Result, StockError};
use crate::loader::Provenance;
use crate::series::PriceSeries;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const DAILY_SERIES_KEY: &str = "Time Series (Daily)";

/// Alpha Vantage API client
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: Option<String>,
    output_size: OutputSize,
    base_url: String,
}

impl AlphaVantageClient {
    /// Create a new Alpha Vantage client
    ///
    /// # Arguments
    /// * `api_key` - Alpha Vantage API key; without one every fetch fails
    /// * `output_size` - history window requested from `TIME_SERIES_DAILY`
    /// * `timeout` - per-request timeout
    pub fn new(api_key: Option<String>, output_size: OutputSize, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            output_size,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Create a client from the dashboard configuration
    pub fn from_config(config: &StockConfig) -> Result<Self> {
        Self::new(
            config.alpha_vantage_api_key.clone(),
            config.output_size,
            config.request_timeout,
        )
    }

    /// Point the client at a different endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Get daily time series data
    pub async fn get_daily(&self, symbol: &str) -> Result<PriceSeries> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            StockError::ConfigError("Alpha Vantage API key not configured".to_string())
        })?;

        let params = [
            ("function", "TIME_SERIES_DAILY"),
            ("symbol", symbol),
            ("outputsize", self.output_size.as_str()),
            ("apikey", api_key),
        ];

        tracing::debug!(symbol, output_size = self.output_size.as_str(), "Requesting daily series");

        let response = self.client.get(&self.base_url).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(StockError::AlphaVantageError(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let data: serde_json::Value = response.json().await?;
        parse_daily_response(symbol, &data)
    }
}

/// Turn a `TIME_SERIES_DAILY` payload into a price series
pub fn parse_daily_response(symbol: &str, data: &serde_json::Value) -> Result<PriceSeries> {
    // Check for API error messages
    if let Some(error) = data.get("Error Message") {
        return Err(StockError::AlphaVantageError(error.to_string()));
    }

    if data.get("Note").is_some() {
        return Err(StockError::RateLimitExceeded {
            provider: "Alpha Vantage".to_string(),
        });
    }

    if let Some(info) = data.get("Information") {
        return Err(StockError::AlphaVantageError(info.to_string()));
    }

    let series = data
        .get(DAILY_SERIES_KEY)
        .and_then(serde_json::Value::as_object)
        .ok_or_else(|| StockError::AlphaVantageError("No daily data found".to_string()))?;

    let mut bars = Vec::with_capacity(series.len());
    for (timestamp, values) in series {
        let fields = values.as_object().ok_or_else(|| {
            StockError::AlphaVantageError(format!("Malformed bar for {timestamp}"))
        })?;

        let date = parse_date(timestamp)?;
        let bar = bar_from_fields(
            date,
            fields
                .iter()
                .filter_map(|(name, value)| value.as_str().map(|v| (name.as_str(), v))),
        )?;
        bars.push(bar);
    }

    PriceSeries::new(symbol, bars)
}

#[async_trait]
impl DailySource for AlphaVantageClient {
    fn provenance(&self) -> Provenance {
        Provenance::AlphaVantage
    }

    async fn fetch_daily(&self, symbol: &str) -> Result<PriceSeries> {
        self.get_daily(symbol).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> serde_json::Value {
        json!({
            "Meta Data": {
                "1. Information": "Daily Prices (open, high, low, close) and Volumes",
                "2. Symbol": "IBM",
                "3. Last Refreshed": "2024-05-03",
                "4. Output Size": "Compact",
                "5. Time Zone": "US/Eastern"
            },
            "Time Series (Daily)": {
                "2024-05-03": {
                    "1. open": "166.0000",
                    "2. high": "166.6500",
                    "3. low": "164.9500",
                    "4. close": "165.7100",
                    "5. volume": "4163287"
                },
                "2024-05-01": {
                    "1. open": "165.6900",
                    "2. high": "166.2700",
                    "3. low": "164.3000",
                    "4. close": "164.4300",
                    "5. volume": "4031215"
                },
                "2024-05-02": {
                    "1. open": "164.8700",
                    "2. high": "166.0000",
                    "3. low": "164.0000",
                    "4. close": "165.5300",
                    "5. volume": "3800000"
                }
            }
        })
    }

    #[test]
    fn test_client_creation() {
        let client =
            AlphaVantageClient::new(Some("test_key".to_string()), OutputSize::Compact, Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.api_key.as_deref(), Some("test_key"));
        assert_eq!(client.provenance(), Provenance::AlphaVantage);
    }

    #[test]
    fn test_parse_daily_sorts_ascending() {
        let series = parse_daily_response("IBM", &sample_payload()).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.first().date.to_string(), "2024-05-01");
        assert_eq!(series.last().date.to_string(), "2024-05-03");
        assert_eq!(series.last().close, 165.71);
        assert_eq!(series.last().volume, 4_163_287);
    }

    #[test]
    fn test_parse_error_message() {
        let payload = json!({"Error Message": "Invalid API call."});
        let err = parse_daily_response("ZZZZ", &payload).unwrap_err();
        assert!(matches!(err, StockError::AlphaVantageError(_)));
    }

    #[test]
    fn test_parse_rate_limit_note() {
        let payload = json!({"Note": "Thank you for using Alpha Vantage!"});
        let err = parse_daily_response("IBM", &payload).unwrap_err();
        assert!(matches!(err, StockError::RateLimitExceeded { .. }));
    }

    #[test]
    fn test_parse_empty_series_is_failure() {
        let payload = json!({"Time Series (Daily)": {}});
        let err = parse_daily_response("IBM", &payload).unwrap_err();
        assert!(matches!(err, StockError::DataUnavailable { .. }));
    }

    #[test]
    fn test_parse_missing_series() {
        let payload = json!({"Meta Data": {}});
        assert!(parse_daily_response("IBM", &payload).is_err());
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let client = AlphaVantageClient::new(None, OutputSize::Compact, Duration::from_secs(5))
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let err = client.get_daily("AAPL").await.unwrap_err();
        assert!(matches!(err, StockError::ConfigError(_)));
    }

    #[tokio::test]
    #[ignore] // Requires API key and network access
    async fn test_get_daily() {
        let config = StockConfig::default().with_env_api_key();
        let client = AlphaVantageClient::from_config(&config).unwrap();
        let data = client.get_daily("AAPL").await;
        assert!(data.is_ok());
        assert!(!data.unwrap().is_empty());
    }
}
