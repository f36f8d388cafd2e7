//! Yahoo Finance API client

use crate::api::DailySource;
use crate::config::{OutputSize, StockConfig};
use crate::error::{Result, StockError};
use crate::loader::Provenance;
use crate::series::{PriceBar, PriceSeries};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

/// Yahoo Finance API client
#[derive(Debug, Clone, Default)]
pub struct YahooFinanceClient {
    output_size: OutputSize,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new(output_size: OutputSize) -> Self {
        Self { output_size }
    }

    pub fn from_config(config: &StockConfig) -> Self {
        Self::new(config.output_size)
    }

    /// Get daily bars between two instants
    pub async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| StockError::YahooFinanceError(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| StockError::YahooFinanceError(format!("Invalid end timestamp: {e}")))?;

        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        let bars = quotes
            .iter()
            .map(|q| {
                let timestamp = DateTime::from_timestamp(q.timestamp as i64, 0).ok_or_else(|| {
                    StockError::YahooFinanceError(format!("Invalid quote timestamp {}", q.timestamp))
                })?;
                Ok(PriceBar::new(
                    timestamp.date_naive(),
                    q.open,
                    q.high,
                    q.low,
                    q.close,
                    q.volume,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        PriceSeries::new(symbol, bars)
    }

    /// Get the recent daily window implied by the configured output size
    pub async fn get_daily(&self, symbol: &str) -> Result<PriceSeries> {
        let end = Utc::now();
        let start = end - chrono::Duration::days(self.output_size.lookback_days());
        self.get_historical_quotes(symbol, start, end).await
    }
}

#[async_trait]
impl DailySource for YahooFinanceClient {
    fn provenance(&self) -> Provenance {
        Provenance::Yahoo
    }

    async fn fetch_daily(&self, symbol: &str) -> Result<PriceSeries> {
        self.get_daily(symbol).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provenance() {
        let client = YahooFinanceClient::new(OutputSize::Compact);
        assert_eq!(client.provenance(), Provenance::Yahoo);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_get_daily() {
        let client = YahooFinanceClient::default();
        let series = client.get_daily("AAPL").await.unwrap();
        assert!(series.len() > 60);
        assert_eq!(series.symbol(), "AAPL");
    }
}
