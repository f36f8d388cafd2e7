//! Daily OHLCV price series

use crate::error::{Result, StockError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of price data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Whether the bar closed at or above its open
    pub fn is_increasing(&self) -> bool {
        self.close >= self.open
    }
}

/// Price bars ordered by strictly increasing trading date.
///
/// Once built the series is never mutated; every downstream computation
/// borrows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series from bars in any order.
    ///
    /// Bars are sorted by date. Duplicate dates and an empty input are rejected.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<PriceBar>) -> Result<Self> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(StockError::DataUnavailable {
                symbol,
                reason: "empty price series".to_string(),
            });
        }

        bars.sort_by_key(|b| b.date);
        if let Some(pair) = bars.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(StockError::DuplicateDate(pair[1].date));
        }

        for bar in &bars {
            let fields = [bar.open, bar.high, bar.low, bar.close];
            if fields.iter().any(|v| !v.is_finite()) {
                return Err(StockError::InvalidData(format!(
                    "non-finite price on {}",
                    bar.date
                )));
            }
        }

        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false: construction rejects empty input
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Closing prices in date order
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn first(&self) -> &PriceBar {
        &self.bars[0]
    }

    pub fn last(&self) -> &PriceBar {
        &self.bars[self.bars.len() - 1]
    }

    /// The trailing `n` bars (all of them if the series is shorter)
    pub fn tail(&self, n: usize) -> &[PriceBar] {
        &self.bars[self.bars.len().saturating_sub(n)..]
    }

    /// Lowest low across the series
    pub fn min_low(&self) -> f64 {
        self.bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min)
    }

    /// Highest high across the series
    pub fn max_high(&self) -> f64 {
        self.bars
            .iter()
            .map(|b| b.high)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Build a series whose closes are produced by `close_at(index)`.
    ///
    /// Dates are consecutive calendar days starting 2024-01-01.
    pub fn series_from_fn(len: usize, close_at: impl Fn(usize) -> f64) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = (0..len)
            .map(|i| {
                let close = close_at(i);
                let date = start + chrono::Duration::days(i as i64);
                PriceBar::new(date, close, close + 1.0, close - 1.0, close, 1_000 + i as u64)
            })
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> PriceBar {
        let date = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        PriceBar::new(date, close, close + 1.0, close - 1.0, close, 100)
    }

    #[test]
    fn test_series_sorted_on_construction() {
        let series = PriceSeries::new("AAPL", vec![bar(3, 3.0), bar(1, 1.0), bar(2, 2.0)]).unwrap();
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.first().date.to_string(), "2024-01-01");
        assert_eq!(series.last().date.to_string(), "2024-01-03");
    }

    #[test]
    fn test_duplicate_dates_rejected() {
        let result = PriceSeries::new("AAPL", vec![bar(1, 1.0), bar(2, 2.0), bar(1, 1.5)]);
        assert!(matches!(result, Err(StockError::DuplicateDate(_))));
    }

    #[test]
    fn test_empty_series_rejected() {
        let result = PriceSeries::new("AAPL", Vec::new());
        assert!(matches!(result, Err(StockError::DataUnavailable { .. })));
    }

    #[test]
    fn test_non_finite_price_rejected() {
        let result = PriceSeries::new("AAPL", vec![bar(1, f64::NAN)]);
        assert!(matches!(result, Err(StockError::InvalidData(_))));
    }

    #[test]
    fn test_tail_and_extremes() {
        let series = PriceSeries::new("AAPL", (1..=10).map(|d| bar(d, f64::from(d))).collect())
            .unwrap();
        assert_eq!(series.tail(3).len(), 3);
        assert_eq!(series.tail(3)[0].close, 8.0);
        assert_eq!(series.tail(50).len(), 10);
        assert_eq!(series.min_low(), 0.0);
        assert_eq!(series.max_high(), 11.0);
    }

    #[test]
    fn test_bar_direction() {
        let mut b = bar(1, 10.0);
        assert!(b.is_increasing());
        b.open = 11.0;
        assert!(!b.is_increasing());
    }
}
