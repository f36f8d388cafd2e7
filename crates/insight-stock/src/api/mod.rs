//! Remote daily price sources

pub mod alpha_vantage;
pub mod yahoo;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::{Result, StockError};
use crate::loader::Provenance;
use crate::series::{PriceBar, PriceSeries};

pub use alpha_vantage::AlphaVantageClient;
pub use yahoo::YahooFinanceClient;

/// A provider of recent daily OHLCV bars for a symbol.
///
/// Any error returned here is treated by the loader as a failed fetch.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DailySource: Send + Sync {
    /// Tag attached to series produced by this source
    fn provenance(&self) -> Provenance;

    /// Fetch the daily series for an upper-cased symbol
    async fn fetch_daily(&self, symbol: &str) -> Result<PriceSeries>;
}

/// Canonical OHLCV columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Open,
        Column::High,
        Column::Low,
        Column::Close,
        Column::Volume,
    ];

    /// Canonical header name
    pub fn name(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::High => "High",
            Self::Low => "Low",
            Self::Close => "Close",
            Self::Volume => "Volume",
        }
    }

    /// Map a provider or file header onto the canonical schema.
    ///
    /// Accepts the numbered Alpha Vantage form (`"4. close"`) as well as plain
    /// names in any case.
    pub fn from_header(header: &str) -> Option<Self> {
        let trimmed = header.trim();
        let name = match trimmed.split_once(". ") {
            Some((prefix, rest)) if prefix.chars().all(|c| c.is_ascii_digit()) => rest,
            _ => trimmed,
        };

        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Assemble a bar from `(header, value)` pairs.
///
/// Unknown headers are ignored; every canonical column must be present and
/// parse as a number.
pub fn bar_from_fields<'a, I>(date: NaiveDate, fields: I) -> Result<PriceBar>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut values: [Option<&str>; 5] = [None; 5];
    for (header, value) in fields {
        if let Some(column) = Column::from_header(header) {
            values[column as usize] = Some(value.trim());
        }
    }

    let price = |column: Column| -> Result<f64> {
        let raw = values[column as usize].ok_or_else(|| {
            StockError::InvalidData(format!("missing {} on {date}", column.name()))
        })?;
        raw.parse::<f64>().map_err(|_| {
            StockError::InvalidData(format!("bad {} value {raw:?} on {date}", column.name()))
        })
    };

    let volume = price(Column::Volume)?;
    if !volume.is_finite() || volume < 0.0 {
        return Err(StockError::InvalidData(format!(
            "bad Volume value {volume} on {date}"
        )));
    }

    Ok(PriceBar::new(
        date,
        price(Column::Open)?,
        price(Column::High)?,
        price(Column::Low)?,
        price(Column::Close)?,
        volume.round() as u64,
    ))
}

/// Parse the `YYYY-MM-DD` date part of a date or timestamp string.
///
/// Anything after a space or `T` is ignored; month and day may be unpadded.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    let day = raw
        .split(|c: char| c.is_whitespace() || c == 'T')
        .next()
        .unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| StockError::InvalidData(format!("bad date {raw:?}: {e}")))
}
