//! Local CSV fallback files
//!
//! A fallback file is named `<TICKER>.csv`. The first column is the date index
//! and the remaining columns follow the OHLCV schema (plain or numbered
//! Alpha Vantage headers). Extra columns are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::api::{bar_from_fields, parse_date};
use crate::error::{Result, StockError};
use crate::series::PriceSeries;

/// Read a fallback file from disk
pub fn read_csv_file(symbol: &str, path: &Path) -> Result<PriceSeries> {
    let file = File::open(path)?;
    tracing::debug!(path = %path.display(), "Reading fallback CSV");
    read_csv(symbol, file)
}

/// Parse fallback CSV content from any reader
pub fn read_csv<R: Read>(symbol: &str, reader: R) -> Result<PriceSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.len() < 2 {
        return Err(StockError::InvalidData(
            "fallback CSV needs a date column and OHLCV columns".to_string(),
        ));
    }

    let mut bars = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        // +2: header is line 1 and records are 1-based
        let line = idx + 2;

        let date_field = record.get(0).unwrap_or_default();
        if date_field.is_empty() {
            continue;
        }

        let date = parse_date(date_field)
            .map_err(|e| StockError::InvalidData(format!("line {line}: {e}")))?;
        let fields = headers.iter().zip(record.iter()).skip(1);
        let bar = bar_from_fields(date, fields)
            .map_err(|e| StockError::InvalidData(format!("line {line}: {e}")))?;
        bars.push(bar);
    }

    PriceSeries::new(symbol, bars)
}
