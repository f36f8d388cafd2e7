//! Dashboard engine: one ticker submission from input to report

use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::chart::{CandlestickChart, PredictionChart};
use crate::config::StockConfig;
use crate::error::{Result, StockError};
use crate::indicators::moving_average;
use crate::loader::{DataLoader, LoadOutcome, Provenance};
use crate::predict::predict;
use crate::report::{DashboardReport, HistoryRow, TrendSection};
use crate::series::PriceSeries;
use crate::trend::{self, LONG_WINDOW, SHORT_WINDOW};

/// What a submission produced
#[derive(Debug)]
pub enum DashboardOutcome {
    /// Blank input, nothing was done
    Empty,
    /// Neither the remote source nor the fallback file had data
    Unavailable {
        ticker: String,
        /// Remote failure notice, shown before the final error
        fallback_warning: String,
        reason: String,
    },
    Ready(Box<DashboardReport>),
}

/// Trim and upper-case a raw ticker; `None` for blank input
pub fn normalize_ticker(input: &str) -> Option<String> {
    let ticker = input.trim();
    (!ticker.is_empty()).then(|| ticker.to_uppercase())
}

/// Runs the load → chart/analyze/predict pipeline for each submission
pub struct Dashboard {
    loader: DataLoader,
    config: StockConfig,
}

impl Dashboard {
    pub fn new(loader: DataLoader, config: StockConfig) -> Self {
        Self { loader, config }
    }

    pub fn from_config(config: StockConfig) -> Result<Self> {
        let loader = DataLoader::from_config(&config)?;
        Ok(Self::new(loader, config))
    }

    pub fn config(&self) -> &StockConfig {
        &self.config
    }

    /// Process one raw input line
    pub async fn run(&self, input: &str) -> Result<DashboardOutcome> {
        let Some(ticker) = normalize_ticker(input) else {
            return Ok(DashboardOutcome::Empty);
        };

        let outcome = self.loader.load(&ticker).await;
        let fallback_warning = match &outcome {
            LoadOutcome::Remote { .. } => None,
            LoadOutcome::Fallback { remote_error, .. } => Some(self.fallback_warning(remote_error)),
            LoadOutcome::Unavailable {
                remote_error,
                fallback_error,
            } => {
                return Ok(DashboardOutcome::Unavailable {
                    fallback_warning: self.fallback_warning(remote_error),
                    ticker,
                    reason: fallback_error.clone(),
                });
            }
        };

        let (Some(series), Some(provenance)) = outcome.into_parts() else {
            return Err(StockError::Other("loaded outcome without data".to_string()));
        };

        let report = self.build_report(&ticker, &series, provenance, fallback_warning)?;
        Ok(DashboardOutcome::Ready(Box::new(report)))
    }

    fn fallback_warning(&self, remote_error: &str) -> String {
        format!(
            "Could not load data from {} ({remote_error}). Switching to fallback CSV data.",
            self.config.provider.name()
        )
    }

    fn build_report(
        &self,
        ticker: &str,
        series: &PriceSeries,
        provenance: Provenance,
        fallback_warning: Option<String>,
    ) -> Result<DashboardReport> {
        let chart = CandlestickChart::build(series, ticker)?;

        let trend = match trend::analyze(series) {
            Ok(analysis) => TrendSection::Analyzed(analysis),
            Err(e @ StockError::InsufficientData { .. }) => {
                tracing::warn!(ticker, error = %e, "Skipping trend analysis");
                TrendSection::Skipped {
                    reason: e.to_string(),
                }
            }
            Err(e) => return Err(e),
        };

        let predictions = predict(series, self.config.prediction_horizon)?;
        let prediction_chart = PredictionChart::build(&predictions, ticker);

        Ok(DashboardReport {
            ticker: ticker.to_string(),
            provenance,
            fallback_warning,
            trend,
            history: history_rows(series, self.config.history_rows)?,
            predictions,
            chart,
            prediction_chart,
            generated_at: Utc::now(),
        })
    }
}

/// Trailing rows with the moving averages computed over the full series
fn history_rows(series: &PriceSeries, rows: usize) -> Result<Vec<HistoryRow>> {
    let closes = series.closes();
    let ma_short = moving_average(&closes, SHORT_WINDOW)?;
    let ma_long = moving_average(&closes, LONG_WINDOW)?;
    let start = series.len().saturating_sub(rows);

    Ok(series.bars()[start..]
        .iter()
        .enumerate()
        .map(|(offset, bar)| HistoryRow {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            ma_20: ma_short[start + offset],
            ma_50: ma_long[start + offset],
        })
        .collect())
}

/// Write both charts of a report into `dir`, returning the written paths
pub fn write_charts(report: &DashboardReport, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let candles = dir.join(format!("{}_candlestick.svg", report.ticker));
    let projection = dir.join(format!("{}_prediction.svg", report.ticker));
    report.chart.write_svg(&candles)?;
    report.prediction_chart.write_svg(&projection)?;
    Ok(vec![candles, projection])
}
