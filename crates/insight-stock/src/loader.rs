//! Remote fetch with local CSV fallback

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::api::{AlphaVantageClient, DailySource, YahooFinanceClient};
use crate::config::{DataProvider, StockConfig};
use crate::error::Result;
use crate::fallback;
use crate::series::PriceSeries;

/// Where a loaded series came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    AlphaVantage,
    Yahoo,
    Csv,
}

impl Provenance {
    pub fn is_live(self) -> bool {
        !matches!(self, Self::Csv)
    }

    /// Short label shown next to the chart heading
    pub fn label(self) -> &'static str {
        if self.is_live() { "Live" } else { "Cached" }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AlphaVantage => "alpha_vantage",
            Self::Yahoo => "yahoo",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one load attempt, returned by value.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The remote provider answered
    Remote {
        series: PriceSeries,
        provenance: Provenance,
    },
    /// The remote fetch failed and the fallback file was used
    Fallback {
        series: PriceSeries,
        remote_error: String,
    },
    /// Neither source produced data
    Unavailable {
        remote_error: String,
        fallback_error: String,
    },
}

impl LoadOutcome {
    pub fn series(&self) -> Option<&PriceSeries> {
        match self {
            Self::Remote { series, .. } | Self::Fallback { series, .. } => Some(series),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn provenance(&self) -> Option<Provenance> {
        match self {
            Self::Remote { provenance, .. } => Some(*provenance),
            Self::Fallback { .. } => Some(Provenance::Csv),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable { .. })
    }

    /// `(series, provenance)`, both `None` when nothing could be loaded
    pub fn into_parts(self) -> (Option<PriceSeries>, Option<Provenance>) {
        match self {
            Self::Remote { series, provenance } => (Some(series), Some(provenance)),
            Self::Fallback { series, .. } => (Some(series), Some(Provenance::Csv)),
            Self::Unavailable { .. } => (None, None),
        }
    }
}

/// Loads a daily series, trying the remote source before the fallback directory.
///
/// Calls are independent: no retry, caching or throttling.
pub struct DataLoader {
    remote: Box<dyn DailySource>,
    fallback_dir: PathBuf,
}

impl DataLoader {
    pub fn new(remote: Box<dyn DailySource>, fallback_dir: impl Into<PathBuf>) -> Self {
        Self {
            remote,
            fallback_dir: fallback_dir.into(),
        }
    }

    /// Build a loader with the remote provider named in the configuration
    pub fn from_config(config: &StockConfig) -> Result<Self> {
        let remote: Box<dyn DailySource> = match config.provider {
            DataProvider::AlphaVantage => Box::new(AlphaVantageClient::from_config(config)?),
            DataProvider::Yahoo => Box::new(YahooFinanceClient::from_config(config)),
        };
        Ok(Self::new(remote, config.fallback_dir.clone()))
    }

    pub fn fallback_path(&self, ticker: &str) -> PathBuf {
        self.fallback_dir.join(format!("{ticker}.csv"))
    }

    /// Load the series for an already normalised ticker
    pub async fn load(&self, ticker: &str) -> LoadOutcome {
        let remote_error = match self.remote.fetch_daily(ticker).await {
            Ok(series) => {
                let provenance = self.remote.provenance();
                tracing::info!(ticker, %provenance, bars = series.len(), "Loaded remote series");
                return LoadOutcome::Remote { series, provenance };
            }
            Err(e) => e.to_string(),
        };

        tracing::warn!(ticker, error = %remote_error, "Remote fetch failed, switching to fallback CSV");

        let path = self.fallback_path(ticker);
        match fallback::read_csv_file(ticker, &path) {
            Ok(series) => {
                tracing::info!(ticker, path = %path.display(), bars = series.len(), "Loaded fallback series");
                LoadOutcome::Fallback {
                    series,
                    remote_error,
                }
            }
            Err(e) => {
                let fallback_error = format!("{}: {e}", path.display());
                tracing::error!(ticker, error = %fallback_error, "No local CSV data available either");
                LoadOutcome::Unavailable {
                    remote_error,
                    fallback_error,
                }
            }
        }
    }
}
