//! Stock insight dashboard core
//!
//! This crate turns a ticker symbol into a small daily dashboard:
//!
//! - Data loading from a remote provider (Alpha Vantage or Yahoo Finance) with
//!   a local `<TICKER>.csv` fallback
//! - 20/50-period moving averages and a three-way trend verdict
//! - An ordinary least-squares projection of the next closes
//! - Candlestick and projection charts (JSON payload or standalone SVG)
//! - Text and JSON report formatting
//!
//! # Architecture
//!
//! Every submission runs the same straight line: [`DataLoader::load`] returns a
//! [`LoadOutcome`] by value; when data is available the [`Dashboard`] builds the
//! chart, the [`trend::analyze`] verdict and the [`predict::predict`] projection,
//! and hands a [`DashboardReport`] to a [`Formatter`]. Nothing is kept between
//! submissions.
//!
//! # Example
//!
//! ```rust,ignore
//! use insight_stock::{Dashboard, DashboardOutcome, StockConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = StockConfig::builder().with_env_api_key().build()?;
//!     let dashboard = Dashboard::from_config(config)?;
//!
//!     if let DashboardOutcome::Ready(report) = dashboard.run("aapl").await? {
//!         println!("{}", report.recommendation());
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fallback;
pub mod indicators;
pub mod loader;
pub mod predict;
pub mod report;
pub mod series;
pub mod trend;

// Re-export main types for convenience
pub use chart::{CandlestickChart, ChartStyle, PredictionChart};
pub use config::{DataProvider, OutputSize, StockConfig};
pub use dashboard::{Dashboard, DashboardOutcome, normalize_ticker, write_charts};
pub use error::{Result, StockError};
pub use loader::{DataLoader, LoadOutcome, Provenance};
pub use predict::{LinearFit, PredictionPoint};
pub use report::{DashboardReport, Formatter, FormatterFactory, OutputFormat};
pub use series::{PriceBar, PriceSeries};
pub use trend::{TrendAnalysis, TrendVerdict};
