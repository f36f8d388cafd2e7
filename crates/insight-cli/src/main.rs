//! Stock Insight CLI
//!
//! Enter a ticker symbol (e.g. `AAPL`, `GOOGL`, `TSLA`, `JPM`) to get a
//! candlestick chart, a trend recommendation, the recent history table and a
//! short linear price projection. When live data is unavailable the
//! `<fallback-dir>/<TICKER>.csv` file is used instead.
//!
//! # Usage
//!
//! ```bash
//! export ALPHA_VANTAGE_API_KEY="your-key"
//!
//! # Interactive prompt
//! cargo run --bin stock-insight
//!
//! # One-shot, charts written as SVG
//! cargo run --bin stock-insight -- --ticker aapl --chart-dir charts
//! ```

use clap::{Parser, ValueEnum};
use insight_stock::{
    Dashboard, DashboardOutcome, DataProvider, Formatter, FormatterFactory, OutputFormat,
    OutputSize, StockConfig, write_charts,
};
use insight_utils::{LogConfig, LogFormat};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProviderArg {
    AlphaVantage,
    Yahoo,
}

impl From<ProviderArg> for DataProvider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::AlphaVantage => DataProvider::AlphaVantage,
            ProviderArg::Yahoo => DataProvider::Yahoo,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SizeArg {
    Compact,
    Full,
}

impl From<SizeArg> for OutputSize {
    fn from(arg: SizeArg) -> Self {
        match arg {
            SizeArg::Compact => OutputSize::Compact,
            SizeArg::Full => OutputSize::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "stock-insight")]
#[command(about = "Daily stock trend insight: candlesticks, moving averages and a linear projection", long_about = None)]
struct Args {
    /// Analyze a single ticker and exit instead of prompting
    #[arg(short, long)]
    ticker: Option<String>,

    /// Alpha Vantage API key
    #[arg(long, env = "ALPHA_VANTAGE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Remote data provider
    #[arg(long, value_enum, default_value_t = ProviderArg::AlphaVantage)]
    provider: ProviderArg,

    /// Directory holding <TICKER>.csv fallback files
    #[arg(long, default_value = "mock_data")]
    fallback_dir: PathBuf,

    /// History window requested from the provider
    #[arg(long, value_enum, default_value_t = SizeArg::Compact)]
    output_size: SizeArg,

    /// Number of future days to project
    #[arg(long, default_value_t = 5)]
    horizon: usize,

    /// Number of trailing rows in the history table
    #[arg(long, default_value_t = 30)]
    history_rows: usize,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Write candlestick and prediction SVG charts into this directory
    #[arg(long)]
    chart_dir: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    format: FormatArg,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn stock_config(&self) -> insight_stock::Result<StockConfig> {
        let mut builder = StockConfig::builder()
            .provider(self.provider.into())
            .output_size(self.output_size.into())
            .fallback_dir(self.fallback_dir.clone())
            .prediction_horizon(self.horizon)
            .history_rows(self.history_rows)
            .request_timeout(Duration::from_secs(self.timeout));

        if let Some(key) = &self.api_key {
            builder = builder.alpha_vantage_api_key(key.clone());
        }
        builder.build()
    }

    fn log_config(&self) -> LogConfig {
        let format = if self.log_json {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        };
        LogConfig::default().with_format(format)
    }
}

fn print_banner() {
    println!(
        r"
╔══════════════════════════════════════════════════════════════╗
║                📈 Smart Stock Insight Dashboard              ║
║                                                              ║
║  Enter a stock ticker (e.g. AAPL, GOOGL, TSLA, JPM) to get   ║
║  live data and trend insights. If live data isn't available, ║
║  fallback data will be used.                                 ║
║                                                              ║
║    /exit  - Exit                                             ║
╚══════════════════════════════════════════════════════════════╝
"
    );
}

/// Run one submission and print its output
async fn submit(
    dashboard: &Dashboard,
    formatter: &dyn Formatter,
    chart_dir: Option<&PathBuf>,
    input: &str,
) {
    match dashboard.run(input).await {
        Ok(DashboardOutcome::Empty) => {}
        Ok(DashboardOutcome::Unavailable {
            ticker,
            fallback_warning,
            reason,
        }) => {
            println!(
                "{}\n",
                formatter.format_unavailable(&ticker, &fallback_warning, &reason)
            );
        }
        Ok(DashboardOutcome::Ready(report)) => {
            println!("{}\n", formatter.format_report(&report));
            if let Some(dir) = chart_dir {
                match write_charts(&report, dir) {
                    Ok(paths) => {
                        for path in paths {
                            eprintln!("Chart written to {}", path.display());
                        }
                    }
                    Err(e) => eprintln!("{}", formatter.format_error(&e.to_string())),
                }
            }
        }
        Err(e) => eprintln!("{}\n", formatter.format_error(&e.to_string())),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    insight_utils::init_tracing_with(&args.log_config())?;

    let config = args.stock_config()?;
    if config.provider == DataProvider::AlphaVantage && config.alpha_vantage_api_key.is_none() {
        eprintln!("Warning: ALPHA_VANTAGE_API_KEY not set, only fallback data will be available");
    }

    info!(provider = config.provider.name(), fallback_dir = %config.fallback_dir.display(), "Starting stock-insight");

    let dashboard = Dashboard::from_config(config)?;
    let formatter = FormatterFactory::create(args.format.into());
    let chart_dir = args.chart_dir.as_ref();

    if let Some(ticker) = &args.ticker {
        submit(&dashboard, formatter.as_ref(), chart_dir, ticker).await;
        return Ok(());
    }

    print_banner();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("Enter stock ticker symbol: ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                // EOF
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let input = input.trim();
        if input.eq_ignore_ascii_case("/exit") {
            println!("Goodbye!");
            break;
        }

        submit(&dashboard, formatter.as_ref(), chart_dir, input).await;
    }

    Ok(())
}
