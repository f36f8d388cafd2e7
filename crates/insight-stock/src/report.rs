//! Dashboard report and output formatting

use chrono::{DateTime, NaiveDate, Utc};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;
use serde_json::json;

use crate::chart::{CandlestickChart, PredictionChart};
use crate::loader::Provenance;
use crate::predict::PredictionPoint;
use crate::trend::TrendAnalysis;

/// One row of the trailing history table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistoryRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub ma_20: Option<f64>,
    pub ma_50: Option<f64>,
}

/// Trend section of the report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrendSection {
    Analyzed(TrendAnalysis),
    Skipped { reason: String },
}

/// Everything shown for one ticker submission
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub ticker: String,
    pub provenance: Provenance,
    pub fallback_warning: Option<String>,
    pub trend: TrendSection,
    pub history: Vec<HistoryRow>,
    pub predictions: Vec<PredictionPoint>,
    #[serde(skip)]
    pub chart: CandlestickChart,
    #[serde(skip)]
    pub prediction_chart: PredictionChart,
    pub generated_at: DateTime<Utc>,
}

impl DashboardReport {
    pub fn heading(&self) -> String {
        format!(
            "📊 Candlestick Chart for {} ({})",
            self.ticker,
            self.provenance.label()
        )
    }

    pub fn recommendation(&self) -> String {
        match &self.trend {
            TrendSection::Analyzed(analysis) => analysis.verdict.to_string(),
            TrendSection::Skipped { reason } => format!("⚠️ Trend analysis skipped: {reason}"),
        }
    }
}

/// Renders reports for one output surface
pub trait Formatter: Send + Sync {
    fn format_report(&self, report: &DashboardReport) -> String;
    fn format_unavailable(&self, ticker: &str, warning: &str, reason: &str) -> String;
    fn format_error(&self, error: &str) -> String;
}

/// Terminal output with box-drawn tables
pub struct TextFormatter;

impl TextFormatter {
    fn history_table(rows: &[HistoryRow]) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Date", "Open", "High", "Low", "Close", "Volume", "20MA", "50MA"]);

        for row in rows {
            table.add_row(vec![
                row.date.to_string(),
                format!("{:.2}", row.open),
                format!("{:.2}", row.high),
                format!("{:.2}", row.low),
                format!("{:.2}", row.close),
                row.volume.to_string(),
                optional(row.ma_20),
                optional(row.ma_50),
            ]);
        }
        table
    }

    fn prediction_table(points: &[PredictionPoint]) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Date", "Predicted Close"]);

        for point in points {
            table.add_row(vec![
                point.date.to_string(),
                format!("{:.2}", point.predicted_close),
            ]);
        }
        table
    }
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

impl Formatter for TextFormatter {
    fn format_report(&self, report: &DashboardReport) -> String {
        let mut out = String::new();
        if let Some(warning) = &report.fallback_warning {
            out.push_str(&format!("⚠️ {warning}\n\n"));
        }

        out.push_str(&report.heading());
        out.push_str("\n\n### 📌 Investment Recommendation\n");
        out.push_str(&report.recommendation());

        out.push_str(&format!(
            "\n\n### 🕰️ Historical Data Table (Last {} Days)\n",
            report.history.len()
        ));
        out.push_str(&Self::history_table(&report.history).to_string());

        out.push_str("\n\n### 🔮 Future Price Prediction (Linear Regression)\n");
        out.push_str(&Self::prediction_table(&report.predictions).to_string());

        out.push_str("\n\n🔁 Want to analyze another stock? Enter a new symbol.");
        out
    }

    fn format_unavailable(&self, ticker: &str, warning: &str, reason: &str) -> String {
        format!(
            "⚠️ {warning}\n\
             ❌ No local CSV data available either for {ticker} ({reason}).\n\
             ❗ Try another stock. No valid data found for the symbol provided."
        )
    }

    fn format_error(&self, error: &str) -> String {
        format!("❌ Error: {error}")
    }
}

/// Machine-readable output
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_report(&self, report: &DashboardReport) -> String {
        let value = json!({
            "report": report,
            "chart": report.chart.to_json(),
            "prediction_chart": report.prediction_chart.to_json(),
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|e| self.format_error(&e.to_string()))
    }

    fn format_unavailable(&self, ticker: &str, warning: &str, reason: &str) -> String {
        json!({
            "ticker": ticker,
            "status": "unavailable",
            "warning": warning,
            "reason": reason,
        })
        .to_string()
    }

    fn format_error(&self, error: &str) -> String {
        json!({"status": "error", "error": error}).to_string()
    }
}

/// Output surfaces the shell can render to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub struct FormatterFactory;

impl FormatterFactory {
    pub fn create(format: OutputFormat) -> Box<dyn Formatter> {
        match format {
            OutputFormat::Text => Box::new(TextFormatter),
            OutputFormat::Json => Box::new(JsonFormatter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::predict;
    use crate::series::test_support::series_from_fn;
    use crate::trend::{TrendVerdict, analyze};

    fn sample_report(trend: TrendSection) -> DashboardReport {
        let series = series_from_fn(70, |i| 100.0 + i as f64);
        let predictions = predict(&series, 5).unwrap();
        DashboardReport {
            ticker: "AAPL".to_string(),
            provenance: Provenance::Csv,
            fallback_warning: Some("Could not load remote data".to_string()),
            trend,
            history: series
                .tail(3)
                .iter()
                .map(|b| HistoryRow {
                    date: b.date,
                    open: b.open,
                    high: b.high,
                    low: b.low,
                    close: b.close,
                    volume: b.volume,
                    ma_20: Some(b.close - 9.5),
                    ma_50: None,
                })
                .collect(),
            prediction_chart: PredictionChart::build(&predictions, "AAPL"),
            predictions,
            chart: CandlestickChart::build(&series, "AAPL").unwrap(),
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_text_report_sections() {
        let series = series_from_fn(70, |i| 100.0 + i as f64);
        let report = sample_report(TrendSection::Analyzed(analyze(&series).unwrap()));
        let text = TextFormatter.format_report(&report);

        assert!(text.starts_with("⚠️ Could not load remote data"));
        assert!(text.contains("📊 Candlestick Chart for AAPL (Cached)"));
        assert!(text.contains(TrendVerdict::Upward.explanation()));
        assert!(text.contains("Historical Data Table (Last 3 Days)"));
        assert!(text.contains("Predicted Close"));
        assert!(text.contains("2024-03-10"));
    }

    #[test]
    fn test_text_report_skipped_trend() {
        let report = sample_report(TrendSection::Skipped {
            reason: "need at least 60 observations".to_string(),
        });
        assert!(report.recommendation().contains("skipped"));
        let text = TextFormatter.format_report(&report);
        assert!(text.contains("need at least 60 observations"));
    }

    #[test]
    fn test_json_report() {
        let report = sample_report(TrendSection::Skipped {
            reason: "short".to_string(),
        });
        let text = JsonFormatter.format_report(&report);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["report"]["ticker"], "AAPL");
        assert_eq!(value["report"]["provenance"], "csv");
        assert_eq!(value["report"]["trend"]["status"], "skipped");
        assert_eq!(value["report"]["predictions"].as_array().unwrap().len(), 5);
        assert_eq!(value["chart"]["data_points"], 70);
    }

    #[test]
    fn test_unavailable_messages() {
        let warning = "Could not load data from Alpha Vantage (offline). Switching to fallback CSV data.";
        let text = TextFormatter.format_unavailable("ZZZZ", warning, "missing file");
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("⚠️ Could not load data from Alpha Vantage"));
        assert!(lines[1].contains("No local CSV data available either for ZZZZ"));

        let json: serde_json::Value = serde_json::from_str(
            &JsonFormatter.format_unavailable("ZZZZ", warning, "missing"),
        )
        .unwrap();
        assert_eq!(json["status"], "unavailable");
        assert_eq!(json["warning"], warning);
    }

    #[test]
    fn test_formatter_factory() {
        let formatter = FormatterFactory::create(OutputFormat::Json);
        assert!(formatter.format_error("boom").contains("\"boom\""));
    }
}
