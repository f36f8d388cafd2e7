//! Candlestick and projection charts
//!
//! Charts are built from a series into plain data plus a fixed [`ChartStyle`],
//! then either serialized to JSON for an external charting library or drawn as
//! a standalone SVG document.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt::Write as _;
use std::path::Path;

use crate::error::Result;
use crate::indicators::moving_average;
use crate::predict::PredictionPoint;
use crate::series::{PriceBar, PriceSeries};
use crate::trend::SHORT_WINDOW;

/// Chart margins in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margin {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

/// Fixed dark-theme styling shared by every chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub margin: Margin,
    pub paper_color: &'static str,
    pub plot_color: &'static str,
    pub font_color: &'static str,
    pub grid_color: &'static str,
    pub increasing_color: &'static str,
    pub decreasing_color: &'static str,
    pub line_color: &'static str,
    pub line_width: u32,
}

impl ChartStyle {
    pub const DARK: ChartStyle = ChartStyle {
        width: 1400,
        height: 750,
        margin: Margin {
            left: 50,
            right: 50,
            top: 50,
            bottom: 50,
        },
        paper_color: "black",
        plot_color: "black",
        font_color: "white",
        grid_color: "#333333",
        increasing_color: "green",
        decreasing_color: "red",
        line_color: "cyan",
        line_width: 2,
    };
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::DARK
    }
}

/// Candlesticks with a trailing moving-average overlay
#[derive(Debug, Clone, Serialize)]
pub struct CandlestickChart {
    pub title: String,
    pub x_title: &'static str,
    pub y_title: &'static str,
    pub style: ChartStyle,
    pub candles: Vec<PriceBar>,
    pub ma_window: usize,
    pub moving_average: Vec<Option<f64>>,
}

impl CandlestickChart {
    /// Build the daily chart for `ticker` with the 20-period overlay
    pub fn build(series: &PriceSeries, ticker: &str) -> Result<Self> {
        let closes = series.closes();
        Ok(Self {
            title: format!("{ticker} Candlestick Chart (Daily)"),
            x_title: "Date",
            y_title: "Stock Price (USD)",
            style: ChartStyle::DARK,
            candles: series.bars().to_vec(),
            ma_window: SHORT_WINDOW,
            moving_average: moving_average(&closes, SHORT_WINDOW)?,
        })
    }

    pub fn overlay_name(&self) -> String {
        format!("{}-Day MA", self.ma_window)
    }

    /// Chart payload for external charting libraries
    pub fn to_json(&self) -> Value {
        let candlestick: Vec<_> = self
            .candles
            .iter()
            .map(|c| {
                json!({
                    "date": c.date.to_string(),
                    "open": c.open,
                    "high": c.high,
                    "low": c.low,
                    "close": c.close,
                    "volume": c.volume,
                })
            })
            .collect();

        let line: Vec<_> = self
            .candles
            .iter()
            .map(|c| json!({"date": c.date.to_string(), "value": c.close}))
            .collect();

        let overlay: Vec<_> = self
            .candles
            .iter()
            .zip(&self.moving_average)
            .map(|(c, v)| json!({"date": c.date.to_string(), "value": v}))
            .collect();
        let mut indicators = serde_json::Map::new();
        indicators.insert(self.overlay_name(), Value::Array(overlay));

        json!({
            "title": self.title,
            "x_title": self.x_title,
            "y_title": self.y_title,
            "style": self.style,
            "data_points": self.candles.len(),
            "candlestick": candlestick,
            "line": line,
            "indicators": indicators,
            "chart_metadata": {
                "start_date": self.candles.first().map(|c| c.date.to_string()),
                "end_date": self.candles.last().map(|c| c.date.to_string()),
                "min_price": self.candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min),
                "max_price": self.candles.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max),
            }
        })
    }

    /// Draw the chart as a standalone SVG document
    pub fn render_svg(&self) -> String {
        let lo = self.candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let hi = self
            .candles
            .iter()
            .map(|c| c.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let frame = Frame::new(self.style, self.candles.len(), lo, hi);

        let mut svg = frame.open(&self.title, self.x_title, self.y_title);
        frame.date_labels(&mut svg, &self.candles.iter().map(|c| c.date).collect::<Vec<_>>());

        let body_width = (frame.step() * 0.6).max(1.0);
        for (i, candle) in self.candles.iter().enumerate() {
            let color = if candle.is_increasing() {
                self.style.increasing_color
            } else {
                self.style.decreasing_color
            };
            let x = frame.x(i);
            let open = frame.y(candle.open);
            let close = frame.y(candle.close);
            let top = open.min(close);
            let height = (open - close).abs().max(1.0);

            let _ = writeln!(
                svg,
                r#"<line x1="{x:.2}" y1="{:.2}" x2="{x:.2}" y2="{:.2}" stroke="{color}" stroke-width="1"/>"#,
                frame.y(candle.high),
                frame.y(candle.low),
            );
            let _ = writeln!(
                svg,
                r#"<rect x="{:.2}" y="{top:.2}" width="{body_width:.2}" height="{height:.2}" fill="{color}"/>"#,
                x - body_width / 2.0,
            );
        }

        let points: Vec<(f64, f64)> = self
            .moving_average
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (frame.x(i), frame.y(v))))
            .collect();
        frame.polyline(&mut svg, &points, &self.overlay_name());

        frame.close(svg)
    }

    /// Write the SVG rendering to `path`
    pub fn write_svg(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render_svg())?;
        tracing::info!(path = %path.display(), "Wrote candlestick chart");
        Ok(())
    }
}

/// Line chart of projected closes
#[derive(Debug, Clone, Serialize)]
pub struct PredictionChart {
    pub title: String,
    pub style: ChartStyle,
    pub points: Vec<PredictionPoint>,
}

impl PredictionChart {
    pub fn build(points: &[PredictionPoint], ticker: &str) -> Self {
        Self {
            title: format!("{ticker} Predicted Close (Linear Regression)"),
            style: ChartStyle::DARK,
            points: points.to_vec(),
        }
    }

    pub fn to_json(&self) -> Value {
        let line: Vec<_> = self
            .points
            .iter()
            .map(|p| json!({"date": p.date.to_string(), "value": p.predicted_close}))
            .collect();
        json!({
            "title": self.title,
            "style": self.style,
            "line": line,
        })
    }

    pub fn render_svg(&self) -> String {
        let values = self.points.iter().map(|p| p.predicted_close);
        let lo = values.clone().fold(f64::INFINITY, f64::min);
        let hi = values.fold(f64::NEG_INFINITY, f64::max);
        let frame = Frame::new(self.style, self.points.len(), lo, hi);

        let mut svg = frame.open(&self.title, "Date", "Predicted Close");
        frame.date_labels(&mut svg, &self.points.iter().map(|p| p.date).collect::<Vec<_>>());

        let points: Vec<(f64, f64)> = self
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| (frame.x(i), frame.y(p.predicted_close)))
            .collect();
        frame.polyline(&mut svg, &points, "Predicted Close");
        for (x, y) in &points {
            let _ = writeln!(
                svg,
                r#"<circle cx="{x:.2}" cy="{y:.2}" r="3" fill="{}"/>"#,
                self.style.line_color
            );
        }

        frame.close(svg)
    }

    pub fn write_svg(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render_svg())?;
        tracing::info!(path = %path.display(), "Wrote prediction chart");
        Ok(())
    }
}

/// Plot-area geometry: slot-per-point x axis and a padded linear y axis
struct Frame {
    style: ChartStyle,
    count: usize,
    lo: f64,
    hi: f64,
}

impl Frame {
    const Y_TICKS: usize = 5;

    fn new(style: ChartStyle, count: usize, lo: f64, hi: f64) -> Self {
        let (lo, hi) = if !lo.is_finite() || !hi.is_finite() {
            (0.0, 1.0)
        } else if (hi - lo).abs() < f64::EPSILON {
            (lo - 1.0, hi + 1.0)
        } else {
            let pad = (hi - lo) * 0.05;
            (lo - pad, hi + pad)
        };
        Self {
            style,
            count: count.max(1),
            lo,
            hi,
        }
    }

    fn left(&self) -> f64 {
        f64::from(self.style.margin.left)
    }

    fn right(&self) -> f64 {
        f64::from(self.style.width - self.style.margin.right)
    }

    fn top(&self) -> f64 {
        f64::from(self.style.margin.top)
    }

    fn bottom(&self) -> f64 {
        f64::from(self.style.height - self.style.margin.bottom)
    }

    fn step(&self) -> f64 {
        (self.right() - self.left()) / self.count as f64
    }

    fn x(&self, index: usize) -> f64 {
        self.left() + self.step() * (index as f64 + 0.5)
    }

    fn y(&self, value: f64) -> f64 {
        let frac = (value - self.lo) / (self.hi - self.lo);
        self.bottom() - frac * (self.bottom() - self.top())
    }

    fn open(&self, title: &str, x_title: &str, y_title: &str) -> String {
        let s = &self.style;
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
            w = s.width,
            h = s.height,
        );
        let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="{}"/>"#, s.paper_color);
        let _ = writeln!(
            svg,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
            self.left(),
            self.top(),
            self.right() - self.left(),
            self.bottom() - self.top(),
            s.plot_color,
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" fill="{}" font-size="18">{}</text>"#,
            self.left(),
            self.top() - 20.0,
            s.font_color,
            escape(title),
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" fill="{}" font-size="12" text-anchor="middle">{}</text>"#,
            (self.left() + self.right()) / 2.0,
            f64::from(s.height) - 8.0,
            s.font_color,
            escape(x_title),
        );
        let _ = writeln!(
            svg,
            r#"<text x="12" y="{:.2}" fill="{}" font-size="12" text-anchor="middle" transform="rotate(-90 12 {:.2})">{}</text>"#,
            (self.top() + self.bottom()) / 2.0,
            s.font_color,
            (self.top() + self.bottom()) / 2.0,
            escape(y_title),
        );

        for tick in 0..=Self::Y_TICKS {
            let value = self.lo + (self.hi - self.lo) * tick as f64 / Self::Y_TICKS as f64;
            let y = self.y(value);
            let _ = writeln!(
                svg,
                r#"<line x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="{}" stroke-width="1"/>"#,
                self.left(),
                self.right(),
                s.grid_color,
            );
            let _ = writeln!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" fill="{}" font-size="10" text-anchor="end">{value:.2}</text>"#,
                self.left() - 4.0,
                y + 3.0,
                s.font_color,
            );
        }
        svg
    }

    /// Label the first, middle and last dates
    fn date_labels(&self, svg: &mut String, dates: &[NaiveDate]) {
        if dates.is_empty() {
            return;
        }
        let mut indices = vec![0, dates.len() / 2, dates.len() - 1];
        indices.dedup();
        for i in indices {
            let _ = writeln!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" fill="{}" font-size="10" text-anchor="middle">{}</text>"#,
                self.x(i),
                self.bottom() + 15.0,
                self.style.font_color,
                dates[i],
            );
        }
    }

    fn polyline(&self, svg: &mut String, points: &[(f64, f64)], name: &str) {
        if points.is_empty() {
            return;
        }
        let coords: Vec<String> = points.iter().map(|(x, y)| format!("{x:.2},{y:.2}")).collect();
        let _ = writeln!(
            svg,
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{}"><title>{}</title></polyline>"#,
            coords.join(" "),
            self.style.line_color,
            self.style.line_width,
            escape(name),
        );
    }

    fn close(&self, mut svg: String) -> String {
        svg.push_str("</svg>\n");
        svg
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
