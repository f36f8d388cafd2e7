//! Moving-average trend verdict

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, StockError};
use crate::indicators::{mean, moving_average};
use crate::series::PriceSeries;

pub const SHORT_WINDOW: usize = 20;
pub const LONG_WINDOW: usize = 50;
/// Number of recent MA20 values compared against the block before them
pub const SLOPE_SPAN: usize = 5;
/// Observations needed for MA50 plus both slope blocks
pub const MIN_OBSERVATIONS: usize = LONG_WINDOW + 2 * SLOPE_SPAN;

/// Three-way trend classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendVerdict {
    Upward,
    Downward,
    Unclear,
}

impl TrendVerdict {
    /// Classify from the latest close, the latest averages and the MA20 slope proxy
    pub fn classify(close: f64, ma_short: f64, ma_long: f64, slope: f64) -> Self {
        if close > ma_short && ma_short > ma_long && slope > 0.0 {
            Self::Upward
        } else if close < ma_short && ma_short < ma_long && slope < 0.0 {
            Self::Downward
        } else {
            Self::Unclear
        }
    }

    pub fn explanation(self) -> &'static str {
        match self {
            Self::Upward => {
                "Strong upward momentum detected (Price > 20MA > 50MA with upward slope). \
                 This may be a good opportunity to invest."
            }
            Self::Downward => {
                "The stock shows a downward trend with weakening momentum. \
                 It may be best to wait before investing."
            }
            Self::Unclear => {
                "The stock trend is unclear or sideways. \
                 Monitoring is recommended before making investment decisions."
            }
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Upward => "✅",
            Self::Downward => "❌",
            Self::Unclear => "ℹ️",
        }
    }
}

impl fmt::Display for TrendVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.symbol(), self.explanation())
    }
}

/// Verdict together with the values it was derived from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub verdict: TrendVerdict,
    pub last_close: f64,
    pub ma_20: f64,
    pub ma_50: f64,
    /// Mean of the last five MA20 values minus the mean of the five before
    pub slope: f64,
}

/// Analyze the trend of a series with at least [`MIN_OBSERVATIONS`] bars
pub fn analyze(series: &PriceSeries) -> Result<TrendAnalysis> {
    if series.len() < MIN_OBSERVATIONS {
        return Err(StockError::InsufficientData {
            required: MIN_OBSERVATIONS,
            actual: series.len(),
        });
    }

    let closes = series.closes();
    let ma_short = moving_average(&closes, SHORT_WINDOW)?;
    let ma_long = moving_average(&closes, LONG_WINDOW)?;

    let latest = |ma: &[Option<f64>]| {
        ma.last().copied().flatten().ok_or(StockError::InsufficientData {
            required: MIN_OBSERVATIONS,
            actual: series.len(),
        })
    };
    let ma_20 = latest(&ma_short)?;
    let ma_50 = latest(&ma_long)?;

    // length guard above keeps every value in both blocks defined
    let tail: Vec<f64> = ma_short[ma_short.len() - 2 * SLOPE_SPAN..]
        .iter()
        .flatten()
        .copied()
        .collect();
    let (previous, recent) = tail.split_at(SLOPE_SPAN);
    let slope = match (mean(recent), mean(previous)) {
        (Some(r), Some(p)) => r - p,
        _ => {
            return Err(StockError::IndicatorError(
                "slope window not defined".to_string(),
            ));
        }
    };

    let last_close = series.last().close;
    let verdict = TrendVerdict::classify(last_close, ma_20, ma_50, slope);

    tracing::debug!(
        symbol = series.symbol(),
        ?verdict,
        last_close,
        ma_20,
        ma_50,
        slope,
        "Trend analyzed"
    );

    Ok(TrendAnalysis {
        verdict,
        last_close,
        ma_20,
        ma_50,
        slope,
    })
}
