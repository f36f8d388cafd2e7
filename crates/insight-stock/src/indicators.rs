//! Moving averages over closing prices

use ta::{Next, indicators::SimpleMovingAverage};

use crate::error::{Result, StockError};

/// Trailing simple moving average aligned to `values`.
///
/// Position `i` holds the mean of `values[i + 1 - window..=i]`; the first
/// `window - 1` positions are `None`.
pub fn moving_average(values: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    let mut sma =
        SimpleMovingAverage::new(window).map_err(|e| StockError::IndicatorError(e.to_string()))?;

    Ok(values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let avg = sma.next(value);
            (i + 1 >= window).then_some(avg)
        })
        .collect())
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// The defined values of a moving average, in order
pub fn defined(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().flatten().copied().collect()
}
