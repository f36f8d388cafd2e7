//! Linear price projection

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StockError};
use crate::series::PriceSeries;

pub const DEFAULT_HORIZON: usize = 5;
/// Longest projection accepted by [`predict`]
pub const MAX_HORIZON: usize = 365;

/// One projected close
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    pub date: NaiveDate,
    pub predicted_close: f64,
}

/// Ordinary least-squares line `y = intercept + slope * x`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Closed-form single-feature fit.
    ///
    /// With zero variance in `xs` the slope is 0 and the intercept is the mean of `ys`.
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(StockError::InvalidData(format!(
                "feature/target length mismatch: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        if xs.is_empty() {
            return Err(StockError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }

        let n = xs.len() as f64;
        let x_mean = xs.iter().sum::<f64>() / n;
        let y_mean = ys.iter().sum::<f64>() / n;

        let (sxy, sxx) = xs
            .iter()
            .zip(ys)
            .fold((0.0, 0.0), |(sxy, sxx), (&x, &y)| {
                let dx = x - x_mean;
                (sxy + dx * (y - y_mean), sxx + dx * dx)
            });

        let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
        Ok(Self {
            slope,
            intercept: y_mean - slope * x_mean,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit closes against their index `0..N` and return the fitted line
pub fn fit_series(series: &PriceSeries) -> Result<LinearFit> {
    let xs: Vec<f64> = (0..series.len()).map(|i| i as f64).collect();
    LinearFit::fit(&xs, &series.closes())
}

/// Project `horizon` closes past the end of the series.
///
/// Future dates advance one calendar day at a time from the last bar; weekends
/// and holidays are not skipped. Horizons above [`MAX_HORIZON`] are rejected.
pub fn predict(series: &PriceSeries, horizon: usize) -> Result<Vec<PredictionPoint>> {
    if horizon > MAX_HORIZON {
        return Err(StockError::InvalidData(format!(
            "prediction horizon {horizon} exceeds {MAX_HORIZON} days"
        )));
    }

    let fit = fit_series(series)?;
    let last_index = series.len() - 1;
    let last_date = series.last().date;

    let points = (1..=horizon)
        .map(|step| {
            let date = last_date
                .checked_add_days(Days::new(step as u64))
                .ok_or_else(|| {
                    StockError::InvalidData(format!("date overflow {step} days after {last_date}"))
                })?;
            Ok(PredictionPoint {
                date,
                predicted_close: fit.predict((last_index + step) as f64),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        symbol = series.symbol(),
        slope = fit.slope,
        intercept = fit.intercept,
        horizon,
        "Projected closes"
    );

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::test_support::series_from_fn;

    #[test]
    fn test_exact_fit_on_linear_history() {
        let series = series_from_fn(40, |i| 100.0 + 2.0 * i as f64);
        let points = predict(&series, DEFAULT_HORIZON).unwrap();

        assert_eq!(points.len(), 5);
        for (k, point) in points.iter().enumerate() {
            let index = 40 + k;
            let expected = 100.0 + 2.0 * index as f64;
            assert!((point.predicted_close - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_dates_are_consecutive_calendar_days() {
        // 2024-01-01 plus 11 days is Friday 2024-01-12
        let series = series_from_fn(12, |i| 50.0 + i as f64);
        let last = series.last().date;
        let points = predict(&series, 5).unwrap();

        let dates: Vec<String> = points.iter().map(|p| p.date.to_string()).collect();
        assert_eq!(
            dates,
            vec!["2024-01-13", "2024-01-14", "2024-01-15", "2024-01-16", "2024-01-17"]
        );
        for (k, point) in points.iter().enumerate() {
            assert_eq!(point.date, last + Days::new(k as u64 + 1));
        }
    }

    #[test]
    fn test_horizon_controls_length() {
        let series = series_from_fn(10, |i| (i % 3) as f64);
        assert_eq!(predict(&series, 0).unwrap().len(), 0);
        assert_eq!(predict(&series, 12).unwrap().len(), 12);
    }

    #[test]
    fn test_oversized_horizon_rejected() {
        let series = series_from_fn(3, |i| 10.0 + i as f64);
        assert!(predict(&series, MAX_HORIZON).is_ok());
        assert!(matches!(
            predict(&series, 100_000_000),
            Err(StockError::InvalidData(_))
        ));
    }

    #[test]
    fn test_date_overflow_is_error() {
        let bar = crate::series::PriceBar::new(NaiveDate::MAX, 1.0, 1.0, 1.0, 1.0, 1);
        let series = PriceSeries::new("EDGE", vec![bar]).unwrap();
        assert!(matches!(predict(&series, 1), Err(StockError::InvalidData(_))));
    }

    #[test]
    fn test_single_observation_is_flat() {
        let series = series_from_fn(1, |_| 75.0);
        let points = predict(&series, 3).unwrap();
        assert!(points.iter().all(|p| (p.predicted_close - 75.0).abs() < 1e-12));
    }

    #[test]
    fn test_fit_recovers_line() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 3.0, 5.0, 7.0];
        let fit = LinearFit::fit(&xs, &ys).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.predict(10.0) - 21.0).abs() < 1e-12);
    }

    #[test]
    fn test_fit_noisy_data() {
        // sxy = -11, sxx = 10
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [4.5, 2.5, 2.5, 0.5, 0.0];
        let fit = LinearFit::fit(&xs, &ys).unwrap();
        assert!((fit.slope - (-1.1)).abs() < 1e-12);
        assert!((fit.intercept - 4.2).abs() < 1e-12);
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        assert!(LinearFit::fit(&[], &[]).is_err());
        assert!(LinearFit::fit(&[1.0], &[1.0, 2.0]).is_err());
    }
}
