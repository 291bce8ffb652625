//! Fit-quality metrics computed over in-sample predictions.

use crate::models::AccuracyMetrics;

/// Mean Absolute Percentage Error.
///
/// Actuals below `EPSILON` are skipped so a near-zero day cannot blow the
/// percentage up to infinity.
pub fn mape(forecast: &[f64], actual: &[f64]) -> f64 {
    const EPSILON: f64 = 1e-10;

    let n = forecast.len().min(actual.len());
    if n == 0 {
        return 0.0;
    }

    let mut total = 0.0;
    let mut counted = 0usize;
    for i in 0..n {
        if actual[i].abs() > EPSILON {
            total += ((actual[i] - forecast[i]) / actual[i]).abs();
            counted += 1;
        }
    }

    if counted == 0 {
        0.0
    } else {
        total / counted as f64 * 100.0
    }
}

/// Root Mean Squared Error.
pub fn rmse(forecast: &[f64], actual: &[f64]) -> f64 {
    let n = forecast.len().min(actual.len());
    if n == 0 {
        return 0.0;
    }

    let sum_sq: f64 = (0..n).map(|i| (actual[i] - forecast[i]).powi(2)).sum();
    (sum_sq / n as f64).sqrt()
}

/// Mean Absolute Error.
pub fn mae(forecast: &[f64], actual: &[f64]) -> f64 {
    let n = forecast.len().min(actual.len());
    if n == 0 {
        return 0.0;
    }

    let sum_abs: f64 = (0..n).map(|i| (actual[i] - forecast[i]).abs()).sum();
    sum_abs / n as f64
}

/// Bundles all three metrics for a fitted model.
pub fn evaluate(forecast: &[f64], actual: &[f64]) -> AccuracyMetrics {
    AccuracyMetrics {
        mape: mape(forecast, actual),
        rmse: rmse(forecast, actual),
        mae: mae(forecast, actual),
    }
}
