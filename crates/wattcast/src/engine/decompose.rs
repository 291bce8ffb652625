//! Display decomposition of a fitted series.
//!
//! The component charts are descriptive, not the model internals: trend is a
//! centered moving average extended by a straight line, seasonal profiles are
//! mean deviations from that trend keyed by weekday or day-of-year. Every
//! component covers the same date range as the forecast itself.

use chrono::{Datelike, NaiveDate};

use crate::models::{ComponentKind, ComponentSeries};

/// Window for the centered moving-average trend, one weekly cycle wide.
pub const TREND_WINDOW: usize = 7;

/// Trend values used to fit the extrapolation slope.
const SLOPE_TAIL: usize = 28;

/// Span required before a yearly profile is worth showing: two full years.
const YEARLY_MIN_SPAN_DAYS: i64 = 730;

pub fn yearly_enabled(span_days: i64) -> bool {
    span_days >= YEARLY_MIN_SPAN_DAYS
}

/// Builds the component series over `dates`, which covers history plus the
/// forecast horizon. `history` holds the gap-filled observed values and spans
/// the first `history_len` entries of `dates`.
pub fn decompose(
    dates: &[NaiveDate],
    history: &[f64],
    history_len: usize,
    weekly: bool,
    yearly: bool,
) -> Vec<ComponentSeries> {
    let history_len = history_len.min(history.len()).min(dates.len());
    if history_len == 0 {
        return Vec::new();
    }

    let trend_hist = centered_moving_average(&history[..history_len], TREND_WINDOW);
    let slope = tail_slope(&trend_hist, SLOPE_TAIL);
    let last_trend = trend_hist[history_len - 1];

    let mut trend = trend_hist;
    trend.extend((1..=dates.len() - history_len).map(|step| last_trend + slope * step as f64));

    let detrended: Vec<f64> = history[..history_len]
        .iter()
        .zip(&trend)
        .map(|(value, t)| value - t)
        .collect();

    let mut components = vec![ComponentSeries {
        kind: ComponentKind::Trend,
        dates: dates.to_vec(),
        values: trend,
    }];

    if weekly {
        let profile = weekday_profile(&dates[..history_len], &detrended);
        components.push(ComponentSeries {
            kind: ComponentKind::Weekly,
            dates: dates.to_vec(),
            values: dates
                .iter()
                .map(|d| profile[d.weekday().num_days_from_monday() as usize])
                .collect(),
        });
    }

    if yearly {
        let profile = day_of_year_profile(&dates[..history_len], &detrended);
        components.push(ComponentSeries {
            kind: ComponentKind::Yearly,
            dates: dates.to_vec(),
            values: dates.iter().map(|d| profile[doy_index(d)]).collect(),
        });
    }

    components
}

/// Centered moving average with shrinking windows at the edges, so the trend
/// has a value for every point of the input.
fn centered_moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let half = window / 2;
    (0..values.len())
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = (i + half + 1).min(values.len());
            let slice = &values[start..end];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Least-squares slope over the last `tail` trend values.
fn tail_slope(trend: &[f64], tail: usize) -> f64 {
    let k = tail.min(trend.len());
    if k < 2 {
        return 0.0;
    }

    let tail = &trend[trend.len() - k..];
    let mean_x = (k - 1) as f64 / 2.0;
    let mean_y = tail.iter().sum::<f64>() / k as f64;

    let mut num = 0.0;
    let mut den = 0.0;
    for (i, y) in tail.iter().enumerate() {
        let dx = i as f64 - mean_x;
        num += dx * (y - mean_y);
        den += dx * dx;
    }

    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Mean detrended deviation per weekday, shifted to sum to zero.
fn weekday_profile(dates: &[NaiveDate], detrended: &[f64]) -> [f64; 7] {
    let mut sums = [0.0; 7];
    let mut counts = [0usize; 7];
    for (date, value) in dates.iter().zip(detrended) {
        let w = date.weekday().num_days_from_monday() as usize;
        sums[w] += value;
        counts[w] += 1;
    }

    let mut profile = [0.0; 7];
    for i in 0..7 {
        if counts[i] > 0 {
            profile[i] = sums[i] / counts[i] as f64;
        }
    }

    let mean = profile.iter().sum::<f64>() / 7.0;
    for slot in &mut profile {
        *slot -= mean;
    }
    profile
}

/// Day-of-year index; December 31st of a leap year shares the final slot.
fn doy_index(date: &NaiveDate) -> usize {
    (date.ordinal0() as usize).min(364)
}

/// Mean detrended deviation per day of year. Slots never observed stay at
/// zero; occupied slots are shifted so their mean is zero.
fn day_of_year_profile(dates: &[NaiveDate], detrended: &[f64]) -> Vec<f64> {
    let mut sums = vec![0.0; 365];
    let mut counts = vec![0usize; 365];
    for (date, value) in dates.iter().zip(detrended) {
        let idx = doy_index(date);
        sums[idx] += value;
        counts[idx] += 1;
    }

    let mut profile = vec![0.0; 365];
    let mut occupied = 0usize;
    let mut total = 0.0;
    for i in 0..365 {
        if counts[i] > 0 {
            profile[i] = sums[i] / counts[i] as f64;
            total += profile[i];
            occupied += 1;
        }
    }

    if occupied > 0 {
        let mean = total / occupied as f64;
        for i in 0..365 {
            if counts[i] > 0 {
                profile[i] -= mean;
            }
        }
    }

    profile
}
