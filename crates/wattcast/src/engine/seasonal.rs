//! Model fitting and prediction over a contiguous daily grid.

use std::collections::BTreeMap;

use augurs::{
    ets::AutoETS,
    forecaster::{transforms::LinearInterpolator, Forecaster},
    mstl::MSTLModel,
    Forecast,
};
use chrono::{Duration, NaiveDate, Utc};

use super::{decompose, metrics};
use crate::error::{PipelineError, Result};
use crate::models::{ForecastOutcome, ForecastPoint, HorizonDays, ObservationSeries};

/// Fewest observed rows a fit will accept.
pub const MIN_OBSERVATIONS: usize = 7;

/// Seasonal period of the daily grid.
pub const WEEKLY_PERIOD: usize = 7;

/// Relative half-width of the uncertainty band when the model reports no
/// usable interval for a point.
const FALLBACK_MARGIN: f64 = 0.2;

/// Fits an ETS-family model to an observation series and produces point
/// estimates with uncertainty bounds over history plus the requested horizon.
///
/// Each call is a complete re-fit; no state survives between forecasts, so
/// the same series and horizon always yield the same date coverage.
pub struct SeasonalEngine {
    confidence_level: f64,
}

impl SeasonalEngine {
    pub fn new(confidence_level: f64) -> Self {
        debug_assert!(confidence_level > 0.0 && confidence_level < 1.0);
        Self { confidence_level }
    }

    pub fn forecast(
        &self,
        series: &ObservationSeries,
        horizon: HorizonDays,
    ) -> Result<ForecastOutcome> {
        if series.len() < MIN_OBSERVATIONS {
            return Err(PipelineError::insufficient_data(
                MIN_OBSERVATIONS,
                series.len(),
            ));
        }

        let grid = DailyGrid::from_series(series).ok_or_else(|| {
            PipelineError::insufficient_data(MIN_OBSERVATIONS, series.len())
        })?;
        let history_len = grid.len();
        let h = horizon.as_usize();

        // One weekly cycle must fit at least twice into the grid before a
        // seasonal decomposition is meaningful.
        let seasonal = WEEKLY_PERIOD > 1 && WEEKLY_PERIOD < history_len / 2;
        tracing::debug!(
            rows = series.len(),
            grid_len = history_len,
            horizon = h,
            seasonal,
            "fitting forecast model"
        );

        let (in_sample, out_of_sample) = if seasonal {
            fit_predict_mstl(&grid.values, h, self.confidence_level)?
        } else {
            fit_predict_ets(&grid.values, h, self.confidence_level)?
        };

        let interpolated = interpolate_gaps(&grid.values);

        // In-sample predictions can be non-finite at the warmup edge; fall
        // back to the gap-filled observed value there.
        let mut in_points = in_sample.point.clone();
        in_points.resize(history_len, f64::NAN);
        for (p, fill) in in_points.iter_mut().zip(&interpolated) {
            if !p.is_finite() {
                *p = *fill;
            }
        }

        let mut future = out_of_sample.point.clone();
        debug_assert_eq!(future.len(), h);
        let pad = interpolated[history_len - 1];
        future.resize(h, pad);

        let mut points = Vec::with_capacity(history_len + h);
        for (i, &p) in in_points.iter().enumerate() {
            let (lower, upper) = banded(
                p,
                bound_at(&in_sample, BoundSide::Lower, i),
                bound_at(&in_sample, BoundSide::Upper, i),
            );
            points.push(ForecastPoint {
                date: grid.date_at(i),
                point_estimate: p,
                lower_bound: lower,
                upper_bound: upper,
            });
        }
        for (step, &p) in future.iter().enumerate() {
            let (lower, upper) = banded(
                p,
                bound_at(&out_of_sample, BoundSide::Lower, step),
                bound_at(&out_of_sample, BoundSide::Upper, step),
            );
            points.push(ForecastPoint {
                date: grid.last_date() + Duration::days(step as i64 + 1),
                point_estimate: p,
                lower_bound: lower,
                upper_bound: upper,
            });
        }

        let accuracy = metrics::evaluate(&in_points, &interpolated);

        let full_dates: Vec<NaiveDate> = points.iter().map(|pt| pt.date).collect();
        let span_days = (history_len - 1) as i64;
        let components = decompose::decompose(
            &full_dates,
            &interpolated,
            history_len,
            seasonal,
            decompose::yearly_enabled(span_days),
        );

        Ok(ForecastOutcome {
            horizon_days: horizon.get(),
            confidence_level: self.confidence_level,
            points,
            history_len,
            components,
            accuracy: Some(accuracy),
            model_type: if seasonal { "MSTL-ETS" } else { "ETS" }.to_string(),
            generated_at: Utc::now(),
        })
    }
}

/// Observed values re-indexed onto one slot per calendar day. Days with no
/// observation hold NaN; days with several hold their mean.
struct DailyGrid {
    start: NaiveDate,
    values: Vec<f64>,
}

impl DailyGrid {
    fn from_series(series: &ObservationSeries) -> Option<Self> {
        let first = series.first_date()?;
        let last = series.last_date()?;

        let mut buckets: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
        for obs in &series.observations {
            let entry = buckets.entry(obs.date).or_insert((0.0, 0));
            entry.0 += obs.value;
            entry.1 += 1;
        }

        let mut values = Vec::with_capacity(
            (last.signed_duration_since(first).num_days() + 1) as usize,
        );
        let mut current = first;
        while current <= last {
            match buckets.get(&current) {
                Some((sum, n)) => values.push(sum / *n as f64),
                None => values.push(f64::NAN),
            }
            current += Duration::days(1);
        }

        Some(Self {
            start: first,
            values,
        })
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn date_at(&self, index: usize) -> NaiveDate {
        self.start + Duration::days(index as i64)
    }

    fn last_date(&self) -> NaiveDate {
        self.date_at(self.values.len().saturating_sub(1))
    }
}

/// Linear interpolation across NaN runs. The grid's first and last slots are
/// always observed, so every gap has both neighbours; a gap touching an edge
/// is filled from whichever side exists.
fn interpolate_gaps(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    let mut i = 0;
    while i < out.len() {
        if out[i].is_finite() {
            i += 1;
            continue;
        }

        let mut j = i;
        while j < out.len() && !out[j].is_finite() {
            j += 1;
        }

        let left = if i > 0 { Some(out[i - 1]) } else { None };
        let right = if j < out.len() { Some(out[j]) } else { None };
        match (left, right) {
            (Some(l), Some(r)) => {
                let gap = (j - i + 1) as f64;
                for (k, slot) in out[i..j].iter_mut().enumerate() {
                    *slot = l + (r - l) * ((k + 1) as f64 / gap);
                }
            }
            (Some(l), None) => out[i..j].fill(l),
            (None, Some(r)) => out[i..j].fill(r),
            (None, None) => out[i..j].fill(0.0),
        }
        i = j;
    }
    out
}

enum BoundSide {
    Lower,
    Upper,
}

fn bound_at(forecast: &Forecast, side: BoundSide, index: usize) -> Option<f64> {
    let intervals = forecast.intervals.as_ref()?;
    let values = match side {
        BoundSide::Lower => &intervals.lower,
        BoundSide::Upper => &intervals.upper,
    };
    values.get(index).copied()
}

/// Clamps a point's band so `lower <= point <= upper` always holds, swapping
/// in a relative margin for any bound the model left missing or inverted.
fn banded(point: f64, lower: Option<f64>, upper: Option<f64>) -> (f64, f64) {
    let margin = point.abs() * FALLBACK_MARGIN;
    let lo = match lower {
        Some(l) if l.is_finite() && l <= point => l,
        _ => point - margin,
    };
    let hi = match upper {
        Some(u) if u.is_finite() && u >= point => u,
        _ => point + margin,
    };
    (lo, hi)
}

fn fit_predict_mstl(values: &[f64], horizon: usize, level: f64) -> Result<(Forecast, Forecast)> {
    let trend_model = AutoETS::non_seasonal().into_trend_model();
    let model = MSTLModel::new(vec![WEEKLY_PERIOD], trend_model);
    let transformers: Vec<Box<dyn augurs::forecaster::Transformer>> =
        vec![Box::new(LinearInterpolator::default())];
    let mut forecaster = Forecaster::new(model).with_transformers(transformers);

    forecaster
        .fit(values)
        .map_err(|e| PipelineError::engine(format!("MSTL fit failed: {e}")))?;
    let in_sample = forecaster
        .predict_in_sample(level)
        .map_err(|e| PipelineError::engine(format!("MSTL in-sample predict failed: {e}")))?;
    let out = forecaster
        .predict(horizon, level)
        .map_err(|e| PipelineError::engine(format!("MSTL predict failed: {e}")))?;
    Ok((in_sample, out))
}

fn fit_predict_ets(values: &[f64], horizon: usize, level: f64) -> Result<(Forecast, Forecast)> {
    let model = AutoETS::non_seasonal();
    let transformers: Vec<Box<dyn augurs::forecaster::Transformer>> =
        vec![Box::new(LinearInterpolator::default())];
    let mut forecaster = Forecaster::new(model).with_transformers(transformers);

    forecaster
        .fit(values)
        .map_err(|e| PipelineError::engine(format!("ETS fit failed: {e}")))?;
    let in_sample = forecaster
        .predict_in_sample(level)
        .map_err(|e| PipelineError::engine(format!("ETS in-sample predict failed: {e}")))?;
    let out = forecaster
        .predict(horizon, level)
        .map_err(|e| PipelineError::engine(format!("ETS predict failed: {e}")))?;
    Ok((in_sample, out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Observation;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn daily_series(start: &str, values: &[f64]) -> ObservationSeries {
        let start = date(start);
        ObservationSeries::new(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| Observation::new(start + Duration::days(i as i64), v))
                .collect(),
        )
    }

    /// Level plus gentle trend, weekly bump, and a deterministic wiggle.
    fn synthetic_series(start: &str, days: usize) -> ObservationSeries {
        let start = date(start);
        let observations = (0..days)
            .map(|i| {
                let d = start + Duration::days(i as i64);
                let weekend = if i % 7 >= 5 { 25.0 } else { 0.0 };
                let value = 100.0 + 0.1 * i as f64 + weekend + (i as f64 * 0.7).sin() * 2.0;
                Observation::new(d, value)
            })
            .collect();
        ObservationSeries::new(observations)
    }

    #[test]
    fn test_grid_averages_duplicate_dates() {
        let mut series = daily_series("2023-01-01", &[10.0, 20.0, 30.0]);
        series
            .observations
            .push(Observation::new(date("2023-01-02"), 40.0));

        let grid = DailyGrid::from_series(&series).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid.values[1], 30.0);
    }

    #[test]
    fn test_grid_marks_missing_days() {
        let series = ObservationSeries::new(vec![
            Observation::new(date("2023-01-01"), 1.0),
            Observation::new(date("2023-01-04"), 4.0),
        ]);

        let grid = DailyGrid::from_series(&series).unwrap();
        assert_eq!(grid.len(), 4);
        assert!(grid.values[1].is_nan());
        assert!(grid.values[2].is_nan());
        assert_eq!(grid.last_date(), date("2023-01-04"));
    }

    #[test]
    fn test_interpolate_gaps_is_linear() {
        let filled = interpolate_gaps(&[1.0, f64::NAN, 3.0]);
        assert_eq!(filled, vec![1.0, 2.0, 3.0]);

        let filled = interpolate_gaps(&[1.0, f64::NAN, f64::NAN, 4.0]);
        assert_eq!(filled, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_interpolate_leaves_complete_input_alone() {
        let values = vec![5.0, 6.0, 7.0];
        assert_eq!(interpolate_gaps(&values), values);
    }

    #[test]
    fn test_banded_repairs_missing_and_inverted_bounds() {
        let (lo, hi) = banded(100.0, None, None);
        assert_eq!(lo, 80.0);
        assert_eq!(hi, 120.0);

        // An inverted lower bound is replaced, a valid upper kept.
        let (lo, hi) = banded(100.0, Some(150.0), Some(130.0));
        assert_eq!(lo, 80.0);
        assert_eq!(hi, 130.0);

        // Negative points keep lower below the point.
        let (lo, hi) = banded(-100.0, None, None);
        assert!(lo <= -100.0 && -100.0 <= hi);
    }

    #[test]
    fn test_short_series_rejected() {
        let series = daily_series("2023-01-01", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let engine = SeasonalEngine::new(0.95);

        let err = engine
            .forecast(&series, HorizonDays::default())
            .unwrap_err();
        match err {
            PipelineError::InsufficientData { needed, got } => {
                assert_eq!(needed, MIN_OBSERVATIONS);
                assert_eq!(got, 6);
            }
            other => panic!("expected InsufficientData, got {other:?}"),
        }
    }

    #[test]
    fn test_minimum_series_produces_forecast() {
        let series = daily_series(
            "2023-01-01",
            &[100.0, 101.0, 102.5, 101.5, 103.0, 104.0, 103.5],
        );
        let engine = SeasonalEngine::new(0.95);

        let outcome = engine
            .forecast(&series, HorizonDays::new(30).unwrap())
            .unwrap();
        assert_eq!(outcome.points.len(), 7 + 30);
        assert_eq!(outcome.model_type, "ETS");
        assert_eq!(outcome.history_len, 7);
    }

    #[test]
    fn test_forecast_covers_history_and_horizon() {
        let series = synthetic_series("2023-01-01", 181);
        let engine = SeasonalEngine::new(0.95);

        let outcome = engine
            .forecast(&series, HorizonDays::new(30).unwrap())
            .unwrap();
        assert_eq!(outcome.points.len(), 211);
        assert_eq!(outcome.points[0].date, date("2023-01-01"));
        assert_eq!(outcome.points[180].date, date("2023-06-30"));
        assert_eq!(outcome.points[210].date, date("2023-07-30"));

        // Contiguous daily coverage with no holes.
        for pair in outcome.points.windows(2) {
            assert_eq!(pair[1].date, pair[0].date + Duration::days(1));
        }
        for p in &outcome.points {
            assert!(p.point_estimate.is_finite());
        }
    }

    #[test]
    fn test_bounds_bracket_point_estimates() {
        let series = synthetic_series("2023-01-01", 120);
        let engine = SeasonalEngine::new(0.95);

        let outcome = engine
            .forecast(&series, HorizonDays::new(60).unwrap())
            .unwrap();
        for p in &outcome.points {
            assert!(
                p.lower_bound <= p.point_estimate && p.point_estimate <= p.upper_bound,
                "bounds out of order at {}",
                p.date
            );
        }
    }

    #[test]
    fn test_weekly_model_chosen_for_long_series() {
        let engine = SeasonalEngine::new(0.95);

        let long = synthetic_series("2023-01-01", 28);
        let outcome = engine.forecast(&long, HorizonDays::new(30).unwrap()).unwrap();
        assert_eq!(outcome.model_type, "MSTL-ETS");
        assert!(outcome
            .components
            .iter()
            .any(|c| c.kind == crate::models::ComponentKind::Weekly));

        let short = synthetic_series("2023-01-01", 10);
        let outcome = engine.forecast(&short, HorizonDays::new(30).unwrap()).unwrap();
        assert_eq!(outcome.model_type, "ETS");
    }

    #[test]
    fn test_reruns_cover_identical_dates() {
        let series = synthetic_series("2023-03-01", 90);
        let engine = SeasonalEngine::new(0.95);
        let horizon = HorizonDays::new(45).unwrap();

        let first = engine.forecast(&series, horizon).unwrap();
        let second = engine.forecast(&series, horizon).unwrap();

        let dates_a: Vec<NaiveDate> = first.points.iter().map(|p| p.date).collect();
        let dates_b: Vec<NaiveDate> = second.points.iter().map(|p| p.date).collect();
        assert_eq!(dates_a, dates_b);
    }

    #[test]
    fn test_gappy_series_still_forecasts() {
        let start = date("2023-01-01");
        let observations: Vec<Observation> = (0..29)
            .filter(|i| i % 2 == 0 || *i == 27)
            .map(|i| Observation::new(start + Duration::days(i), 100.0 + i as f64))
            .collect();
        let series = ObservationSeries::new(observations);

        let engine = SeasonalEngine::new(0.95);
        let outcome = engine
            .forecast(&series, HorizonDays::new(30).unwrap())
            .unwrap();

        // Grid spans the full 29 days despite skipped observations.
        assert_eq!(outcome.history_len, 29);
        assert_eq!(outcome.points.len(), 59);
        for p in &outcome.points {
            assert!(p.point_estimate.is_finite());
            assert!(p.lower_bound.is_finite() && p.upper_bound.is_finite());
        }
    }

    #[test]
    fn test_accuracy_metrics_reported() {
        let series = synthetic_series("2023-01-01", 60);
        let engine = SeasonalEngine::new(0.95);

        let outcome = engine
            .forecast(&series, HorizonDays::new(30).unwrap())
            .unwrap();
        let accuracy = outcome.accuracy.unwrap();
        assert!(accuracy.mape.is_finite());
        assert!(accuracy.rmse >= 0.0);
        assert!(accuracy.mae >= 0.0);
    }
}
