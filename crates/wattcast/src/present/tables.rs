//! Tabular previews shown alongside the charts.

use serde::Serialize;

use crate::models::{ForecastOutcome, ForecastPoint, Observation, ObservationSeries};

/// Trailing rows of the uploaded series, in upload order.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesPreview {
    pub rows: Vec<Observation>,
    pub total_rows: usize,
}

pub fn series_tail(series: &ObservationSeries, rows: usize) -> SeriesPreview {
    SeriesPreview {
        rows: series.tail(rows).to_vec(),
        total_rows: series.len(),
    }
}

/// Trailing forecast points, which land inside the horizon whenever the
/// horizon is at least as long as the preview.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastPreview {
    pub rows: Vec<ForecastPoint>,
    pub total_rows: usize,
}

pub fn forecast_tail(outcome: &ForecastOutcome, rows: usize) -> ForecastPreview {
    ForecastPreview {
        rows: outcome.tail(rows).to_vec(),
        total_rows: outcome.points.len(),
    }
}
