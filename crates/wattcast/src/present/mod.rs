//! Presentation layer: turns pipeline state into the payload the page
//! renders. Everything here is read-only over the session's data.

pub mod charts;
pub mod page;
pub mod tables;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{AccuracyMetrics, ForecastOutcome, ObservationSeries};
use charts::{ForecastChart, LineChart};
use tables::{ForecastPreview, SeriesPreview};

pub use page::PAGE_HTML;

/// Everything the page shows once a forecast exists.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastSection {
    pub preview: ForecastPreview,
    pub chart: ForecastChart,
    pub components: Vec<LineChart>,
    pub horizon_days: u32,
    pub model_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<AccuracyMetrics>,
    pub generated_at: DateTime<Utc>,
}

/// Render-ready view of a session. Sections are present only when the
/// pipeline has produced the data behind them.
#[derive(Debug, Clone, Serialize)]
pub struct Presentation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_preview: Option<SeriesPreview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_chart: Option<LineChart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<ForecastSection>,
}

pub fn build_presentation(
    series: Option<&ObservationSeries>,
    outcome: Option<&ForecastOutcome>,
    preview_rows: usize,
) -> Presentation {
    let data_preview = series.map(|s| tables::series_tail(s, preview_rows));
    let history_chart = series.map(charts::history_chart);

    let forecast = match (series, outcome) {
        (Some(s), Some(o)) => Some(ForecastSection {
            preview: tables::forecast_tail(o, preview_rows),
            chart: charts::forecast_chart(s, o),
            components: charts::component_charts(o),
            horizon_days: o.horizon_days,
            model_type: o.model_type.clone(),
            accuracy: o.accuracy.clone(),
            generated_at: o.generated_at,
        }),
        _ => None,
    };

    Presentation {
        data_preview,
        history_chart,
        forecast,
    }
}
