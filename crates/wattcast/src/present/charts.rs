//! Chart payloads for the page script.
//!
//! These are plain data: the browser does the drawing. Non-finite values
//! serialize as JSON nulls and the renderer skips them.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{ForecastOutcome, ObservationSeries};

#[derive(Debug, Clone, Serialize)]
pub struct SeriesData {
    pub name: String,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineChart {
    pub title: String,
    pub series: Vec<SeriesData>,
}

/// Envelope between the lower and upper forecast bounds.
#[derive(Debug, Clone, Serialize)]
pub struct BandData {
    pub dates: Vec<NaiveDate>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastChart {
    pub title: String,
    pub history: SeriesData,
    pub forecast: SeriesData,
    pub band: BandData,
    pub confidence_level: f64,
}

/// Observed values in date order. The stored series keeps upload order, so
/// charting sorts a copy.
fn observed_in_date_order(series: &ObservationSeries) -> SeriesData {
    let mut pairs: Vec<(NaiveDate, f64)> = series
        .observations
        .iter()
        .map(|o| (o.date, o.value))
        .collect();
    pairs.sort_by_key(|(date, _)| *date);

    SeriesData {
        name: "Consumption".to_string(),
        dates: pairs.iter().map(|(d, _)| *d).collect(),
        values: pairs.iter().map(|(_, v)| *v).collect(),
    }
}

pub fn history_chart(series: &ObservationSeries) -> LineChart {
    LineChart {
        title: "Consumption History".to_string(),
        series: vec![observed_in_date_order(series)],
    }
}

pub fn forecast_chart(series: &ObservationSeries, outcome: &ForecastOutcome) -> ForecastChart {
    let forecast = SeriesData {
        name: "Forecast".to_string(),
        dates: outcome.points.iter().map(|p| p.date).collect(),
        values: outcome.points.iter().map(|p| p.point_estimate).collect(),
    };
    let band = BandData {
        dates: outcome.points.iter().map(|p| p.date).collect(),
        lower: outcome.points.iter().map(|p| p.lower_bound).collect(),
        upper: outcome.points.iter().map(|p| p.upper_bound).collect(),
    };

    ForecastChart {
        title: "Forecast".to_string(),
        history: observed_in_date_order(series),
        forecast,
        band,
        confidence_level: outcome.confidence_level,
    }
}

pub fn component_charts(outcome: &ForecastOutcome) -> Vec<LineChart> {
    outcome
        .components
        .iter()
        .map(|c| LineChart {
            title: c.kind.title().to_string(),
            series: vec![SeriesData {
                name: c.kind.title().to_string(),
                dates: c.dates.clone(),
                values: c.values.clone(),
            }],
        })
        .collect()
}
