use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One forecasted date: point estimate plus its uncertainty band.
///
/// Bound ordering (`lower_bound <= point_estimate <= upper_bound`) is
/// guaranteed by the engine adapter for every point it emits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub point_estimate: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Which decomposition component a series describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Trend,
    Weekly,
    Yearly,
}

impl ComponentKind {
    /// Human-readable chart title for this component.
    pub fn title(&self) -> &'static str {
        match self {
            ComponentKind::Trend => "Trend",
            ComponentKind::Weekly => "Weekly seasonality",
            ComponentKind::Yearly => "Yearly seasonality",
        }
    }
}

/// A decomposition component aligned to the forecast date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSeries {
    pub kind: ComponentKind,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    pub mape: f64,
    pub rmse: f64,
    pub mae: f64,
}

/// Everything one engine run produces: forecast points over the historical
/// grid plus the horizon, the component decomposition, and fit quality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastOutcome {
    pub horizon_days: u32,
    pub confidence_level: f64,
    /// Points over history then horizon, one per day, contiguous.
    pub points: Vec<ForecastPoint>,
    /// Number of leading points that fall on the historical grid.
    pub history_len: usize,
    pub components: Vec<ComponentSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<AccuracyMetrics>,
    pub model_type: String,
    pub generated_at: DateTime<Utc>,
}

impl ForecastOutcome {
    /// The points beyond the last observed date.
    pub fn future_points(&self) -> &[ForecastPoint] {
        &self.points[self.history_len.min(self.points.len())..]
    }

    /// The most recent `n` points of the full forecast table.
    pub fn tail(&self, n: usize) -> &[ForecastPoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }

    /// Date of the final forecasted point.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn outcome_with_points(n: usize, history_len: usize) -> ForecastOutcome {
        let points = (0..n)
            .map(|i| ForecastPoint {
                date: date(2023, 1, 1) + chrono::Duration::days(i as i64),
                point_estimate: 100.0 + i as f64,
                lower_bound: 90.0 + i as f64,
                upper_bound: 110.0 + i as f64,
            })
            .collect();
        ForecastOutcome {
            horizon_days: (n - history_len) as u32,
            confidence_level: 0.95,
            points,
            history_len,
            components: vec![],
            accuracy: None,
            model_type: "ETS".to_string(),
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_future_points_split() {
        let outcome = outcome_with_points(10, 7);
        assert_eq!(outcome.future_points().len(), 3);
        assert_eq!(outcome.future_points()[0].date, date(2023, 1, 8));
    }

    #[test]
    fn test_tail() {
        let outcome = outcome_with_points(10, 7);
        let tail = outcome.tail(5);
        assert_eq!(tail.len(), 5);
        assert_eq!(tail[4].date, date(2023, 1, 10));
        assert_eq!(outcome.last_date(), Some(date(2023, 1, 10)));
    }

    #[test]
    fn test_component_kind_serde_names() {
        let json = serde_json::to_string(&ComponentKind::Weekly).unwrap();
        assert_eq!(json, "\"weekly\"");
        assert_eq!(ComponentKind::Yearly.title(), "Yearly seasonality");
    }
}
