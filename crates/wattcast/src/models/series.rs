use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One parsed row of the uploaded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// The normalized historical series, in source order.
///
/// Order and multiplicity are exactly as parsed: one observation per input
/// row, no deduplication, no reordering. Uniqueness and monotonicity of
/// dates are not enforced here; the forecast engine regularizes the data on
/// its own grid when it fits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservationSeries {
    pub observations: Vec<Observation>,
}

impl ObservationSeries {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Earliest date present in the series, if any.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.iter().map(|o| o.date).min()
    }

    /// Latest date present in the series, if any.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.iter().map(|o| o.date).max()
    }

    /// Number of days between the earliest and latest date, inclusive bounds.
    pub fn span_days(&self) -> i64 {
        match (self.first_date(), self.last_date()) {
            (Some(first), Some(last)) => last.signed_duration_since(first).num_days(),
            _ => 0,
        }
    }

    /// The most recent `n` rows in source order.
    pub fn tail(&self, n: usize) -> &[Observation] {
        let start = self.observations.len().saturating_sub(n);
        &self.observations[start..]
    }
}
