//! Loader for the consumption CSV format.
//!
//! The upload must carry two columns named exactly `Date` and `Consumption`
//! (case-sensitive). The header is validated before any row is read, so a
//! mislabeled file fails here with a clear schema error instead of deep
//! inside the forecast engine. Extra columns are ignored.

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};

use crate::error::{PipelineError, Result};
use crate::models::{Observation, ObservationSeries};

/// Canonical label of the timestamp column.
pub const DATE_COLUMN: &str = "Date";
/// Canonical label of the numeric observation column.
pub const VALUE_COLUMN: &str = "Consumption";

/// Accepted date formats, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Parses CSV bytes into an [`ObservationSeries`].
///
/// The output has exactly one observation per input data row, in file
/// order. Fails with a schema error when a required column is missing and
/// with a parse error quoting the offending lines when a date or value does
/// not convert.
pub fn load_consumption_csv(data: &[u8]) -> Result<ObservationSeries> {
    // Excel exports prepend a UTF-8 BOM, which would corrupt the first header.
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);

    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| PipelineError::parse(format!("unreadable header row: {e}")))?
        .clone();

    let date_idx = headers.iter().position(|h| h == DATE_COLUMN);
    let value_idx = headers.iter().position(|h| h == VALUE_COLUMN);

    let (date_idx, value_idx) = match (date_idx, value_idx) {
        (Some(d), Some(v)) => (d, v),
        (d, v) => {
            let mut missing = Vec::new();
            if d.is_none() {
                missing.push(DATE_COLUMN.to_string());
            }
            if v.is_none() {
                missing.push(VALUE_COLUMN.to_string());
            }
            let found = headers.iter().map(str::to_string).collect();
            return Err(PipelineError::schema(missing, found));
        }
    };

    let mut observations = Vec::new();
    let mut date_offenders: Vec<(usize, String)> = Vec::new();
    let mut value_offenders: Vec<(usize, String)> = Vec::new();

    for (i, record) in reader.records().enumerate() {
        // Header occupies line 1 of the file.
        let line = i + 2;
        let record =
            record.map_err(|e| PipelineError::parse(format!("line {line}: malformed row: {e}")))?;

        let raw_date = record.get(date_idx).unwrap_or("");
        let raw_value = record.get(value_idx).unwrap_or("");

        let date = parse_observation_date(raw_date);
        let value = parse_observation_value(raw_value);

        match (date, value) {
            (Some(date), Some(value)) => observations.push(Observation::new(date, value)),
            (date, value) => {
                if date.is_none() {
                    date_offenders.push((line, raw_date.to_string()));
                }
                if value.is_none() {
                    value_offenders.push((line, raw_value.to_string()));
                }
            }
        }
    }

    if !date_offenders.is_empty() {
        return Err(PipelineError::parse_rows(DATE_COLUMN, &date_offenders));
    }
    if !value_offenders.is_empty() {
        return Err(PipelineError::parse_rows(VALUE_COLUMN, &value_offenders));
    }

    Ok(ObservationSeries::new(observations))
}

/// Tries each accepted date format, then the date prefix of a timestamp.
fn parse_observation_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    // Timestamps such as "2023-01-01T00:00:00Z" or "2023-01-01 06:30:00".
    if trimmed.len() > 10 {
        return trimmed
            .get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok());
    }
    None
}

/// Parses a finite numeric observation. NaN and infinities are rejected.
fn parse_observation_value(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
