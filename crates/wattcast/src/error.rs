//! Error handling for the forecasting pipeline.
//!
//! Every failure a pipeline run can surface is a [`PipelineError`]. Variants
//! map one-to-one onto the stage that produced them, so the page can tell a
//! bad upload apart from a failed model fit.

use thiserror::Error;
use uuid::Uuid;

/// Upper bound on offending rows quoted in a parse error message.
pub const MAX_REPORTED_ROWS: usize = 5;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Required columns absent from the uploaded header row.
    #[error("schema error: missing required column(s) [{}]; found columns [{}]", .missing.join(", "), .found.join(", "))]
    Schema {
        missing: Vec<String>,
        found: Vec<String>,
    },

    /// A timestamp or numeric value could not be converted.
    #[error("parse error: {detail}")]
    Parse { detail: String },

    /// The series is too short for the forecast engine to fit.
    #[error("insufficient data: need at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Any other failure raised by the forecast engine during fit/predict.
    #[error("forecast engine error: {0}")]
    Engine(String),

    /// Horizon outside the supported range.
    #[error("invalid horizon: {requested} days (supported range {min}..={max})")]
    InvalidHorizon { requested: i64, min: u32, max: u32 },

    /// Unknown session id on the session routes.
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    /// A forecast was requested before any dataset was loaded.
    #[error("no dataset loaded for this session")]
    NoDataset,

    /// Malformed upload request (missing file part, unreadable body).
    #[error("upload error: {0}")]
    Upload(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Results using PipelineError
pub type Result<T> = std::result::Result<T, PipelineError>;

impl PipelineError {
    /// Creates a schema error from the missing and observed column names.
    #[must_use]
    pub fn schema(missing: Vec<String>, found: Vec<String>) -> Self {
        PipelineError::Schema { missing, found }
    }

    /// Creates a parse error quoting the offending rows of one column.
    ///
    /// `offenders` pairs a 1-based file line number with the raw value that
    /// failed to parse. Only the first [`MAX_REPORTED_ROWS`] rows are quoted.
    #[must_use]
    pub fn parse_rows(column: &str, offenders: &[(usize, String)]) -> Self {
        let mut detail = format!(
            "{} row(s) in column '{}' could not be parsed: ",
            offenders.len(),
            column
        );
        let quoted: Vec<String> = offenders
            .iter()
            .take(MAX_REPORTED_ROWS)
            .map(|(line, raw)| format!("line {line} ('{raw}')"))
            .collect();
        detail.push_str(&quoted.join(", "));
        if offenders.len() > MAX_REPORTED_ROWS {
            detail.push_str(", ...");
        }
        PipelineError::Parse { detail }
    }

    /// Creates a parse error with a free-form detail message.
    #[must_use]
    pub fn parse(detail: impl Into<String>) -> Self {
        PipelineError::Parse {
            detail: detail.into(),
        }
    }

    /// Creates an insufficient data error.
    #[must_use]
    pub fn insufficient_data(needed: usize, got: usize) -> Self {
        PipelineError::InsufficientData { needed, got }
    }

    /// Creates a forecast engine error.
    #[must_use]
    pub fn engine(msg: impl Into<String>) -> Self {
        PipelineError::Engine(msg.into())
    }

    /// Creates an upload error.
    #[must_use]
    pub fn upload(msg: impl Into<String>) -> Self {
        PipelineError::Upload(msg.into())
    }

    /// Short machine-readable kind, used as the `error` field of HTTP bodies.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Schema { .. } => "schema_error",
            PipelineError::Parse { .. } => "parse_error",
            PipelineError::InsufficientData { .. } => "insufficient_data",
            PipelineError::Engine(_) => "engine_failure",
            PipelineError::InvalidHorizon { .. } => "invalid_horizon",
            PipelineError::SessionNotFound(_) => "session_not_found",
            PipelineError::NoDataset => "no_dataset",
            PipelineError::Upload(_) => "upload_error",
            PipelineError::Io(_) => "io_error",
        }
    }

    /// The pipeline stage this error is tied to, for user-facing messages.
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Schema { .. }
            | PipelineError::Parse { .. }
            | PipelineError::Upload(_)
            | PipelineError::Io(_) => "upload",
            PipelineError::InsufficientData { .. } | PipelineError::Engine(_) => "forecast",
            PipelineError::InvalidHorizon { .. } => "configure",
            PipelineError::SessionNotFound(_) | PipelineError::NoDataset => "session",
        }
    }

    /// Determines if this error is a client error (4xx-equivalent).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(self, PipelineError::Engine(_) | PipelineError::Io(_))
    }
}

impl axum::response::IntoResponse for PipelineError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        use axum::Json;

        let status = match &self {
            PipelineError::Schema { .. }
            | PipelineError::Parse { .. }
            | PipelineError::InsufficientData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            PipelineError::InvalidHorizon { .. } | PipelineError::Upload(_) => {
                StatusCode::BAD_REQUEST
            }
            PipelineError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            PipelineError::NoDataset => StatusCode::CONFLICT,
            PipelineError::Engine(_) | PipelineError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(serde_json::json!({
            "error": self.kind(),
            "stage": self.stage(),
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_implements_std_error() {
        let err = PipelineError::engine("test");
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<PipelineError>();
        assert_sync::<PipelineError>();
    }

    #[test]
    fn test_schema_error_lists_columns() {
        let err = PipelineError::schema(
            vec!["Consumption".to_string()],
            vec!["Date".to_string(), "Usage".to_string()],
        );
        let msg = err.to_string();
        assert!(msg.contains("Consumption"));
        assert!(msg.contains("Usage"));
    }

    #[test]
    fn test_parse_rows_caps_reported_offenders() {
        let offenders: Vec<(usize, String)> =
            (2..10).map(|line| (line, "bogus".to_string())).collect();
        let err = PipelineError::parse_rows("Date", &offenders);
        let msg = err.to_string();
        assert!(msg.contains("8 row(s)"));
        assert!(msg.contains("line 2"));
        assert!(msg.contains("line 6"));
        assert!(!msg.contains("line 7"));
        assert!(msg.ends_with("..."));
    }

    #[test]
    fn test_stage_classification() {
        assert_eq!(PipelineError::parse("x").stage(), "upload");
        assert_eq!(PipelineError::insufficient_data(7, 3).stage(), "forecast");
        assert_eq!(
            PipelineError::InvalidHorizon {
                requested: 10,
                min: 30,
                max: 365,
            }
            .stage(),
            "configure"
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(PipelineError::schema(vec![], vec![]).is_client_error());
        assert!(PipelineError::insufficient_data(7, 2).is_client_error());
        assert!(!PipelineError::engine("fit blew up").is_client_error());
    }
}
