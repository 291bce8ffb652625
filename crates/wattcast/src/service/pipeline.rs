//! Orchestrates the upload-to-forecast flow over a session.

use crate::config::Config;
use crate::engine::SeasonalEngine;
use crate::error::{PipelineError, Result};
use crate::ingest;
use crate::models::{HorizonDays, PipelineStage};

use super::session::Session;

pub struct ForecastPipeline {
    engine: SeasonalEngine,
}

impl ForecastPipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            engine: SeasonalEngine::new(config.confidence_level),
        }
    }

    /// Parses an uploaded CSV and attaches it to the session, landing at the
    /// configuring stage. Any previous dataset is dropped first, so a failed
    /// parse leaves the session back at awaiting-upload with nothing stale.
    pub fn attach_dataset(
        &self,
        session: &mut Session,
        source_name: Option<String>,
        data: &[u8],
    ) -> Result<()> {
        session.clear_dataset();

        let series = ingest::load_consumption_csv(data)?;
        tracing::info!(
            session = %session.id,
            rows = series.len(),
            source = source_name.as_deref().unwrap_or("upload"),
            "dataset attached"
        );

        session.series = Some(series);
        session.source_name = source_name;
        session.advance(PipelineStage::Loaded);
        session.advance(PipelineStage::Configuring);
        Ok(())
    }

    /// Fits the model from scratch for the session's dataset and horizon.
    /// On failure the dataset stays attached and the session returns to the
    /// configuring stage so the user can adjust and retry.
    pub fn run_forecast(&self, session: &mut Session) -> Result<()> {
        if session.series.is_none() {
            return Err(PipelineError::NoDataset);
        }
        session.advance(PipelineStage::Forecasting);

        let fitted = match &session.series {
            Some(series) => self.engine.forecast(series, session.horizon),
            None => Err(PipelineError::NoDataset),
        };

        match fitted {
            Ok(outcome) => {
                tracing::info!(
                    session = %session.id,
                    points = outcome.points.len(),
                    model = %outcome.model_type,
                    "forecast complete"
                );
                session.outcome = Some(outcome);
                session.advance(PipelineStage::Presented);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(session = %session.id, error = %err, "forecast failed");
                session.outcome = None;
                session.advance(PipelineStage::Configuring);
                Err(err)
            }
        }
    }

    /// Validates and applies a new horizon, then re-fits. An out-of-range
    /// horizon leaves the session untouched.
    pub fn set_horizon(&self, session: &mut Session, days: i64) -> Result<()> {
        let horizon = HorizonDays::new(days)?;
        if session.series.is_none() {
            return Err(PipelineError::NoDataset);
        }

        session.horizon = horizon;
        self.run_forecast(session)
    }

    pub fn remove_dataset(&self, session: &mut Session) {
        tracing::info!(session = %session.id, "dataset removed");
        session.clear_dataset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn pipeline() -> ForecastPipeline {
        ForecastPipeline::new(&Config::default())
    }

    fn csv_bytes(days: usize) -> Vec<u8> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let mut out = String::from("Date,Consumption\n");
        for i in 0..days {
            let date = start + Duration::days(i as i64);
            let value = 100.0 + 0.2 * i as f64 + if i % 7 >= 5 { 20.0 } else { 0.0 };
            out.push_str(&format!("{},{value:.1}\n", date.format("%Y-%m-%d")));
        }
        out.into_bytes()
    }

    #[test]
    fn test_attach_lands_at_configuring() {
        let p = pipeline();
        let mut session = Session::new(HorizonDays::default());

        p.attach_dataset(&mut session, Some("meter.csv".to_string()), &csv_bytes(40))
            .unwrap();
        assert_eq!(session.stage, PipelineStage::Configuring);
        assert_eq!(session.rows(), 40);
        assert_eq!(session.source_name.as_deref(), Some("meter.csv"));
    }

    #[test]
    fn test_bad_upload_reverts_to_awaiting() {
        let p = pipeline();
        let mut session = Session::new(HorizonDays::default());
        p.attach_dataset(&mut session, None, &csv_bytes(40)).unwrap();

        let err = p
            .attach_dataset(&mut session, None, b"Timestamp,Load\n2023-01-01,1\n")
            .unwrap_err();
        assert!(matches!(err, PipelineError::Schema { .. }));
        assert_eq!(session.stage, PipelineStage::AwaitingUpload);
        assert!(session.series.is_none());
        assert!(session.outcome.is_none());
    }

    #[test]
    fn test_full_flow_reaches_presented() {
        let p = pipeline();
        let mut session = Session::new(HorizonDays::default());

        p.attach_dataset(&mut session, None, &csv_bytes(60)).unwrap();
        p.run_forecast(&mut session).unwrap();

        assert_eq!(session.stage, PipelineStage::Presented);
        let outcome = session.outcome.as_ref().unwrap();
        assert_eq!(outcome.horizon_days, 90);
        assert_eq!(outcome.points.len(), 60 + 90);
    }

    #[test]
    fn test_forecast_without_dataset_is_rejected() {
        let p = pipeline();
        let mut session = Session::new(HorizonDays::default());

        let err = p.run_forecast(&mut session).unwrap_err();
        assert!(matches!(err, PipelineError::NoDataset));
        assert_eq!(session.stage, PipelineStage::AwaitingUpload);
    }

    #[test]
    fn test_failed_fit_keeps_dataset_and_returns_to_configuring() {
        let p = pipeline();
        let mut session = Session::new(HorizonDays::default());

        p.attach_dataset(&mut session, None, &csv_bytes(5)).unwrap();
        let err = p.run_forecast(&mut session).unwrap_err();

        assert!(matches!(err, PipelineError::InsufficientData { .. }));
        assert_eq!(session.stage, PipelineStage::Configuring);
        assert_eq!(session.rows(), 5);
        assert!(session.outcome.is_none());
    }

    #[test]
    fn test_set_horizon_refits() {
        let p = pipeline();
        let mut session = Session::new(HorizonDays::default());
        p.attach_dataset(&mut session, None, &csv_bytes(60)).unwrap();
        p.run_forecast(&mut session).unwrap();

        p.set_horizon(&mut session, 30).unwrap();
        assert_eq!(session.stage, PipelineStage::Presented);
        let outcome = session.outcome.as_ref().unwrap();
        assert_eq!(outcome.horizon_days, 30);
        assert_eq!(outcome.points.len(), 60 + 30);
    }

    #[test]
    fn test_out_of_range_horizon_leaves_session_alone() {
        let p = pipeline();
        let mut session = Session::new(HorizonDays::default());
        p.attach_dataset(&mut session, None, &csv_bytes(60)).unwrap();
        p.run_forecast(&mut session).unwrap();

        let err = p.set_horizon(&mut session, 400).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidHorizon { .. }));
        assert_eq!(session.stage, PipelineStage::Presented);
        assert_eq!(session.horizon.get(), 90);
        assert!(session.outcome.is_some());
    }

    #[test]
    fn test_replacing_dataset_swaps_series() {
        let p = pipeline();
        let mut session = Session::new(HorizonDays::default());
        p.attach_dataset(&mut session, None, &csv_bytes(40)).unwrap();
        p.run_forecast(&mut session).unwrap();

        p.attach_dataset(&mut session, Some("new.csv".to_string()), &csv_bytes(70))
            .unwrap();
        assert_eq!(session.stage, PipelineStage::Configuring);
        assert_eq!(session.rows(), 70);
        assert!(session.outcome.is_none());
    }

    #[test]
    fn test_remove_dataset_resets_session() {
        let p = pipeline();
        let mut session = Session::new(HorizonDays::default());
        p.attach_dataset(&mut session, None, &csv_bytes(40)).unwrap();
        p.run_forecast(&mut session).unwrap();

        p.remove_dataset(&mut session);
        assert_eq!(session.stage, PipelineStage::AwaitingUpload);
        assert!(session.series.is_none());
        assert!(session.outcome.is_none());
    }
}
