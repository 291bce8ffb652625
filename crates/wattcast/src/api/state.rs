//! Shared application state handed to every handler.

use crate::config::Config;
use crate::models::HorizonDays;
use crate::service::{ForecastPipeline, SessionStore};

pub struct AppState {
    pub config: Config,
    pub pipeline: ForecastPipeline,
    pub sessions: SessionStore,
    pub default_horizon: HorizonDays,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        // A misconfigured default falls back to the built-in horizon rather
        // than refusing to start.
        let default_horizon =
            HorizonDays::new(i64::from(config.default_horizon_days)).unwrap_or_default();
        Self {
            pipeline: ForecastPipeline::new(&config),
            sessions: SessionStore::new(),
            default_horizon,
            config,
        }
    }
}
