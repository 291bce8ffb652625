//! wattcast: upload a consumption CSV, fit a seasonal forecasting model,
//! and explore the result in the browser.
//!
//! The flow is a small pipeline per session: ingest validates and parses
//! the upload, the engine fits and predicts over a contiguous daily grid,
//! and the presenter shapes everything the page renders. Sessions move
//! through explicit stages; nothing is global.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod models;
pub mod present;
pub mod service;

pub use config::Config;
pub use error::{PipelineError, Result};
pub use service::{ForecastPipeline, Session, SessionStore};
