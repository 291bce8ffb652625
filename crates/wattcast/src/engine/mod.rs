//! Forecast engine adapter.
//!
//! The model itself is external (`augurs`); this module prepares the daily
//! grid, drives fit/predict, and derives the display decomposition.

pub mod decompose;
pub mod metrics;
pub mod seasonal;

pub use seasonal::{SeasonalEngine, MIN_OBSERVATIONS, WEEKLY_PERIOD};
