//! Session state and pipeline orchestration.

pub mod pipeline;
pub mod session;

pub use pipeline::ForecastPipeline;
pub use session::{Session, SessionStore};
