pub mod forecast;
pub mod horizon;
pub mod series;
pub mod stage;

pub use forecast::{
    AccuracyMetrics, ComponentKind, ComponentSeries, ForecastOutcome, ForecastPoint,
};
pub use horizon::{HorizonDays, DEFAULT_HORIZON_DAYS, MAX_HORIZON_DAYS, MIN_HORIZON_DAYS};
pub use series::{Observation, ObservationSeries};
pub use stage::PipelineStage;
