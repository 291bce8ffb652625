use serde::{Deserialize, Serialize};

/// The linear pipeline state of one session.
///
/// `AwaitingUpload -> Loaded -> Configuring -> Forecasting -> Presented`,
/// re-entrant for as long as the session lives: a horizon change re-enters
/// `Forecasting` from `Presented`, a failed fit falls back to `Configuring`
/// with the series retained, and removing or replacing the dataset reverts
/// to `AwaitingUpload` from anywhere. There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    AwaitingUpload,
    Loaded,
    Configuring,
    Forecasting,
    Presented,
}

impl PipelineStage {
    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_advance_to(self, next: PipelineStage) -> bool {
        use PipelineStage::*;
        match next {
            // Dataset removal or replacement is allowed from anywhere.
            AwaitingUpload => true,
            // A successful parse of a fresh or replacing upload.
            Loaded => matches!(self, AwaitingUpload),
            // Automatic after load, or fallback after a failed fit.
            Configuring => matches!(self, Loaded | Forecasting),
            // Horizon change or dataset change triggers a (re-)fit.
            Forecasting => matches!(self, Configuring | Presented),
            Presented => matches!(self, Forecasting),
        }
    }

    /// True once a dataset has been loaded and not removed.
    pub fn has_dataset(self) -> bool {
        !matches!(self, PipelineStage::AwaitingUpload)
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineStage::AwaitingUpload => "awaiting_upload",
            PipelineStage::Loaded => "loaded",
            PipelineStage::Configuring => "configuring",
            PipelineStage::Forecasting => "forecasting",
            PipelineStage::Presented => "presented",
        };
        f.write_str(name)
    }
}
